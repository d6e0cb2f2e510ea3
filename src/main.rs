//! `prinbox` 바이너리 진입점.

use std::io::Read;

use anyhow::{Context, Result};

use prinbox::interface::cli::{AppComposition, Cli, CliAction, TemplateAction};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let (action, quiet) = Cli::parse_action();
    let composition = AppComposition::new(quiet);

    if let Err(err) = run(&composition, action).await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run(composition: &AppComposition, action: CliAction) -> Result<()> {
    match action {
        CliAction::InspectConfig => {
            println!("{}", composition.inspect_config_usecase().execute()?);
        }
        CliAction::Prompt {
            request,
            list_blocks,
        } => {
            let run = composition.build_prompt_usecase().execute(request).await?;
            if list_blocks {
                for block in &run.blocks {
                    eprintln!("{:<8} {:<24} {}", block.kind(), block.id(), block.header());
                }
            }
            println!("{}", run.prompt_text);
            if let Some(link) = run.link {
                println!();
                println!("{link}");
            }
        }
        CliAction::Link { url, workspace } => {
            let link = composition
                .build_prompt_usecase()
                .link(&url, workspace.as_deref())
                .await?;
            println!("{}", link.url);
        }
        CliAction::ShowRoot => {
            println!("{}", composition.default_root_usecase().get()?);
        }
        CliAction::SetRoot(path) => {
            composition.default_root_usecase().set(&path)?;
        }
        CliAction::Template(action) => run_template(composition, action)?,
    }
    Ok(())
}

fn run_template(composition: &AppComposition, action: TemplateAction) -> Result<()> {
    let use_case = composition.template_usecase();
    let pick = |mode: Option<_>| match mode {
        Some(mode) => Ok(mode),
        None => use_case.default_mode(),
    };

    match action {
        TemplateAction::Show(mode) => {
            let resolved = use_case.show(pick(mode)?)?;
            eprintln!("source: {}", resolved.source.label());
            println!("{}", resolved.body);
        }
        TemplateAction::Set { mode, file } => {
            let text = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read template {}", path.display()))?,
                None => {
                    let mut text = String::new();
                    std::io::stdin()
                        .read_to_string(&mut text)
                        .context("failed to read template from stdin")?;
                    text
                }
            };
            for issue in use_case.set(pick(mode)?, &text)? {
                eprintln!("warning: {issue}");
            }
        }
        TemplateAction::Reset(mode) => use_case.reset(pick(mode)?)?,
        TemplateAction::Lint(mode) => {
            let issues = use_case.lint(pick(mode)?)?;
            if issues.is_empty() {
                eprintln!("template ok");
            }
            for issue in issues {
                println!("{issue}");
            }
        }
    }
    Ok(())
}
