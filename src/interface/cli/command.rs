//! CLI 명령 파싱 모듈.

use clap::{Args, Parser, Subcommand};

use crate::application::usecases::build_prompt::PromptRequest;
use crate::domain::mode::PromptMode;
use crate::domain::pull::DiffInclusionOptions;

#[derive(Debug, Parser)]
#[command(name = "prinbox")]
#[command(about = "Turn a GitHub pull request into a ready-to-paste prompt")]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Suppress progress output on stderr
    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Render the prompt for a pull request
    Prompt(PromptArgs),
    /// Print the deep link that opens the repository in the external tool
    Link {
        /// Pull request URL
        url: String,
        /// Workspace name passed to the external tool
        #[arg(long)]
        workspace: Option<String>,
    },
    /// Show, replace, reset or lint a prompt template
    Template {
        #[command(subcommand)]
        action: TemplateCommand,
    },
    /// Show or set the local clone root
    Root {
        /// New clone root
        path: Option<String>,
    },
    /// Show effective merged config and token sources
    Config,
}

#[derive(Debug, Args)]
struct PromptArgs {
    /// Pull request URL
    url: String,

    /// implement | review | adjust-pr | respond
    #[arg(long, short)]
    mode: Option<PromptMode>,

    /// Include the full PR diff
    #[arg(long)]
    pr: bool,

    /// Include issue comments and review threads
    #[arg(long)]
    comments: bool,

    /// Include the diff of the last commit
    #[arg(long)]
    last_commit: bool,

    /// Include the diff of a specific commit (repeatable)
    #[arg(long = "commit", value_name = "SHA")]
    commits: Vec<String>,

    /// Workspace name for the deep link
    #[arg(long)]
    workspace: Option<String>,

    /// Append a block to the prompt by id (repeatable)
    #[arg(long = "attach", value_name = "ID")]
    attach: Vec<String>,

    /// Append every comment block to the prompt
    #[arg(long)]
    attach_comments: bool,

    /// List collected block ids and headers on stderr
    #[arg(long)]
    blocks: bool,

    /// Also print a deep link carrying the prompt
    #[arg(long)]
    link: bool,
}

#[derive(Debug, Subcommand)]
enum TemplateCommand {
    /// Print the template in effect and where it comes from
    Show { mode: Option<PromptMode> },
    /// Store an override read from a file or stdin
    Set {
        mode: Option<PromptMode>,
        #[arg(long)]
        file: Option<std::path::PathBuf>,
    },
    /// Remove the override and fall back to the bundled template
    Reset { mode: Option<PromptMode> },
    /// Check the template in effect for token problems
    Lint { mode: Option<PromptMode> },
}

/// 템플릿 하위 명령. 모드가 없으면 설정의 기본 모드를 쓴다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateAction {
    Show(Option<PromptMode>),
    Set {
        mode: Option<PromptMode>,
        file: Option<std::path::PathBuf>,
    },
    Reset(Option<PromptMode>),
    Lint(Option<PromptMode>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliAction {
    Prompt {
        request: PromptRequest,
        list_blocks: bool,
    },
    Link {
        url: String,
        workspace: Option<String>,
    },
    Template(TemplateAction),
    ShowRoot,
    SetRoot(String),
    InspectConfig,
}

impl Cli {
    /// 프로세스 인자를 파싱한다. 실패 시 clap이 사용법을 출력하고 종료한다.
    pub fn parse_action() -> (CliAction, bool) {
        let cli = Cli::parse();
        let quiet = cli.quiet;
        (cli.into_action(), quiet)
    }

    /// 테스트와 라이브러리 호출용 파싱.
    pub fn try_parse_action<I, T>(args: I) -> Result<(CliAction, bool), String>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;
        let quiet = cli.quiet;
        Ok((cli.into_action(), quiet))
    }

    fn into_action(self) -> CliAction {
        match self.command {
            Commands::Prompt(args) => args.into_action(),
            Commands::Link { url, workspace } => CliAction::Link { url, workspace },
            Commands::Template { action } => CliAction::Template(match action {
                TemplateCommand::Show { mode } => TemplateAction::Show(mode),
                TemplateCommand::Set { mode, file } => TemplateAction::Set { mode, file },
                TemplateCommand::Reset { mode } => TemplateAction::Reset(mode),
                TemplateCommand::Lint { mode } => TemplateAction::Lint(mode),
            }),
            Commands::Root { path: Some(path) } => CliAction::SetRoot(path),
            Commands::Root { path: None } => CliAction::ShowRoot,
            Commands::Config => CliAction::InspectConfig,
        }
    }
}

impl PromptArgs {
    fn into_action(self) -> CliAction {
        // 포함 플래그를 하나라도 주면 모드 기본값 대신 그대로 사용한다.
        let explicit = self.pr || self.comments || self.last_commit || !self.commits.is_empty();
        let inclusion = explicit.then(|| DiffInclusionOptions {
            include_pr: self.pr,
            include_comments: self.comments,
            include_last_commit: self.last_commit,
            commits: self.commits,
        });

        CliAction::Prompt {
            request: PromptRequest {
                url: self.url,
                mode: self.mode,
                inclusion,
                workspace: self.workspace,
                attach: self.attach,
                attach_comments: self.attach_comments,
                with_link: self.link,
            },
            list_blocks: self.blocks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://github.com/acme/app/pull/9";

    fn parse(args: &[&str]) -> CliAction {
        let mut argv = vec!["prinbox"];
        argv.extend_from_slice(args);
        Cli::try_parse_action(argv).unwrap().0
    }

    #[test]
    fn prompt_without_flags_uses_mode_defaults() {
        let CliAction::Prompt { request, list_blocks } = parse(&["prompt", URL]) else {
            panic!("expected prompt action");
        };
        assert_eq!(request.url, URL);
        assert_eq!(request.mode, None);
        assert_eq!(request.inclusion, None);
        assert!(!list_blocks);
    }

    #[test]
    fn explicit_flags_build_inclusion() {
        let CliAction::Prompt { request, list_blocks } = parse(&[
            "prompt",
            URL,
            "--mode",
            "adjust-pr",
            "--comments",
            "--commit",
            "abc1234",
            "--commit",
            "def5678",
            "--attach",
            "comment-1",
            "--blocks",
        ]) else {
            panic!("expected prompt action");
        };
        assert_eq!(request.mode, Some(PromptMode::AdjustPr));
        assert_eq!(
            request.inclusion,
            Some(DiffInclusionOptions {
                include_pr: false,
                include_comments: true,
                include_last_commit: false,
                commits: vec!["abc1234".to_string(), "def5678".to_string()],
            })
        );
        assert_eq!(request.attach, vec!["comment-1".to_string()]);
        assert!(list_blocks);
    }

    #[test]
    fn root_and_template_subcommands() {
        assert_eq!(parse(&["root"]), CliAction::ShowRoot);
        assert_eq!(
            parse(&["root", "~/src"]),
            CliAction::SetRoot("~/src".to_string())
        );
        assert_eq!(
            parse(&["template", "reset", "review"]),
            CliAction::Template(TemplateAction::Reset(Some(PromptMode::Review)))
        );
        assert_eq!(
            parse(&["template", "show"]),
            CliAction::Template(TemplateAction::Show(None))
        );
    }

    #[test]
    fn quiet_is_global() {
        let (_, quiet) = Cli::try_parse_action(["prinbox", "config", "--quiet"]).unwrap();
        assert!(quiet);
    }

    #[test]
    fn rejects_unknown_mode() {
        assert!(Cli::try_parse_action(["prinbox", "prompt", URL, "--mode", "deploy"]).is_err());
    }
}
