//! PR URL 하나로 프롬프트/딥링크를 만드는 유스케이스.

mod context;

use anyhow::Result;

use crate::application::ports::{
    ConfigRepository, GatewayFactory, HostTokenResolver, Reporter, StoreOpener, TargetResolver,
};
use crate::application::prompt_builder::{PromptBuilder, deep_link_url};
use crate::application::settings::SettingsStore;
use crate::domain::block::PromptBlockInput;
use crate::domain::mode::PromptMode;
use crate::domain::pull::{DiffInclusionOptions, ResolvedPullMeta};
use crate::domain::template::TemplateRegistry;

use context::{ExecutionContext, load_execution_context};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptRequest {
    pub url: String,
    /// 없으면 설정의 기본 모드
    pub mode: Option<PromptMode>,
    /// 없으면 모드별 기본 포함 옵션
    pub inclusion: Option<DiffInclusionOptions>,
    pub workspace: Option<String>,
    /// 프롬프트 끝에 덧붙일 블록 id
    pub attach: Vec<String>,
    /// 모든 코멘트 블록을 덧붙인다
    pub attach_comments: bool,
    /// 완성된 프롬프트를 담은 딥링크도 만든다
    pub with_link: bool,
}

#[derive(Debug, Clone)]
pub struct PromptRun {
    pub mode: PromptMode,
    pub prompt_text: String,
    pub blocks: Vec<PromptBlockInput>,
    pub resolved_meta: ResolvedPullMeta,
    pub link: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LinkRun {
    pub url: String,
    pub resolved_meta: ResolvedPullMeta,
}

/// 설정/대상 해석부터 GitHub 조회, 템플릿 렌더링까지 전체 흐름을 조율한다.
pub struct BuildPromptUseCase<'a> {
    pub config_repo: &'a dyn ConfigRepository,
    pub host_token_resolver: &'a dyn HostTokenResolver,
    pub target_resolver: &'a dyn TargetResolver,
    pub gateway_factory: &'a dyn GatewayFactory,
    pub store_opener: &'a dyn StoreOpener,
    pub templates: &'a TemplateRegistry,
    pub reporter: &'a dyn Reporter,
}

impl<'a> BuildPromptUseCase<'a> {
    /// PR을 조회해 프롬프트를 조립한다.
    pub async fn execute(&self, request: PromptRequest) -> Result<PromptRun> {
        let ctx = load_execution_context(self, &request.url)?;
        let settings = self.settings(&ctx);
        let builder = PromptBuilder {
            gateway: ctx.gateway.as_ref(),
            settings: &settings,
            deep_link_scheme: ctx.config.deep_link_scheme(),
        };

        self.reporter.section("Fetch Pull Request");
        let pull = ctx
            .gateway
            .get_pull_request(&ctx.target.owner, &ctx.target.repo, ctx.target.number)
            .await?;
        self.reporter.kv("Title", &pull.title);

        let resolved_meta = builder.resolve_meta(&pull).await?;
        self.reporter.kv("Branch", &resolved_meta.branch);
        self.reporter.kv("Root", &resolved_meta.root_path);

        let mode = request.mode.unwrap_or_else(|| ctx.config.default_mode());
        let inclusion = request
            .inclusion
            .unwrap_or_else(|| mode.default_inclusion());

        self.reporter.section("Build Prompt");
        self.reporter.kv("Mode", mode.as_str());
        if inclusion.is_empty() {
            self.reporter
                .status("Prompt", "no diffs or comments requested; PR details only");
        }
        let output = builder
            .build_repo_prompt_text(&pull, inclusion, mode, &resolved_meta)
            .await?;
        self.reporter.kv("Blocks", &output.blocks.len().to_string());

        let mut attach = request.attach.clone();
        if request.attach_comments {
            for id in output.comment_ids() {
                if !attach.contains(&id) {
                    attach.push(id);
                }
            }
        }
        let prompt_text = output.with_attachments(&attach)?;

        let link = if request.with_link {
            Some(deep_link_url(
                &builder.deep_link_scheme,
                &resolved_meta,
                request.workspace.as_deref(),
                Some(&prompt_text),
            )?)
        } else {
            None
        };

        Ok(PromptRun {
            mode,
            prompt_text,
            blocks: output.blocks,
            resolved_meta,
            link,
        })
    }

    /// 메타만 해석해 외부 도구 딥링크를 만든다.
    pub async fn link(&self, url: &str, workspace: Option<&str>) -> Result<LinkRun> {
        let ctx = load_execution_context(self, url)?;
        let settings = self.settings(&ctx);
        let builder = PromptBuilder {
            gateway: ctx.gateway.as_ref(),
            settings: &settings,
            deep_link_scheme: ctx.config.deep_link_scheme(),
        };

        let pull = ctx
            .gateway
            .get_pull_request(&ctx.target.owner, &ctx.target.repo, ctx.target.number)
            .await?;
        let link = builder.build_repo_prompt_url(&pull, workspace).await?;

        Ok(LinkRun {
            url: link.url,
            resolved_meta: link.resolved_meta,
        })
    }

    fn settings<'c>(&'c self, ctx: &'c ExecutionContext) -> SettingsStore<'c> {
        SettingsStore::new(ctx.store.as_ref(), self.templates)
            .with_configured_root(ctx.config.clone_root())
    }
}
