//! PR 하나를 외부 도구용 프롬프트 텍스트로 조립하는 파이프라인.
//!
//! 모든 네트워크 호출은 순서대로 기다리며, 어느 단계든 실패하면 부분 결과 없이
//! 전체 호출이 실패한다.

mod blocks;
mod meta;
mod slots;

use anyhow::{Result, bail};
use tracing::{debug, info};

use crate::application::ports::GitHubGateway;
use crate::application::settings::SettingsStore;
use crate::domain::block::{PromptBlockInput, format_block, format_list};
use crate::domain::mode::PromptMode;
use crate::domain::pull::{DiffInclusionOptions, PullRequest, ResolvedPullMeta};

pub use meta::deep_link_url;
pub use slots::{files_list_slot, link_slot, setup_slot};

use blocks::collect_blocks;
use meta::resolve_pull_meta;
use slots::{SlotInputs, render_prompt};

/// 딥링크 생성 결과.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoPromptLink {
    pub url: String,
    pub resolved_meta: ResolvedPullMeta,
}

/// 프롬프트 조립 결과.
/// `blocks`는 실제 치환 여부와 무관하게 수집한 전체 목록이다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptOutput {
    pub prompt_text: String,
    pub blocks: Vec<PromptBlockInput>,
}

impl PromptOutput {
    /// 사용자가 고른 블록을 목록 순서대로 프롬프트 끝에 덧붙인다.
    /// 이미 본문에 그대로 들어 있는 블록은 다시 붙이지 않는다.
    pub fn with_attachments(&self, ids: &[String]) -> Result<String> {
        if let Some(unknown) = ids
            .iter()
            .find(|id| !self.blocks.iter().any(|b| b.id() == id.as_str()))
        {
            bail!("unknown block id '{unknown}'");
        }

        let extra: Vec<PromptBlockInput> = self
            .blocks
            .iter()
            .filter(|b| ids.iter().any(|id| id == b.id()))
            .filter(|b| !self.prompt_text.contains(&format_block(b)))
            .cloned()
            .collect();

        if extra.is_empty() {
            return Ok(self.prompt_text.clone());
        }
        Ok(format!("{}\n\n{}", self.prompt_text, format_list(&extra))
            .trim()
            .to_string())
    }

    /// PR 상세 블록을 제외한 코멘트 블록 id.
    pub fn comment_ids(&self) -> Vec<String> {
        self.blocks
            .iter()
            .skip(1)
            .filter(|b| matches!(b, PromptBlockInput::Comment(_)))
            .map(|b| b.id().to_string())
            .collect()
    }
}

/// 한 엔드포인트의 GitHub 게이트웨이와 설정 저장소로 프롬프트를 만든다.
pub struct PromptBuilder<'a> {
    pub gateway: &'a dyn GitHubGateway,
    pub settings: &'a SettingsStore<'a>,
    pub deep_link_scheme: String,
}

impl<'a> PromptBuilder<'a> {
    /// 메타만 해석해 딥링크를 만든다. diff/코멘트는 조회하지 않는다.
    pub async fn build_repo_prompt_url(
        &self,
        pull: &PullRequest,
        workspace_hint: Option<&str>,
    ) -> Result<RepoPromptLink> {
        let resolved_meta = resolve_pull_meta(self.gateway, self.settings, pull).await?;
        let url = deep_link_url(&self.deep_link_scheme, &resolved_meta, workspace_hint, None)?;
        Ok(RepoPromptLink { url, resolved_meta })
    }

    pub async fn resolve_meta(&self, pull: &PullRequest) -> Result<ResolvedPullMeta> {
        resolve_pull_meta(self.gateway, self.settings, pull).await
    }

    pub async fn build_repo_prompt_text(
        &self,
        pull: &PullRequest,
        options: DiffInclusionOptions,
        mode: PromptMode,
        resolved_meta: &ResolvedPullMeta,
    ) -> Result<PromptOutput> {
        let options = options.normalized();
        debug!(
            mode = %mode,
            include_pr = options.include_pr,
            include_comments = options.include_comments,
            include_last_commit = options.include_last_commit,
            commits = options.commits.len(),
            "building prompt"
        );

        let blocks = collect_blocks(self.gateway, pull, &options).await?;

        // 상세 블록은 항상 첫 번째다.
        let pr_details = format_block(&blocks[0]);
        let diffs: Vec<PromptBlockInput> = blocks
            .iter()
            .filter(|b| matches!(b, PromptBlockInput::Diff(_)))
            .cloned()
            .collect();

        let template = self.settings.get_prompt_template(mode)?;
        let prompt_text = render_prompt(
            &template,
            &SlotInputs {
                pull,
                options: &options,
                meta: resolved_meta,
                pr_details,
                diff_content: format_list(&diffs),
            },
        );

        info!(
            mode = %mode,
            blocks = blocks.len(),
            diffs = diffs.len(),
            chars = prompt_text.len(),
            "prompt assembled"
        );

        Ok(PromptOutput {
            prompt_text,
            blocks,
        })
    }
}
