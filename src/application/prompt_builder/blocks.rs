//! 블록 수집 단계: PR 상세 -> 코멘트 -> diff 순서로 고정된 목록을 만든다.

use std::collections::HashSet;

use anyhow::Result;
use tracing::{debug, warn};

use crate::application::ports::GitHubGateway;
use crate::domain::block::{CommentBlock, DiffBlock, PromptBlockInput};
use crate::domain::pull::{DiffInclusionOptions, PullRequest, short_sha};

/// 커밋 목록 페이지 크기. 목록은 오래된 커밋부터 오므로 마지막 원소가 최신이다.
const COMMIT_PAGE_SIZE: u32 = 100;

/// PR 제목/본문으로 항상 하나 만들어지는 상세 블록. 본문은 가공하지 않는다.
pub(super) fn pr_details_block(pull: &PullRequest) -> PromptBlockInput {
    PromptBlockInput::Comment(CommentBlock {
        id: format!("pr-details-{}", pull.id),
        header: format!("## PR #{}: {}", pull.number, pull.title),
        comment_body: pull.body.clone(),
        author: pull.author.clone(),
        author_avatar_url: None,
        timestamp: pull.created_at.clone(),
        thread_id: None,
        diff_hunk: None,
        file_path: None,
        line: None,
    })
}

/// 옵션에 따라 코멘트/diff를 순차 조회해 블록 목록을 만든다.
/// 호출 결과를 하나씩 기다리므로 응답 속도와 무관하게 순서가 고정된다.
pub(super) async fn collect_blocks(
    gateway: &dyn GitHubGateway,
    pull: &PullRequest,
    options: &DiffInclusionOptions,
) -> Result<Vec<PromptBlockInput>> {
    let mut blocks = vec![pr_details_block(pull)];
    let mut seen: HashSet<String> = blocks.iter().map(|b| b.id().to_string()).collect();

    if options.include_comments {
        let comments = gateway
            .fetch_pull_comments(&pull.owner, &pull.repo, pull.number)
            .await?;
        debug!(count = comments.len(), "fetched comment blocks");
        for block in comments {
            push_unique(&mut blocks, &mut seen, block);
        }
    }

    if options.include_pr {
        let patch = gateway
            .get_pull_request_diff(&pull.owner, &pull.repo, pull.number)
            .await?;
        push_unique(
            &mut blocks,
            &mut seen,
            diff_block(format!("diff-pr-{}", pull.id), "### Full PR diff".to_string(), patch),
        );
    }

    if options.include_last_commit {
        let commits = gateway
            .list_pr_commits(&pull.owner, &pull.repo, pull.number, COMMIT_PAGE_SIZE)
            .await?;
        if let Some(last) = commits.last() {
            let patch = gateway
                .get_commit_diff(&pull.owner, &pull.repo, &last.sha)
                .await?;
            let subject = last.message.lines().next().unwrap_or_default().trim();
            let header = if subject.is_empty() {
                format!("### Last commit {}", short_sha(&last.sha))
            } else {
                format!("### Last commit {}: {}", short_sha(&last.sha), subject)
            };
            push_unique(
                &mut blocks,
                &mut seen,
                diff_block(format!("diff-last-commit-{}", last.sha), header, patch),
            );
        } else {
            debug!("pull request has no commits; skipping last commit diff");
        }
    }

    for sha in options.commits.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        let id = format!("diff-commit-{sha}");
        if seen.contains(&id) {
            continue;
        }
        let patch = gateway.get_commit_diff(&pull.owner, &pull.repo, sha).await?;
        push_unique(
            &mut blocks,
            &mut seen,
            diff_block(id, format!("### Commit {}", short_sha(sha)), patch),
        );
    }

    Ok(blocks)
}

fn diff_block(id: String, header: String, patch: String) -> PromptBlockInput {
    PromptBlockInput::Diff(DiffBlock { id, header, patch })
}

fn push_unique(
    blocks: &mut Vec<PromptBlockInput>,
    seen: &mut HashSet<String>,
    block: PromptBlockInput,
) {
    if seen.insert(block.id().to_string()) {
        blocks.push(block);
    } else {
        warn!(id = block.id(), "dropping block with duplicate id");
    }
}
