//! PR 메타 해석과 외부 도구 딥링크 생성.

use anyhow::{Context, Result};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use tracing::debug;
use url::Url;

use crate::application::ports::GitHubGateway;
use crate::application::settings::SettingsStore;
use crate::domain::pull::{PullRequest, ResolvedPullMeta};

/// 루트 경로를 하나의 path segment로 넣기 위한 인코딩 집합.
const ROOT_PATH: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// PR 자체 branch/files를 우선 사용하고, 비어 있으면 GitHub 메타로 보충한다.
pub(super) async fn resolve_pull_meta(
    gateway: &dyn GitHubGateway,
    settings: &SettingsStore<'_>,
    pull: &PullRequest,
) -> Result<ResolvedPullMeta> {
    let has_branch = !pull.branch.trim().is_empty();
    let has_files = !pull.files.is_empty();

    let fetched = if has_branch && has_files {
        None
    } else {
        debug!(owner = %pull.owner, repo = %pull.repo, number = pull.number, "fetching pull request meta");
        Some(
            gateway
                .get_pull_request_meta(&pull.owner, &pull.repo, pull.number)
                .await?,
        )
    };

    let (branch, files) = match fetched {
        None => (pull.branch.clone(), pull.files.clone()),
        Some(meta) => (
            if has_branch {
                pull.branch.clone()
            } else {
                meta.branch
            },
            if has_files {
                pull.files.clone()
            } else {
                meta.files
            },
        ),
    };

    let root = settings.get_default_root()?;

    Ok(ResolvedPullMeta {
        owner: pull.owner.clone(),
        repo: pull.repo.clone(),
        branch,
        files,
        root_path: join_root(&root, &pull.repo),
    })
}

fn join_root(root: &str, repo: &str) -> String {
    let root = root.trim().trim_end_matches('/');
    if root.is_empty() {
        repo.to_string()
    } else {
        format!("{root}/{repo}")
    }
}

/// `scheme://open/<root>?workspace=..&files=..[&ephemeral=true][&prompt=..]`
///
/// 워크스페이스 이름이 주어지지 않으면 저장소 이름을 쓰고 임시(ephemeral) 워크스페이스로 연다.
pub fn deep_link_url(
    scheme: &str,
    meta: &ResolvedPullMeta,
    workspace_hint: Option<&str>,
    prompt: Option<&str>,
) -> Result<String> {
    let hint = workspace_hint.map(str::trim).filter(|w| !w.is_empty());
    let workspace = hint.unwrap_or(&meta.repo);

    let mut raw = format!("{scheme}://open");
    if !meta.root_path.is_empty() {
        raw.push('/');
        raw.extend(utf8_percent_encode(&meta.root_path, ROOT_PATH));
    }

    let mut url =
        Url::parse(&raw).with_context(|| format!("invalid deep link scheme '{scheme}'"))?;
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("workspace", workspace);
        if !meta.files.is_empty() {
            query.append_pair("files", &meta.files.join(","));
        }
        if hint.is_none() {
            query.append_pair("ephemeral", "true");
        }
        if let Some(prompt) = prompt.filter(|p| !p.is_empty()) {
            query.append_pair("prompt", prompt);
        }
    }

    Ok(url.to_string())
}
