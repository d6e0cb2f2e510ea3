//! PR 엔티티와 빌드 시점 파생 값(해석된 메타, 포함 옵션).

use serde::Serialize;

/// GitHub에서 조회한 PR 스냅샷.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequest {
    pub id: String,
    pub owner: String,
    pub repo: String,
    pub number: u64,
    pub title: String,
    pub body: String,
    pub author: String,
    pub created_at: String,
    pub url: String,
    /// head 브랜치(비어 있으면 메타 조회로 보충)
    pub branch: String,
    /// 변경 파일 목록(비어 있으면 메타 조회로 보충)
    pub files: Vec<String>,
}

/// `get_pull_request_meta` 응답.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullMeta {
    pub branch: String,
    pub files: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSummary {
    pub sha: String,
    pub message: String,
}

/// 한 번의 빌드 동안 고정되는 owner/repo/branch/files/rootPath 스냅샷.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPullMeta {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub files: Vec<String>,
    pub root_path: String,
}

/// 프롬프트에 포함할 부가 콘텐츠 선택.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffInclusionOptions {
    pub include_pr: bool,
    pub include_comments: bool,
    pub include_last_commit: bool,
    pub commits: Vec<String>,
}

impl DiffInclusionOptions {
    /// PR 전체 diff가 마지막 커밋을 이미 포함하므로 둘을 동시에 켜지 않는다.
    pub fn normalized(mut self) -> Self {
        if self.include_pr {
            self.include_last_commit = false;
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        !self.include_pr
            && !self.include_comments
            && !self.include_last_commit
            && self.commits.is_empty()
    }
}

/// 커밋 SHA의 표시용 축약형.
pub fn short_sha(sha: &str) -> &str {
    match sha.char_indices().nth(7) {
        Some((idx, _)) => &sha[..idx],
        None => sha,
    }
}
