//! GitHub REST API 연동 구현.

use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::application::ports::{Endpoint, GitHubGateway};
use crate::domain::block::{CommentBlock, PromptBlockInput};
use crate::domain::pull::{CommitSummary, PullMeta, PullRequest};

const PER_PAGE: usize = 100;
/// GitHub는 목록 API에서 최대 3000개까지만 돌려준다.
const MAX_PAGES: usize = 30;

const ACCEPT_JSON: &str = "application/vnd.github+json";
const ACCEPT_DIFF: &str = "application/vnd.github.v3.diff";

pub struct GitHubClient {
    client: Client,
    api_base: String,
    token: Option<String>,
}

impl GitHubClient {
    /// 엔드포인트(호스트/API base/토큰)로 클라이언트를 생성한다.
    pub fn new(endpoint: &Endpoint) -> Self {
        Self {
            client: Client::new(),
            api_base: endpoint.api_base(),
            token: endpoint.token.clone(),
        }
    }

    fn repo_url(&self, owner: &str, repo: &str, path: &str) -> String {
        format!("{}/repos/{}/{}/{}", self.api_base, owner, repo, path)
    }

    fn request(&self, url: &str, accept: &str) -> RequestBuilder {
        // 공통 헤더/인증 적용.
        let req = self
            .client
            .get(url)
            .header("User-Agent", "prinbox")
            .header("Accept", accept);

        if let Some(token) = &self.token {
            req.bearer_auth(token)
        } else {
            req
        }
    }

    async fn get_text(&self, url: &str, accept: &str, what: &str) -> Result<String> {
        debug!(url, "github request");
        let resp = self
            .request(url, accept)
            .send()
            .await
            .with_context(|| format!("github: failed to fetch {what}"))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .with_context(|| format!("github: failed to read {what} body"))?;

        if !status.is_success() {
            anyhow::bail!("github: failed to fetch {what} ({status}): {body}");
        }
        Ok(body)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<T> {
        let body = self.get_text(url, ACCEPT_JSON, what).await?;
        serde_json::from_str(&body).with_context(|| format!("github: invalid {what} JSON"))
    }

    async fn get_paginated<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<Vec<T>> {
        self.get_pages(url, PER_PAGE, what).await
    }

    /// 페이지 단위 목록 API를 끝까지 읽는다. 짧은 페이지가 오면 멈춘다.
    async fn get_pages<T: DeserializeOwned>(
        &self,
        url: &str,
        per_page: usize,
        what: &str,
    ) -> Result<Vec<T>> {
        let mut out = Vec::new();
        for page in 1..=MAX_PAGES {
            let page_url = format!("{url}?per_page={per_page}&page={page}");
            let items: Vec<T> = self.get_json(&page_url, what).await?;
            let len = items.len();
            out.extend(items);
            if len < per_page {
                break;
            }
        }
        Ok(out)
    }
}

#[derive(Debug, Deserialize)]
struct PullResponse {
    id: u64,
    number: u64,
    title: String,
    body: Option<String>,
    user: Option<UserResponse>,
    created_at: String,
    html_url: String,
    head: PullHead,
}

#[derive(Debug, Deserialize)]
struct PullHead {
    #[serde(rename = "ref")]
    branch: String,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    login: String,
    avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PullFileResponse {
    filename: String,
}

#[derive(Debug, Deserialize)]
struct IssueCommentResponse {
    id: u64,
    body: Option<String>,
    user: Option<UserResponse>,
    created_at: String,
}

#[derive(Debug, Deserialize)]
struct ReviewCommentResponse {
    id: u64,
    body: Option<String>,
    user: Option<UserResponse>,
    created_at: String,
    path: String,
    line: Option<u64>,
    original_line: Option<u64>,
    diff_hunk: Option<String>,
    in_reply_to_id: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct CommitResponse {
    sha: String,
    commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    message: String,
}

fn login(user: &Option<UserResponse>) -> String {
    user.as_ref()
        .map(|u| u.login.clone())
        .unwrap_or_else(|| "ghost".to_string())
}

fn avatar(user: &Option<UserResponse>) -> Option<String> {
    user.as_ref().and_then(|u| u.avatar_url.clone())
}

fn issue_comment_block(c: IssueCommentResponse) -> PromptBlockInput {
    let author = login(&c.user);
    PromptBlockInput::Comment(CommentBlock {
        id: format!("comment-{}", c.id),
        header: format!("### Comment by @{} ({})", author, c.created_at),
        comment_body: c.body.unwrap_or_default(),
        author_avatar_url: avatar(&c.user),
        author,
        timestamp: c.created_at,
        thread_id: None,
        diff_hunk: None,
        file_path: None,
        line: None,
    })
}

/// 리뷰 코멘트를 `in_reply_to_id` 기준 스레드로 묶어 블록 하나씩 만든다.
fn review_thread_blocks(comments: Vec<ReviewCommentResponse>) -> Vec<PromptBlockInput> {
    let root_ids: Vec<u64> = comments
        .iter()
        .filter(|c| c.in_reply_to_id.is_none())
        .map(|c| c.id)
        .collect();

    let mut order: Vec<u64> = Vec::new();
    let mut threads: HashMap<u64, Vec<ReviewCommentResponse>> = HashMap::new();
    for comment in comments {
        // 원 코멘트가 목록에 없는 답글은 독립 스레드로 취급한다.
        let root = match comment.in_reply_to_id {
            Some(parent) if root_ids.contains(&parent) => parent,
            _ => comment.id,
        };
        if !threads.contains_key(&root) {
            order.push(root);
        }
        threads.entry(root).or_default().push(comment);
    }

    order
        .into_iter()
        .filter_map(|root| threads.remove(&root))
        .filter_map(thread_block)
        .collect()
}

fn thread_block(thread: Vec<ReviewCommentResponse>) -> Option<PromptBlockInput> {
    let first = thread.first()?;
    let line = first.line.or(first.original_line);
    let header = match line {
        Some(line) => format!("### Review thread on {}:{}", first.path, line),
        None => format!("### Review thread on {}", first.path),
    };

    let mut body = String::new();
    if let Some(hunk) = first.diff_hunk.as_deref().filter(|h| !h.trim().is_empty()) {
        body.push_str("> ```diff\n");
        for l in hunk.trim_end().lines() {
            body.push_str("> ");
            body.push_str(l);
            body.push('\n');
        }
        body.push_str("> ```\n\n");
    }

    let replies: Vec<String> = thread
        .iter()
        .map(|c| {
            format!(
                "**@{}** ({}):\n{}",
                login(&c.user),
                c.created_at,
                c.body.as_deref().unwrap_or_default().trim_end()
            )
        })
        .collect();
    body.push_str(&replies.join("\n\n"));

    Some(PromptBlockInput::Comment(CommentBlock {
        id: format!("thread-{}", first.id),
        header,
        comment_body: body,
        author: login(&first.user),
        author_avatar_url: avatar(&first.user),
        timestamp: first.created_at.clone(),
        thread_id: Some(first.id.to_string()),
        diff_hunk: first.diff_hunk.clone(),
        file_path: Some(first.path.clone()),
        line,
    }))
}

fn block_timestamp(block: &PromptBlockInput) -> &str {
    match block {
        PromptBlockInput::Comment(c) => &c.timestamp,
        PromptBlockInput::Diff(_) => "",
    }
}

#[async_trait]
impl GitHubGateway for GitHubClient {
    async fn get_pull_request(&self, owner: &str, repo: &str, number: u64) -> Result<PullRequest> {
        let url = self.repo_url(owner, repo, &format!("pulls/{number}"));
        let pr: PullResponse = self.get_json(&url, "PR").await?;
        Ok(PullRequest {
            id: pr.id.to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
            number: pr.number,
            title: pr.title,
            body: pr.body.unwrap_or_default(),
            author: login(&pr.user),
            created_at: pr.created_at,
            url: pr.html_url,
            branch: pr.head.branch,
            files: Vec::new(),
        })
    }

    async fn get_pull_request_meta(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<PullMeta> {
        let url = self.repo_url(owner, repo, &format!("pulls/{number}"));
        let pr: PullResponse = self.get_json(&url, "PR metadata").await?;

        let files_url = self.repo_url(owner, repo, &format!("pulls/{number}/files"));
        let files: Vec<PullFileResponse> = self.get_paginated(&files_url, "PR files").await?;

        Ok(PullMeta {
            branch: pr.head.branch,
            files: files.into_iter().map(|f| f.filename).collect(),
        })
    }

    async fn fetch_pull_comments(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<PromptBlockInput>> {
        let issue_url = self.repo_url(owner, repo, &format!("issues/{number}/comments"));
        let issue: Vec<IssueCommentResponse> =
            self.get_paginated(&issue_url, "issue comments").await?;

        let review_url = self.repo_url(owner, repo, &format!("pulls/{number}/comments"));
        let review: Vec<ReviewCommentResponse> =
            self.get_paginated(&review_url, "review comments").await?;

        let mut blocks: Vec<PromptBlockInput> =
            issue.into_iter().map(issue_comment_block).collect();
        blocks.extend(review_thread_blocks(review));
        // 안정 정렬이라 같은 시각이면 이슈 코멘트가 먼저 온다.
        blocks.sort_by(|a, b| block_timestamp(a).cmp(block_timestamp(b)));
        Ok(blocks)
    }

    async fn get_pull_request_diff(&self, owner: &str, repo: &str, number: u64) -> Result<String> {
        // PR endpoint에 diff Accept 헤더를 적용해 unified diff를 가져온다.
        let url = self.repo_url(owner, repo, &format!("pulls/{number}"));
        self.get_text(&url, ACCEPT_DIFF, "PR diff").await
    }

    async fn list_pr_commits(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        per_page: u32,
    ) -> Result<Vec<CommitSummary>> {
        // 마지막 커밋이 필요하므로 첫 페이지에서 멈추지 않는다. GitHub는 최대 250개까지 준다.
        let url = self.repo_url(owner, repo, &format!("pulls/{number}/commits"));
        let per_page = per_page.clamp(1, 100) as usize;
        let commits: Vec<CommitResponse> = self.get_pages(&url, per_page, "PR commits").await?;
        Ok(commits
            .into_iter()
            .map(|c| CommitSummary {
                sha: c.sha,
                message: c.commit.message,
            })
            .collect())
    }

    async fn get_commit_diff(&self, owner: &str, repo: &str, sha: &str) -> Result<String> {
        let url = self.repo_url(owner, repo, &format!("commits/{sha}"));
        self.get_text(&url, ACCEPT_DIFF, "commit diff").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client(server: &mockito::ServerGuard) -> GitHubClient {
        GitHubClient::new(&Endpoint {
            host: "github.com".to_string(),
            api_base: Some(server.url()),
            token: Some("secret".to_string()),
        })
    }

    #[tokio::test]
    async fn fetches_pull_request_snapshot() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/owner/myrepo/pulls/123")
            .match_header("authorization", "Bearer secret")
            .with_status(200)
            .with_body(
                r#"{"id": 99, "number": 123, "title": "My Test PR", "body": null,
                    "user": {"login": "octocat", "avatar_url": "https://a/x.png"},
                    "created_at": "2024-05-01T10:00:00Z",
                    "html_url": "https://github.com/owner/myrepo/pull/123",
                    "head": {"ref": "feature/login", "sha": "abc"}}"#,
            )
            .create_async()
            .await;

        let pull = client(&server)
            .get_pull_request("owner", "myrepo", 123)
            .await
            .unwrap();
        mock.assert_async().await;

        assert_eq!(pull.id, "99");
        assert_eq!(pull.body, "");
        assert_eq!(pull.author, "octocat");
        assert_eq!(pull.branch, "feature/login");
        assert!(pull.files.is_empty());
    }

    #[tokio::test]
    async fn meta_combines_branch_and_paginated_files() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repos/o/r/pulls/1")
            .with_status(200)
            .with_body(
                r#"{"id": 1, "number": 1, "title": "t", "body": "b", "user": null,
                    "created_at": "2024-01-01T00:00:00Z", "html_url": "https://github.com/o/r/pull/1",
                    "head": {"ref": "topic"}}"#,
            )
            .create_async()
            .await;
        let page_one: Vec<serde_json::Value> = (0..100)
            .map(|i| serde_json::json!({ "filename": format!("src/f{i}.rs") }))
            .collect();
        server
            .mock("GET", "/repos/o/r/pulls/1/files")
            .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
            .with_status(200)
            .with_body(serde_json::to_string(&page_one).unwrap())
            .create_async()
            .await;
        server
            .mock("GET", "/repos/o/r/pulls/1/files")
            .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
            .with_status(200)
            .with_body(r#"[{"filename": "README.md"}]"#)
            .create_async()
            .await;

        let meta = client(&server)
            .get_pull_request_meta("o", "r", 1)
            .await
            .unwrap();
        assert_eq!(meta.branch, "topic");
        assert_eq!(meta.files.len(), 101);
        assert_eq!(meta.files.last().map(String::as_str), Some("README.md"));
    }

    #[tokio::test]
    async fn comments_are_threaded_and_ordered_by_time() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repos/o/r/issues/5/comments")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"[{"id": 10, "body": "Looks good overall", "user": {"login": "alice"},
                     "created_at": "2024-05-02T09:00:00Z"}]"#,
            )
            .create_async()
            .await;
        server
            .mock("GET", "/repos/o/r/pulls/5/comments")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"[{"id": 20, "body": "Rename this", "user": {"login": "bob"},
                     "created_at": "2024-05-01T08:00:00Z", "path": "src/lib.rs", "line": 42,
                     "diff_hunk": "@@ -1,2 +1,2 @@\n-old\n+new"},
                    {"id": 21, "body": "Done", "user": {"login": "carol"},
                     "created_at": "2024-05-03T08:00:00Z", "path": "src/lib.rs", "line": 42,
                     "diff_hunk": "@@ -1,2 +1,2 @@\n-old\n+new", "in_reply_to_id": 20}]"#,
            )
            .create_async()
            .await;

        let blocks = client(&server)
            .fetch_pull_comments("o", "r", 5)
            .await
            .unwrap();
        let ids: Vec<&str> = blocks.iter().map(|b| b.id()).collect();
        assert_eq!(ids, vec!["thread-20", "comment-10"]);

        let PromptBlockInput::Comment(thread) = &blocks[0] else {
            panic!("expected a comment block");
        };
        assert_eq!(thread.header, "### Review thread on src/lib.rs:42");
        assert_eq!(thread.thread_id.as_deref(), Some("20"));
        assert_eq!(
            thread.comment_body,
            "> ```diff\n> @@ -1,2 +1,2 @@\n> -old\n> +new\n> ```\n\n\
             **@bob** (2024-05-01T08:00:00Z):\nRename this\n\n\
             **@carol** (2024-05-03T08:00:00Z):\nDone"
        );
        assert_eq!(
            blocks[1].header(),
            "### Comment by @alice (2024-05-02T09:00:00Z)"
        );
    }

    #[tokio::test]
    async fn diff_requests_use_diff_media_type() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repos/o/r/pulls/7")
            .match_header("accept", ACCEPT_DIFF)
            .with_status(200)
            .with_body("diff --git a/x b/x\n")
            .create_async()
            .await;
        server
            .mock("GET", "/repos/o/r/commits/abc123")
            .match_header("accept", ACCEPT_DIFF)
            .with_status(200)
            .with_body("+commit\n")
            .create_async()
            .await;

        let gh = client(&server);
        assert_eq!(
            gh.get_pull_request_diff("o", "r", 7).await.unwrap(),
            "diff --git a/x b/x\n"
        );
        assert_eq!(gh.get_commit_diff("o", "r", "abc123").await.unwrap(), "+commit\n");
    }

    #[tokio::test]
    async fn lists_commits_oldest_first() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repos/o/r/pulls/7/commits")
            .match_query(Matcher::UrlEncoded("per_page".into(), "100".into()))
            .with_status(200)
            .with_body(
                r#"[{"sha": "a1", "commit": {"message": "first"}},
                    {"sha": "b2", "commit": {"message": "second"}}]"#,
            )
            .create_async()
            .await;

        let commits = client(&server).list_pr_commits("o", "r", 7, 100).await.unwrap();
        assert_eq!(
            commits.iter().map(|c| c.sha.as_str()).collect::<Vec<_>>(),
            vec!["a1", "b2"]
        );
    }

    #[tokio::test]
    async fn commit_listing_reads_every_page() {
        let mut server = mockito::Server::new_async().await;
        let commit = |i: usize| serde_json::json!({ "sha": format!("sha{i:03}"), "commit": { "message": format!("c{i}") } });
        let page_one: Vec<serde_json::Value> = (1..=100).map(commit).collect();
        let page_two: Vec<serde_json::Value> = (101..=150).map(commit).collect();
        server
            .mock("GET", "/repos/o/r/pulls/8/commits")
            .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
            .with_status(200)
            .with_body(serde_json::to_string(&page_one).unwrap())
            .create_async()
            .await;
        let second = server
            .mock("GET", "/repos/o/r/pulls/8/commits")
            .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
            .with_status(200)
            .with_body(serde_json::to_string(&page_two).unwrap())
            .create_async()
            .await;

        let commits = client(&server).list_pr_commits("o", "r", 8, 100).await.unwrap();
        second.assert_async().await;
        assert_eq!(commits.len(), 150);
        assert_eq!(commits.first().map(|c| c.sha.as_str()), Some("sha001"));
        assert_eq!(commits.last().map(|c| c.sha.as_str()), Some("sha150"));
    }

    #[tokio::test]
    async fn http_errors_carry_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repos/o/r/pulls/7")
            .with_status(401)
            .with_body(r#"{"message": "Bad credentials"}"#)
            .create_async()
            .await;

        let err = client(&server)
            .get_pull_request_diff("o", "r", 7)
            .await
            .unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("401"), "{msg}");
        assert!(msg.contains("Bad credentials"), "{msg}");
    }

    #[test]
    fn orphan_reply_becomes_its_own_thread() {
        let blocks = review_thread_blocks(vec![ReviewCommentResponse {
            id: 7,
            body: Some("follow-up".to_string()),
            user: None,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            path: "a.rs".to_string(),
            line: None,
            original_line: Some(3),
            diff_hunk: None,
            in_reply_to_id: Some(1),
        }]);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].id(), "thread-7");
        assert_eq!(blocks[0].header(), "### Review thread on a.rs:3");
        let PromptBlockInput::Comment(c) = &blocks[0] else {
            panic!("expected a comment block");
        };
        assert_eq!(c.comment_body, "**@ghost** (2024-01-01T00:00:00Z):\nfollow-up");
    }
}
