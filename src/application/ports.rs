//! 애플리케이션 계층이 의존하는 포트(추상 인터페이스) 모음.

use anyhow::Result;
use async_trait::async_trait;

use crate::application::config::{Config, HostConfig};
use crate::domain::block::PromptBlockInput;
use crate::domain::pull::{CommitSummary, PullMeta, PullRequest};
use crate::domain::target::PullTarget;

/// 설정 로딩/점검을 담당하는 저장소 포트.
pub trait ConfigRepository: Send + Sync {
    fn load(&self) -> Result<Config>;
    fn inspect_pretty_json(&self) -> Result<String>;
}

/// 로컬 키-값 영속 저장소 포트. 키가 없으면 `Ok(None)`.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// 설정에 맞는 키-값 저장소를 여는 팩토리 포트.
pub trait StoreOpener: Send + Sync {
    fn open(&self, config: &Config) -> Box<dyn KeyValueStore>;
}

/// URL 입력값을 PR 대상 식별자로 변환하는 포트.
pub trait TargetResolver: Send + Sync {
    fn parse(&self, input: &str) -> Result<PullTarget>;
}

/// 하나의 GitHub 호환 호스트 연결 정보.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub api_base: Option<String>,
    pub token: Option<String>,
}

impl Endpoint {
    /// github.com은 공개 API, 그 외는 Enterprise 기본 경로를 사용한다.
    pub fn api_base(&self) -> String {
        if let Some(base) = self.api_base.as_deref().filter(|b| !b.trim().is_empty()) {
            return base.trim_end_matches('/').to_string();
        }
        if self.host == "github.com" {
            "https://api.github.com".to_string()
        } else {
            format!("https://{}/api/v3", self.host)
        }
    }
}

/// GitHub 연동 추상화 포트. 실패는 재시도 없이 호출자에게 전달된다.
#[async_trait]
pub trait GitHubGateway: Send + Sync {
    async fn get_pull_request(&self, owner: &str, repo: &str, number: u64) -> Result<PullRequest>;
    async fn get_pull_request_meta(&self, owner: &str, repo: &str, number: u64)
    -> Result<PullMeta>;
    /// 리뷰 스레드는 하나의 코멘트 블록으로 미리 묶어서 반환한다.
    async fn fetch_pull_comments(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<PromptBlockInput>>;
    async fn get_pull_request_diff(&self, owner: &str, repo: &str, number: u64) -> Result<String>;
    /// PR의 전체 커밋을 오래된 순서로 반환한다. `per_page`는 요청당 페이지 크기.
    async fn list_pr_commits(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        per_page: u32,
    ) -> Result<Vec<CommitSummary>>;
    async fn get_commit_diff(&self, owner: &str, repo: &str, sha: &str) -> Result<String>;
}

/// 엔드포인트에 맞는 GitHub 게이트웨이를 생성하는 팩토리 포트.
pub trait GatewayFactory: Send + Sync {
    fn build(&self, endpoint: &Endpoint) -> Box<dyn GitHubGateway>;
}

/// 호스트 토큰 해석 결과.
#[derive(Debug, Clone, Default)]
pub struct HostTokenResolution {
    pub token: Option<String>,
    pub source: Option<String>,
}

/// 설정(token/env/cmd)에서 호스트 토큰을 해석하는 포트.
pub trait HostTokenResolver: Send + Sync {
    fn resolve(&self, host: &str, host_cfg: Option<&HostConfig>) -> Result<HostTokenResolution>;
}

/// 진행 상황 출력 추상화 포트. 프롬프트 본문은 여기로 보내지 않는다.
pub trait Reporter: Send + Sync {
    fn section(&self, name: &str);
    fn kv(&self, key: &str, value: &str);
    fn status(&self, scope: &str, message: &str);
}
