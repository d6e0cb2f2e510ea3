//! GitHub 호환 호스트 연동 계층.

pub mod github;

use crate::application::ports::{Endpoint, GitHubGateway};

/// 엔드포인트 하나에 대한 게이트웨이를 생성한다.
pub fn build_gateway(endpoint: &Endpoint) -> Box<dyn GitHubGateway> {
    Box::new(github::GitHubClient::new(endpoint))
}
