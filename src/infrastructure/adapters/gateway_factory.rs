//! GitHub 게이트웨이 팩토리 포트 구현 어댑터.

use crate::application::ports::{Endpoint, GatewayFactory, GitHubGateway};
use crate::infrastructure::vcs;

/// 엔드포인트별 REST 클라이언트를 만드는 팩토리 어댑터.
pub struct GatewayFactoryAdapter;

impl GatewayFactory for GatewayFactoryAdapter {
    fn build(&self, endpoint: &Endpoint) -> Box<dyn GitHubGateway> {
        vcs::build_gateway(endpoint)
    }
}
