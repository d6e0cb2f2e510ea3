//! 프롬프트 빌드 컨텍스트(설정/대상/게이트웨이/저장소) 준비 단계.

use anyhow::{Context, Result};

use crate::application::config::Config;
use crate::application::ports::{Endpoint, GitHubGateway, KeyValueStore};
use crate::application::usecases::build_prompt::BuildPromptUseCase;
use crate::domain::target::PullTarget;

/// 빌드 전 구간에서 공유되는 실행 상태.
pub(super) struct ExecutionContext {
    pub config: Config,
    pub target: PullTarget,
    pub gateway: Box<dyn GitHubGateway>,
    pub store: Box<dyn KeyValueStore>,
}

/// 설정 로딩, 대상 파싱, 호스트 토큰 해석, 게이트웨이 생성까지 선행한다.
pub(super) fn load_execution_context(
    use_case: &BuildPromptUseCase<'_>,
    url: &str,
) -> Result<ExecutionContext> {
    use_case.reporter.section("Load Config");
    let config = use_case
        .config_repo
        .load()
        .context("failed to load prinbox config")?;

    let target = use_case
        .target_resolver
        .parse(url)
        .context("failed to parse pull request URL")?;

    let host_cfg = config.host_config(&target.host);
    let token = use_case
        .host_token_resolver
        .resolve(&target.host, host_cfg)?
        .token;

    use_case.reporter.kv("Host", &target.host);
    use_case.reporter.kv(
        "Pull",
        &format!("{}/{}#{}", target.owner, target.repo, target.number),
    );
    if token.is_none() {
        use_case.reporter.status(
            "GitHub",
            &format!(
                "no token for '{}'; using anonymous access (configure hosts.{}.token_env)",
                target.host, target.host
            ),
        );
    }

    let endpoint = Endpoint {
        host: target.host.clone(),
        api_base: host_cfg.and_then(|h| h.api_base.clone()),
        token,
    };
    let gateway = use_case.gateway_factory.build(&endpoint);
    let store = use_case.store_opener.open(&config);

    Ok(ExecutionContext {
        config,
        target,
        gateway,
        store,
    })
}
