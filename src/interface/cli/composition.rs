//! 애플리케이션 조립(composition root) 모듈.

use crate::application::usecases::build_prompt::BuildPromptUseCase;
use crate::application::usecases::default_root::DefaultRootUseCase;
use crate::application::usecases::inspect_config::InspectConfigUseCase;
use crate::application::usecases::manage_template::ManageTemplateUseCase;
use crate::domain::template::TemplateRegistry;
use crate::infrastructure::adapters::{
    ConsoleReporter, GatewayFactoryAdapter, HostTokenResolverAdapter, JsonConfigRepository,
    JsonStoreOpener, UrlTargetResolver,
};
use crate::infrastructure::templates;

/// 실행 시점 의존성을 한 곳에서 조립하는 컨테이너.
pub struct AppComposition {
    config_repo: JsonConfigRepository,
    host_token_resolver: HostTokenResolverAdapter,
    target_resolver: UrlTargetResolver,
    gateway_factory: GatewayFactoryAdapter,
    store_opener: JsonStoreOpener,
    templates: &'static TemplateRegistry,
    reporter: ConsoleReporter,
}

impl Default for AppComposition {
    fn default() -> Self {
        Self::new(false)
    }
}

impl AppComposition {
    /// `quiet`이면 진행 상황 출력을 끈다.
    pub fn new(quiet: bool) -> Self {
        Self {
            config_repo: JsonConfigRepository,
            host_token_resolver: HostTokenResolverAdapter,
            target_resolver: UrlTargetResolver,
            gateway_factory: GatewayFactoryAdapter,
            store_opener: JsonStoreOpener,
            templates: templates::registry(),
            reporter: ConsoleReporter::new(quiet),
        }
    }

    /// 설정 점검 유스케이스를 생성한다.
    pub fn inspect_config_usecase(&self) -> InspectConfigUseCase<'_> {
        InspectConfigUseCase {
            config_repo: &self.config_repo,
        }
    }

    /// 프롬프트/딥링크 생성 유스케이스를 생성한다.
    pub fn build_prompt_usecase(&self) -> BuildPromptUseCase<'_> {
        BuildPromptUseCase {
            config_repo: &self.config_repo,
            host_token_resolver: &self.host_token_resolver,
            target_resolver: &self.target_resolver,
            gateway_factory: &self.gateway_factory,
            store_opener: &self.store_opener,
            templates: self.templates,
            reporter: &self.reporter,
        }
    }

    pub fn template_usecase(&self) -> ManageTemplateUseCase<'_> {
        ManageTemplateUseCase {
            config_repo: &self.config_repo,
            store_opener: &self.store_opener,
            templates: self.templates,
        }
    }

    pub fn default_root_usecase(&self) -> DefaultRootUseCase<'_> {
        DefaultRootUseCase {
            config_repo: &self.config_repo,
            store_opener: &self.store_opener,
            templates: self.templates,
        }
    }
}
