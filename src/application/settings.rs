//! 설정 저장소(템플릿 override, clone 루트)의 단계별 fallback 조회.

use std::path::Path;

use anyhow::Result;
use tracing::debug;

use crate::application::config::DEFAULT_CLONE_ROOT;
use crate::application::ports::KeyValueStore;
use crate::domain::mode::PromptMode;
use crate::domain::template::TemplateRegistry;

/// 모드별 저장소가 생기기 전부터 쓰이던 단일 템플릿 키.
pub const LEGACY_TEMPLATE_KEY: &str = "prompt_template";
pub const DEFAULT_ROOT_KEY: &str = "default_root";

pub fn template_key(mode: PromptMode) -> String {
    format!("template:{}", mode.as_str())
}

/// 템플릿 본문을 어디서 가져왔는지.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateSource {
    Override,
    Legacy,
    Bundled,
}

impl TemplateSource {
    pub fn label(self) -> &'static str {
        match self {
            Self::Override => "override",
            Self::Legacy => "legacy",
            Self::Bundled => "bundled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTemplate {
    pub body: String,
    pub source: TemplateSource,
}

type Lookup<'s> = Box<dyn Fn() -> Result<Option<String>> + 's>;

/// 키-값 저장소 위에 모드별 템플릿/루트 조회 규칙을 얹은 설정 저장소.
pub struct SettingsStore<'a> {
    store: &'a dyn KeyValueStore,
    registry: &'a TemplateRegistry,
    configured_root: Option<String>,
}

impl<'a> SettingsStore<'a> {
    pub fn new(store: &'a dyn KeyValueStore, registry: &'a TemplateRegistry) -> Self {
        Self {
            store,
            registry,
            configured_root: None,
        }
    }

    /// 저장소에 루트가 없을 때 사용할 설정 파일 값.
    pub fn with_configured_root(mut self, root: Option<&str>) -> Self {
        self.configured_root = root.map(ToString::to_string);
        self
    }

    pub fn get_prompt_template(&self, mode: PromptMode) -> Result<String> {
        Ok(self.resolve_prompt_template(mode)?.body)
    }

    /// 앞 단계가 miss일 때만 다음 단계를 조회한다.
    pub fn resolve_prompt_template(&self, mode: PromptMode) -> Result<ResolvedTemplate> {
        for (source, lookup) in self.template_chain(mode) {
            if let Some(body) = lookup()? {
                debug!(mode = %mode, source = source.label(), "prompt template resolved");
                return Ok(ResolvedTemplate { body, source });
            }
        }

        debug!(mode = %mode, source = "bundled", "prompt template resolved");
        Ok(ResolvedTemplate {
            body: self.registry.default_body(mode).to_string(),
            source: TemplateSource::Bundled,
        })
    }

    /// implement 모드는 legacy 키도 함께 갱신한다.
    pub fn set_prompt_template(&self, mode: PromptMode, text: &str) -> Result<()> {
        self.store.set(&template_key(mode), text)?;
        if mode == PromptMode::Implement {
            self.store.set(LEGACY_TEMPLATE_KEY, text)?;
        }
        Ok(())
    }

    /// override를 지워 번들 기본값으로 되돌린다.
    pub fn reset_prompt_template(&self, mode: PromptMode) -> Result<()> {
        self.store.remove(&template_key(mode))?;
        if mode == PromptMode::Implement {
            self.store.remove(LEGACY_TEMPLATE_KEY)?;
        }
        Ok(())
    }

    /// 저장소 값 -> 설정 파일 값 -> 기본 루트 순서. 앞의 `~`는 홈 디렉터리로 펼친다.
    pub fn get_default_root(&self) -> Result<String> {
        let root = match self
            .store
            .get(DEFAULT_ROOT_KEY)?
            .filter(|r| !r.trim().is_empty())
        {
            Some(root) => root,
            None => self
                .configured_root
                .clone()
                .unwrap_or_else(|| DEFAULT_CLONE_ROOT.to_string()),
        };
        Ok(expand_home(root.trim(), dirs::home_dir().as_deref()))
    }

    pub fn set_default_root(&self, path: &str) -> Result<()> {
        self.store.set(DEFAULT_ROOT_KEY, path)
    }

    fn template_chain(&self, mode: PromptMode) -> Vec<(TemplateSource, Lookup<'_>)> {
        let mut chain: Vec<(TemplateSource, Lookup<'_>)> = vec![(
            TemplateSource::Override,
            Box::new(move || self.store.get(&template_key(mode))),
        )];
        if mode == PromptMode::Implement {
            chain.push((
                TemplateSource::Legacy,
                Box::new(move || self.store.get(LEGACY_TEMPLATE_KEY)),
            ));
        }
        chain
    }
}

/// `~` 또는 `~/...`만 펼친다. 홈을 알 수 없으면 입력을 그대로 돌려준다.
fn expand_home(path: &str, home: Option<&Path>) -> String {
    let Some(home) = home else {
        return path.to_string();
    };
    match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => {
            format!("{}{rest}", home.display().to_string().trim_end_matches('/'))
        }
        _ => path.to_string(),
    }
}
