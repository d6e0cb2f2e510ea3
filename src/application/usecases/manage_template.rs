//! 모드별 프롬프트 템플릿 조회/변경/초기화/점검 유스케이스.

use anyhow::Result;

use crate::application::ports::{ConfigRepository, KeyValueStore, StoreOpener};
use crate::application::settings::{ResolvedTemplate, SettingsStore};
use crate::domain::mode::PromptMode;
use crate::domain::template::{TemplateIssue, TemplateRegistry, lint};

pub struct ManageTemplateUseCase<'a> {
    pub config_repo: &'a dyn ConfigRepository,
    pub store_opener: &'a dyn StoreOpener,
    pub templates: &'a TemplateRegistry,
}

impl<'a> ManageTemplateUseCase<'a> {
    /// 명령에 모드가 없을 때 쓰는 설정의 기본 모드.
    pub fn default_mode(&self) -> Result<PromptMode> {
        Ok(self.config_repo.load()?.default_mode())
    }

    /// 현재 적용되는 템플릿과 그 출처.
    pub fn show(&self, mode: PromptMode) -> Result<ResolvedTemplate> {
        let store = self.open()?;
        SettingsStore::new(store.as_ref(), self.templates).resolve_prompt_template(mode)
    }

    /// override를 저장하고, 렌더링에는 영향이 없는 점검 결과를 돌려준다.
    pub fn set(&self, mode: PromptMode, text: &str) -> Result<Vec<TemplateIssue>> {
        let store = self.open()?;
        SettingsStore::new(store.as_ref(), self.templates).set_prompt_template(mode, text)?;
        Ok(lint(text))
    }

    pub fn reset(&self, mode: PromptMode) -> Result<()> {
        let store = self.open()?;
        SettingsStore::new(store.as_ref(), self.templates).reset_prompt_template(mode)
    }

    pub fn lint(&self, mode: PromptMode) -> Result<Vec<TemplateIssue>> {
        Ok(lint(&self.show(mode)?.body))
    }

    fn open(&self) -> Result<Box<dyn KeyValueStore>> {
        let config = self.config_repo.load()?;
        Ok(self.store_opener.open(&config))
    }
}
