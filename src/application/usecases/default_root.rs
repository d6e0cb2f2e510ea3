//! 로컬 clone 루트 조회/변경 유스케이스.

use anyhow::{Result, bail};

use crate::application::ports::{ConfigRepository, StoreOpener};
use crate::application::settings::SettingsStore;
use crate::domain::template::TemplateRegistry;

pub struct DefaultRootUseCase<'a> {
    pub config_repo: &'a dyn ConfigRepository,
    pub store_opener: &'a dyn StoreOpener,
    pub templates: &'a TemplateRegistry,
}

impl<'a> DefaultRootUseCase<'a> {
    pub fn get(&self) -> Result<String> {
        let config = self.config_repo.load()?;
        let store = self.store_opener.open(&config);
        SettingsStore::new(store.as_ref(), self.templates)
            .with_configured_root(config.clone_root())
            .get_default_root()
    }

    pub fn set(&self, path: &str) -> Result<()> {
        let path = path.trim();
        if path.is_empty() {
            bail!("clone root must not be empty");
        }
        let config = self.config_repo.load()?;
        let store = self.store_opener.open(&config);
        SettingsStore::new(store.as_ref(), self.templates).set_default_root(path)
    }
}
