//! 키-값 저장소 팩토리 포트 구현 어댑터.

use crate::application::config::Config;
use crate::application::ports::{KeyValueStore, StoreOpener};
use crate::infrastructure::store::JsonFileStore;

/// `defaults.store_path`(없으면 기본 경로)의 JSON 파일 저장소를 연다.
pub struct JsonStoreOpener;

impl StoreOpener for JsonStoreOpener {
    fn open(&self, config: &Config) -> Box<dyn KeyValueStore> {
        let path = config
            .defaults
            .store_path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(Into::into)
            .unwrap_or_else(JsonFileStore::default_path);
        Box::new(JsonFileStore::new(path))
    }
}
