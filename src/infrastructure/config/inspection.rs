//! 적용 설정 진단(inspection) 뷰 모델.

use std::collections::BTreeMap;

use serde::Serialize;

use super::loader::LoadedConfig;
use super::resolve::resolve_host_token;
use crate::application::config::{DefaultsConfig, HostConfig};
use crate::application::ports::Endpoint;
use crate::infrastructure::store::JsonFileStore;

#[derive(Debug, Clone, Serialize)]
pub struct ConfigInspection {
    pub searched_paths: Vec<String>,
    pub loaded_paths: Vec<String>,
    pub defaults: DefaultsConfig,
    pub effective_defaults: EffectiveDefaults,
    pub hosts: BTreeMap<String, HostInspection>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EffectiveDefaults {
    pub clone_root: Option<String>,
    pub deep_link_scheme: String,
    pub store_path: String,
    pub mode: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HostInspection {
    pub token_source: Option<String>,
    pub token_resolved: bool,
    pub api_base: String,
}

impl ConfigInspection {
    pub(crate) fn from_loaded(loaded: LoadedConfig) -> Self {
        let config = &loaded.config;
        let hosts = config
            .hosts
            .iter()
            .map(|(host, cfg)| (host.clone(), host_inspection(host, cfg)))
            .collect();

        Self {
            searched_paths: loaded
                .searched_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            loaded_paths: loaded
                .loaded_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            defaults: config.defaults.clone(),
            effective_defaults: EffectiveDefaults {
                clone_root: config.clone_root().map(ToString::to_string),
                deep_link_scheme: config.deep_link_scheme(),
                store_path: config
                    .defaults
                    .store_path
                    .clone()
                    .unwrap_or_else(|| JsonFileStore::default_path().display().to_string()),
                mode: config.default_mode().to_string(),
            },
            hosts,
        }
    }
}

fn host_inspection(host: &str, cfg: &HostConfig) -> HostInspection {
    let token_resolution = resolve_host_token(Some(cfg)).ok();
    let endpoint = Endpoint {
        host: host.to_string(),
        api_base: cfg.api_base.clone(),
        token: None,
    };
    HostInspection {
        token_source: token_resolution.as_ref().and_then(|r| r.source.clone()),
        token_resolved: token_resolution
            .as_ref()
            .and_then(|r| r.token.as_ref())
            .is_some(),
        api_base: endpoint.api_base(),
    }
}
