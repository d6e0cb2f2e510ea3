//! 애플리케이션이 사용하는 설정 스키마(순수 데이터).
//!
//! 주의: 파일/환경변수/프로세스 접근은 `infrastructure`에서만 수행한다.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::mode::PromptMode;

pub const DEFAULT_CLONE_ROOT: &str = "~/git";
pub const DEFAULT_DEEP_LINK_SCHEME: &str = "repoprompt";
pub const DEFAULT_HOST: &str = "github.com";

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// 전역 기본값
    #[serde(default)]
    pub defaults: DefaultsConfig,
    /// GitHub 호환 호스트별 인증/엔드포인트 설정
    #[serde(default)]
    pub hosts: HashMap<String, HostConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct DefaultsConfig {
    /// 로컬 clone 루트(저장소에 값이 없을 때 사용)
    pub clone_root: Option<String>,
    /// 외부 도구 딥링크 scheme
    pub deep_link_scheme: Option<String>,
    /// 키-값 저장소 파일 경로
    pub store_path: Option<String>,
    /// 기본 프롬프트 모드
    pub mode: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct HostConfig {
    /// 고정 토큰(민감정보: 권장하지 않음)
    pub token: Option<String>,
    /// 토큰을 읽을 환경변수 이름
    pub token_env: Option<String>,
    /// 토큰을 stdout으로 출력하는 커맨드(예: ["gh","auth","token"])
    pub token_command: Option<Vec<String>>,
    /// API base URL override(선택)
    pub api_base: Option<String>,
}

impl Config {
    pub fn clone_root(&self) -> Option<&str> {
        self.defaults
            .clone_root
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    pub fn deep_link_scheme(&self) -> String {
        self.defaults
            .deep_link_scheme
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_DEEP_LINK_SCHEME)
            .to_string()
    }

    /// 설정의 기본 모드. 알 수 없는 값은 implement로 취급한다.
    pub fn default_mode(&self) -> PromptMode {
        self.defaults
            .mode
            .as_deref()
            .and_then(|m| m.parse().ok())
            .unwrap_or(PromptMode::Implement)
    }

    pub fn host_config(&self, host: &str) -> Option<&HostConfig> {
        self.hosts.get(host)
    }

    /// 후순위(나중 파일) 값으로 덮어쓰는 병합 규칙.
    pub fn merge_from(&mut self, other: Config) {
        self.defaults.merge_from(other.defaults);

        for (host, incoming) in other.hosts {
            if let Some(existing) = self.hosts.get_mut(&host) {
                existing.merge_from(incoming);
            } else {
                self.hosts.insert(host, incoming);
            }
        }
    }
}

impl DefaultsConfig {
    pub fn merge_from(&mut self, other: DefaultsConfig) {
        if other.clone_root.is_some() {
            self.clone_root = other.clone_root;
        }
        if other.deep_link_scheme.is_some() {
            self.deep_link_scheme = other.deep_link_scheme;
        }
        if other.store_path.is_some() {
            self.store_path = other.store_path;
        }
        if other.mode.is_some() {
            self.mode = other.mode;
        }
    }
}

impl HostConfig {
    pub fn merge_from(&mut self, other: HostConfig) {
        if other.token.is_some() {
            self.token = other.token;
        }
        if other.token_env.is_some() {
            self.token_env = other.token_env;
        }
        if other.token_command.is_some() {
            self.token_command = other.token_command;
        }
        if other.api_base.is_some() {
            self.api_base = other.api_base;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_config_overrides_field_by_field() {
        let mut base: Config = serde_json::from_str(
            r#"{"defaults":{"clone_root":"/src","mode":"review"},
                "hosts":{"github.com":{"token_env":"GH","api_base":"https://a"}}}"#,
        )
        .unwrap();
        let next: Config = serde_json::from_str(
            r#"{"defaults":{"clone_root":"/work"},
                "hosts":{"github.com":{"token_env":"GITHUB_TOKEN"},"ghe.corp":{}}}"#,
        )
        .unwrap();

        base.merge_from(next);

        assert_eq!(base.clone_root(), Some("/work"));
        assert_eq!(base.default_mode(), PromptMode::Review);
        let gh = base.host_config("github.com").unwrap();
        assert_eq!(gh.token_env.as_deref(), Some("GITHUB_TOKEN"));
        assert_eq!(gh.api_base.as_deref(), Some("https://a"));
        assert!(base.host_config("ghe.corp").is_some());
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let cfg: Config =
            serde_json::from_str(r#"{"defaults":{"clone_root":"  ","deep_link_scheme":""}}"#)
                .unwrap();
        assert_eq!(cfg.clone_root(), None);
        assert_eq!(cfg.deep_link_scheme(), DEFAULT_DEEP_LINK_SCHEME);
        assert_eq!(cfg.default_mode(), PromptMode::Implement);
    }
}
