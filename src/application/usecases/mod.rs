//! 인터페이스 계층이 호출하는 유스케이스 모음.

pub mod build_prompt;
pub mod default_root;
pub mod inspect_config;
pub mod manage_template;
