//! Application layer
//! 포트(추상 인터페이스)를 통해 인프라를 사용하며 프롬프트 조립 흐름을 정의한다.

pub mod config;
pub mod ports;
pub mod prompt_builder;
pub mod settings;
pub mod usecases;
