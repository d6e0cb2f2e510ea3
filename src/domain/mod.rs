//! Domain layer
//! 프롬프트 조립 규칙(블록/템플릿/모드/PR 메타)을 외부 의존성 없이 표현한다.

pub mod block;
pub mod mode;
pub mod pull;
pub mod render;
pub mod target;
pub mod template;
