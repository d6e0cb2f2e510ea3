//! 번들 기본 템플릿. 컴파일 시점에 `prompts/`에서 포함한다.

use std::sync::LazyLock;

use crate::domain::mode::PromptMode;
use crate::domain::template::TemplateRegistry;

pub const IMPLEMENT_TEMPLATE: &str = include_str!("../../prompts/implement.md");
pub const REVIEW_TEMPLATE: &str = include_str!("../../prompts/review.md");
pub const ADJUST_PR_TEMPLATE: &str = include_str!("../../prompts/adjust-pr.md");
pub const RESPOND_TEMPLATE: &str = include_str!("../../prompts/respond.md");

static REGISTRY: LazyLock<TemplateRegistry> = LazyLock::new(|| TemplateRegistry::load(bundled_body));

pub fn bundled_body(mode: PromptMode) -> &'static str {
    match mode {
        PromptMode::Implement => IMPLEMENT_TEMPLATE,
        PromptMode::Review => REVIEW_TEMPLATE,
        PromptMode::AdjustPr => ADJUST_PR_TEMPLATE,
        PromptMode::Respond => RESPOND_TEMPLATE,
    }
}

/// 프로세스 전역 템플릿 레지스트리(최초 접근 시 한 번 생성).
pub fn registry() -> &'static TemplateRegistry {
    &REGISTRY
}
