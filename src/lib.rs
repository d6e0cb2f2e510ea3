//! prinbox library root.
//! Clean Architecture + DDD 계층을 외부에 노출한다.

use anyhow::Result;

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interface;

use application::usecases::build_prompt::{PromptRequest, PromptRun};
use interface::cli::AppComposition;

/// 라이브러리 직접 호출용 프롬프트 생성 함수.
pub async fn build_prompt(request: PromptRequest) -> Result<PromptRun> {
    let composition = AppComposition::new(true);
    composition.build_prompt_usecase().execute(request).await
}

/// 설정 점검 JSON 출력용 함수.
pub fn inspect_config_pretty_json() -> Result<String> {
    let composition = AppComposition::default();
    composition.inspect_config_usecase().execute()
}
