//! 프롬프트 블록(코멘트/디프) 엔티티와 정규 텍스트 포맷터.

use serde::Serialize;

/// 프롬프트에 들어갈 수 있는 콘텐츠 단위.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PromptBlockInput {
    Comment(CommentBlock),
    Diff(DiffBlock),
}

/// PR 설명, 이슈 코멘트, 또는 리뷰 스레드(여러 코멘트를 하나로 묶은 본문).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentBlock {
    pub id: String,
    pub header: String,
    pub comment_body: String,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_avatar_url: Option<String>,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_hunk: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u64>,
}

/// PR 전체, 단일 커밋, 또는 마지막 커밋의 unified diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffBlock {
    pub id: String,
    pub header: String,
    pub patch: String,
}

impl PromptBlockInput {
    pub fn id(&self) -> &str {
        match self {
            Self::Comment(c) => &c.id,
            Self::Diff(d) => &d.id,
        }
    }

    pub fn header(&self) -> &str {
        match self {
            Self::Comment(c) => &c.header,
            Self::Diff(d) => &d.header,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Comment(_) => "comment",
            Self::Diff(_) => "diff",
        }
    }
}

/// 블록 하나를 정규 텍스트로 변환한다.
/// 본문은 그대로 두고, 블록 전체 끝의 공백만 한 번 제거한다.
pub fn format_block(block: &PromptBlockInput) -> String {
    let raw = match block {
        PromptBlockInput::Comment(c) => format!("{}\n\n{}", c.header, c.comment_body),
        PromptBlockInput::Diff(d) => format!(
            "{}\n\n```diff\n{}\n```",
            d.header,
            d.patch.trim_end_matches(['\n', '\r'])
        ),
    };
    raw.trim_end().to_string()
}

/// 입력 순서를 유지한 채 블록들을 빈 줄로 이어 붙인다.
pub fn format_list(blocks: &[PromptBlockInput]) -> String {
    blocks
        .iter()
        .map(format_block)
        .collect::<Vec<_>>()
        .join("\n\n")
        .trim()
        .to_string()
}
