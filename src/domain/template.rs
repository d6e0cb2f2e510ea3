//! 프롬프트 템플릿, 플레이스홀더 토큰, 메타 분석과 lint.

use std::collections::HashMap;
use std::fmt;

use crate::domain::mode::PromptMode;

/// 템플릿에서 인식하는 플레이스홀더 토큰.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    Setup,
    PrDetails,
    PrDetailsBlock,
    FilesList,
    DiffContent,
    Link,
}

impl Token {
    pub const ALL: [Token; 6] = [
        Token::Setup,
        Token::PrDetails,
        Token::PrDetailsBlock,
        Token::FilesList,
        Token::DiffContent,
        Token::Link,
    ];

    /// `{{` `}}` 안에 들어가는 이름(대소문자 구분).
    pub fn name(self) -> &'static str {
        match self {
            Self::Setup => "SETUP",
            Self::PrDetails => "PR_DETAILS",
            Self::PrDetailsBlock => "prDetailsBlock",
            Self::FilesList => "FILES_LIST",
            Self::DiffContent => "DIFF_CONTENT",
            Self::Link => "LINK",
        }
    }

    pub fn placeholder(self) -> String {
        format!("{{{{{}}}}}", self.name())
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }
}

/// 템플릿 본문에 어떤 토큰이 들어 있는지 나타내는 파생 정보.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TemplateMeta {
    pub setup: bool,
    pub pr_details: bool,
    pub pr_details_block: bool,
    pub files_list: bool,
    pub diff_content: bool,
    pub link: bool,
}

impl TemplateMeta {
    pub fn contains(&self, token: Token) -> bool {
        match token {
            Token::Setup => self.setup,
            Token::PrDetails => self.pr_details,
            Token::PrDetailsBlock => self.pr_details_block,
            Token::FilesList => self.files_list,
            Token::DiffContent => self.diff_content,
            Token::Link => self.link,
        }
    }

    pub fn has_pr_details_slot(&self) -> bool {
        self.pr_details || self.pr_details_block
    }
}

/// 토큰별 리터럴 부분 문자열 포함 여부를 계산한다.
pub fn analyse(body: &str) -> TemplateMeta {
    let has = |token: Token| body.contains(&token.placeholder());
    TemplateMeta {
        setup: has(Token::Setup),
        pr_details: has(Token::PrDetails),
        pr_details_block: has(Token::PrDetailsBlock),
        files_list: has(Token::FilesList),
        diff_content: has(Token::DiffContent),
        link: has(Token::Link),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub mode: PromptMode,
    pub body: String,
    pub meta: TemplateMeta,
}

impl Template {
    pub fn new(mode: PromptMode, body: impl Into<String>) -> Self {
        let body = body.into();
        let meta = analyse(&body);
        Self { mode, body, meta }
    }
}

/// 모드별 기본 템플릿 묶음. 생성 후에는 읽기 전용이다.
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    templates: HashMap<PromptMode, Template>,
}

impl TemplateRegistry {
    /// 모든 모드의 본문을 받아 메타를 미리 계산한다.
    pub fn load(source: impl Fn(PromptMode) -> &'static str) -> Self {
        let templates = PromptMode::ALL
            .into_iter()
            .map(|mode| (mode, Template::new(mode, source(mode))))
            .collect();
        Self { templates }
    }

    pub fn get(&self, mode: PromptMode) -> &Template {
        // load()가 모든 모드를 채우므로 항상 존재한다.
        &self.templates[&mode]
    }

    pub fn default_body(&self, mode: PromptMode) -> &str {
        &self.get(mode).body
    }
}

/// 렌더링과 무관한 선택적 템플릿 점검 결과.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateIssue {
    BothPrDetailsTokens,
    MissingPrDetails,
    UnknownToken(String),
}

impl fmt::Display for TemplateIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BothPrDetailsTokens => write!(
                f,
                "template contains both {{{{PR_DETAILS}}}} and {{{{prDetailsBlock}}}}; use only one"
            ),
            Self::MissingPrDetails => write!(
                f,
                "template has no PR details token; PR details will be appended at the end"
            ),
            Self::UnknownToken(name) => {
                write!(f, "unknown token {{{{{name}}}}} will be left as-is")
            }
        }
    }
}

/// PR 상세 토큰 규칙과 미인식 토큰을 점검한다.
pub fn lint(body: &str) -> Vec<TemplateIssue> {
    let meta = analyse(body);
    let mut issues = Vec::new();

    if meta.pr_details && meta.pr_details_block {
        issues.push(TemplateIssue::BothPrDetailsTokens);
    }
    if !meta.has_pr_details_slot() {
        issues.push(TemplateIssue::MissingPrDetails);
    }

    for name in placeholder_names(body) {
        if Token::from_name(name).is_none() {
            let issue = TemplateIssue::UnknownToken(name.to_string());
            if !issues.contains(&issue) {
                issues.push(issue);
            }
        }
    }

    issues
}

/// 본문에 등장하는 `{{NAME}}`의 이름을 순서대로 나열한다.
pub(crate) fn placeholder_names(body: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = body;
    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            break;
        };
        let name = &after[..end];
        if is_token_name(name) {
            names.push(name);
            rest = &after[end + 2..];
        } else {
            rest = after;
        }
    }
    names
}

fn is_token_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyse_flags_each_literal_token() {
        let meta = analyse("{{SETUP}}\n{{PR_DETAILS}}\n{{FILES_LIST}}\n{{LINK}}");
        assert!(meta.setup);
        assert!(meta.pr_details);
        assert!(!meta.pr_details_block);
        assert!(meta.files_list);
        assert!(!meta.diff_content);
        assert!(meta.link);
    }

    #[test]
    fn analyse_is_case_sensitive() {
        let meta = analyse("{{setup}} {{prdetailsblock}} {{ LINK }}");
        assert_eq!(meta, TemplateMeta::default());
    }

    #[test]
    fn alternate_details_token_is_detected_separately() {
        let meta = analyse("{{prDetailsBlock}}");
        assert!(meta.pr_details_block);
        assert!(!meta.pr_details);
        assert!(meta.has_pr_details_slot());
    }

    #[test]
    fn registry_derives_meta_for_every_mode() {
        let registry = TemplateRegistry::load(|mode| match mode {
            PromptMode::Implement => "{{SETUP}}",
            _ => "plain",
        });
        assert!(registry.get(PromptMode::Implement).meta.setup);
        assert_eq!(registry.default_body(PromptMode::Respond), "plain");
        assert_eq!(registry.get(PromptMode::Review).mode, PromptMode::Review);
    }

    #[test]
    fn lint_reports_both_details_tokens() {
        let issues = lint("{{PR_DETAILS}}\n{{prDetailsBlock}}");
        assert_eq!(issues, vec![TemplateIssue::BothPrDetailsTokens]);
    }

    #[test]
    fn lint_reports_missing_details_and_unknown_tokens_once() {
        let issues = lint("{{LINK}} {{TICKET}} {{TICKET}} {{ not a token }}");
        assert_eq!(
            issues,
            vec![
                TemplateIssue::MissingPrDetails,
                TemplateIssue::UnknownToken("TICKET".to_string()),
            ]
        );
    }

    #[test]
    fn lint_accepts_well_formed_template() {
        assert!(lint("{{SETUP}}\n\n{{PR_DETAILS}}\n\n{{DIFF_CONTENT}}").is_empty());
    }
}
