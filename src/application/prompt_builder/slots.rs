//! 슬롯 값 계산과 PR 상세 토큰 우선순위를 반영한 최종 렌더링.

use crate::domain::pull::{DiffInclusionOptions, PullRequest, ResolvedPullMeta};
use crate::domain::render::{Slots, render};
use crate::domain::template::{Token, analyse};

/// 로컬 clone에서 PR 브랜치로 이동하는 셸 스니펫.
/// 브랜치를 모르면 `cd`만 남긴다.
pub fn setup_slot(meta: &ResolvedPullMeta) -> String {
    let branch = meta.branch.trim();
    if branch.is_empty() {
        return format!("cd {}", meta.root_path);
    }
    format!(
        "cd {}\ngit fetch origin\ngit checkout {}",
        meta.root_path, branch
    )
}

/// PR 전체 diff를 넣지 않을 때만 변경 파일 목록을 채운다.
pub fn files_list_slot(meta: &ResolvedPullMeta, options: &DiffInclusionOptions) -> String {
    if options.include_pr || meta.files.is_empty() {
        return String::new();
    }
    let mut out = format!("### files changed ({})", meta.files.len());
    for path in &meta.files {
        out.push_str("\n- ");
        out.push_str(path);
    }
    out
}

pub fn link_slot(pull: &PullRequest) -> String {
    format!("🔗 {}", pull.url)
}

/// 렌더링 입력으로 쓰이는 슬롯 원재료.
pub(super) struct SlotInputs<'a> {
    pub pull: &'a PullRequest,
    pub options: &'a DiffInclusionOptions,
    pub meta: &'a ResolvedPullMeta,
    pub pr_details: String,
    pub diff_content: String,
}

/// 템플릿에 들어 있는 PR 상세 토큰에 맞춰 슬롯을 구성한다.
/// `prDetailsBlock`이 있으면 그 토큰만 상세 내용을 받고 `PR_DETAILS`는 비운다.
pub(super) fn compute_slots(template: &str, inputs: &SlotInputs<'_>) -> Slots {
    let meta = analyse(template);
    let (details, block) = if meta.pr_details_block {
        (String::new(), inputs.pr_details.clone())
    } else {
        (inputs.pr_details.clone(), String::new())
    };

    let mut slots = Slots::new();
    slots.insert(Token::Setup.name().to_string(), setup_slot(inputs.meta));
    slots.insert(Token::PrDetails.name().to_string(), details);
    slots.insert(Token::PrDetailsBlock.name().to_string(), block);
    slots.insert(
        Token::FilesList.name().to_string(),
        files_list_slot(inputs.meta, inputs.options),
    );
    slots.insert(
        Token::DiffContent.name().to_string(),
        inputs.diff_content.clone(),
    );
    slots.insert(Token::Link.name().to_string(), link_slot(inputs.pull));
    slots
}

/// 템플릿을 렌더링한다. PR 상세 토큰이 전혀 없으면 상세 내용을 끝에 덧붙인다.
pub(super) fn render_prompt(template: &str, inputs: &SlotInputs<'_>) -> String {
    let slots = compute_slots(template, inputs);
    let rendered = render(template, &slots);

    if analyse(template).has_pr_details_slot() {
        return rendered.trim().to_string();
    }

    let rendered = rendered.trim();
    if rendered.is_empty() {
        inputs.pr_details.trim().to_string()
    } else {
        format!("{}\n\n{}", rendered, inputs.pr_details.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(files: &[&str]) -> ResolvedPullMeta {
        ResolvedPullMeta {
            owner: "owner".to_string(),
            repo: "myrepo".to_string(),
            branch: "feature/login".to_string(),
            files: files.iter().map(|f| f.to_string()).collect(),
            root_path: "/src/myrepo".to_string(),
        }
    }

    fn pull() -> PullRequest {
        PullRequest {
            id: "p1".to_string(),
            number: 123,
            title: "My Test PR".to_string(),
            body: "PR Body here.".to_string(),
            url: "https://github.com/owner/myrepo/pull/123".to_string(),
            ..Default::default()
        }
    }

    fn inputs<'a>(
        pull: &'a PullRequest,
        options: &'a DiffInclusionOptions,
        meta: &'a ResolvedPullMeta,
    ) -> SlotInputs<'a> {
        SlotInputs {
            pull,
            options,
            meta,
            pr_details: "## PR #123: My Test PR\n\nPR Body here.".to_string(),
            diff_content: String::new(),
        }
    }

    #[test]
    fn files_list_lists_every_file() {
        let options = DiffInclusionOptions::default();
        assert_eq!(
            files_list_slot(&meta(&["fileA.ts", "fileB.ts"]), &options),
            "### files changed (2)\n- fileA.ts\n- fileB.ts"
        );
    }

    #[test]
    fn files_list_is_empty_with_full_pr_diff_or_no_files() {
        let with_pr = DiffInclusionOptions {
            include_pr: true,
            ..Default::default()
        };
        assert_eq!(files_list_slot(&meta(&["a.rs"]), &with_pr), "");
        assert_eq!(
            files_list_slot(&meta(&[]), &DiffInclusionOptions::default()),
            ""
        );
    }

    #[test]
    fn setup_uses_root_and_branch() {
        assert_eq!(
            setup_slot(&meta(&[])),
            "cd /src/myrepo\ngit fetch origin\ngit checkout feature/login"
        );
        let mut m = meta(&[]);
        m.branch.clear();
        assert_eq!(setup_slot(&m), "cd /src/myrepo");
    }

    #[test]
    fn link_has_prefix() {
        assert_eq!(
            link_slot(&pull()),
            "🔗 https://github.com/owner/myrepo/pull/123"
        );
    }

    #[test]
    fn pr_details_block_token_takes_the_details() {
        let (p, o, m) = (pull(), DiffInclusionOptions::default(), meta(&[]));
        let out = render_prompt("{{prDetailsBlock}}", &inputs(&p, &o, &m));
        assert_eq!(out, "## PR #123: My Test PR\n\nPR Body here.");
    }

    #[test]
    fn both_tokens_render_details_once() {
        let (p, o, m) = (pull(), DiffInclusionOptions::default(), meta(&[]));
        let out = render_prompt("{{PR_DETAILS}}\n\n{{prDetailsBlock}}", &inputs(&p, &o, &m));
        assert_eq!(out.matches("PR Body here.").count(), 1);
        assert!(!out.contains("{{"));
    }

    #[test]
    fn template_without_details_token_gets_details_appended() {
        let (p, o, m) = (pull(), DiffInclusionOptions::default(), meta(&[]));
        let out = render_prompt("Please help.\n\n{{LINK}}\n", &inputs(&p, &o, &m));
        assert_eq!(
            out,
            "Please help.\n\n🔗 https://github.com/owner/myrepo/pull/123\n\n## PR #123: My Test PR\n\nPR Body here."
        );
        assert_eq!(out.matches("PR Body here.").count(), 1);
    }

    #[test]
    fn empty_template_yields_details_only() {
        let (p, o, m) = (pull(), DiffInclusionOptions::default(), meta(&[]));
        let out = render_prompt("", &inputs(&p, &o, &m));
        assert_eq!(out, "## PR #123: My Test PR\n\nPR Body here.");
    }
}
