//! 프롬프트 모드(템플릿/기본 포함 옵션 선택 기준).

use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};

use crate::domain::pull::DiffInclusionOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PromptMode {
    Implement,
    Review,
    AdjustPr,
    Respond,
}

impl PromptMode {
    pub const ALL: [PromptMode; 4] = [
        PromptMode::Implement,
        PromptMode::Review,
        PromptMode::AdjustPr,
        PromptMode::Respond,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Implement => "implement",
            Self::Review => "review",
            Self::AdjustPr => "adjust-pr",
            Self::Respond => "respond",
        }
    }

    /// 모드별 기본 포함 옵션.
    /// 사용자가 포함 플래그를 하나도 지정하지 않았을 때 적용한다.
    pub fn default_inclusion(self) -> DiffInclusionOptions {
        match self {
            Self::Implement => DiffInclusionOptions {
                include_pr: true,
                ..Default::default()
            },
            Self::Review => DiffInclusionOptions {
                include_pr: true,
                include_comments: true,
                ..Default::default()
            },
            Self::AdjustPr => DiffInclusionOptions {
                include_comments: true,
                include_last_commit: true,
                ..Default::default()
            },
            Self::Respond => DiffInclusionOptions {
                include_comments: true,
                ..Default::default()
            },
        }
    }
}

impl fmt::Display for PromptMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PromptMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "implement" => Ok(Self::Implement),
            "review" => Ok(Self::Review),
            "adjust-pr" | "adjust_pr" | "adjust" => Ok(Self::AdjustPr),
            "respond" => Ok(Self::Respond),
            other => bail!(
                "unknown prompt mode '{other}' (expected implement, review, adjust-pr or respond)"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_mode_from_its_name() {
        for mode in PromptMode::ALL {
            assert_eq!(mode.as_str().parse::<PromptMode>().unwrap(), mode);
        }
        assert_eq!("adjust_pr".parse::<PromptMode>().unwrap(), PromptMode::AdjustPr);
        assert!("merge".parse::<PromptMode>().is_err());
    }

    #[test]
    fn default_inclusion_never_pairs_pr_with_last_commit() {
        for mode in PromptMode::ALL {
            let opts = mode.default_inclusion();
            assert!(!(opts.include_pr && opts.include_last_commit), "{mode}");
        }
    }
}
