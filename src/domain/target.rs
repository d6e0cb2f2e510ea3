//! 입력 URL을 GitHub 호환 호스트의 PR 대상으로 해석하는 모듈.

use anyhow::{Result, bail};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullTarget {
    pub host: String,
    pub owner: String,
    pub repo: String,
    pub number: u64,
    pub url: String,
}

impl PullTarget {
    /// `https://<host>/<owner>/<repo>/pull/<number>` 형태만 허용한다.
    pub fn parse(input: &str) -> Result<Self> {
        let url = Url::parse(input.trim())?;
        let host = url
            .host_str()
            .ok_or_else(|| anyhow::anyhow!("URL host is missing"))?
            .to_string();

        let segments: Vec<String> = url
            .path_segments()
            .map(|s| s.filter(|p| !p.is_empty()).map(ToString::to_string).collect())
            .unwrap_or_default();

        // /owner/repo/pull/<number>[/files|/commits...]
        if segments.len() < 4 || (segments[2] != "pull" && segments[2] != "pulls") {
            bail!("unsupported pull request URL: {input}");
        }

        let Ok(number) = segments[3].parse::<u64>() else {
            bail!("invalid pull request number in URL: {input}");
        };

        Ok(Self {
            url: format!(
                "{}://{}/{}/{}/pull/{}",
                url.scheme(),
                host,
                segments[0],
                segments[1],
                number
            ),
            host,
            owner: segments[0].clone(),
            repo: segments[1].clone(),
            number,
        })
    }
}
