//! 호스트 설정(token/env/cmd)을 실제 토큰으로 해석한다.
//!
//! 환경변수 조회와 프로세스 실행은 이 모듈에서만 한다.

use std::env;
use std::process::Command;

use anyhow::{Context, Result, bail};
use tracing::debug;

use crate::application::config::HostConfig;
use crate::application::ports::HostTokenResolution;

/// 토큰을 얻을 수 있는 설정 항목 하나.
enum TokenSource<'a> {
    Inline(&'a str),
    Env(&'a str),
    Command(&'a [String]),
}

impl TokenSource<'_> {
    fn label(&self) -> String {
        match self {
            Self::Inline(_) => "inline".to_string(),
            Self::Env(name) => format!("env:{name}"),
            Self::Command(cmd) => format!("cmd:{}", cmd.join(" ")),
        }
    }

    /// 토큰 또는 진단용 실패 사유.
    fn fetch(&self) -> std::result::Result<String, &'static str> {
        let raw = match self {
            Self::Inline(token) => token.to_string(),
            Self::Env(name) => env::var(name).map_err(|_| "missing")?,
            Self::Command(cmd) => run_token_command(cmd).map_err(|err| {
                debug!(error = %format!("{err:#}"), "token command failed");
                "failed"
            })?,
        };
        match raw.trim() {
            "" if matches!(self, Self::Env(_)) => Err("missing"),
            "" => Err("empty"),
            token => Ok(token.to_string()),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// 설정된 항목만 inline -> env -> command 순서로 나열한다.
fn token_sources(cfg: &HostConfig) -> Vec<TokenSource<'_>> {
    let mut sources = Vec::new();
    if let Some(token) = non_blank(&cfg.token) {
        sources.push(TokenSource::Inline(token));
    }
    if let Some(name) = non_blank(&cfg.token_env) {
        sources.push(TokenSource::Env(name));
    }
    if let Some(cmd) = cfg
        .token_command
        .as_deref()
        .filter(|cmd| cmd.iter().any(|s| !s.trim().is_empty()))
    {
        sources.push(TokenSource::Command(cmd));
    }
    sources
}

/// 처음 얻어진 토큰을 쓴다. 모두 실패하면 마지막 실패 사유를 출처로 남긴다.
pub fn resolve_host_token(host_cfg: Option<&HostConfig>) -> Result<HostTokenResolution> {
    let mut last_miss = None;
    for source in host_cfg.map(token_sources).unwrap_or_default() {
        match source.fetch() {
            Ok(token) => {
                return Ok(HostTokenResolution {
                    token: Some(token),
                    source: Some(source.label()),
                });
            }
            Err(reason) => last_miss = Some(format!("{} ({reason})", source.label())),
        }
    }
    Ok(HostTokenResolution {
        token: None,
        source: last_miss,
    })
}

fn run_token_command(cmd: &[String]) -> Result<String> {
    let (program, args) = cmd.split_first().context("token_command is empty")?;
    let program = program.trim();
    if program.is_empty() {
        bail!("token_command has no program");
    }

    let output = Command::new(program)
        .args(args)
        .output()
        .with_context(|| format!("failed to run token command: {program}"))?;
    if !output.status.success() {
        bail!("token command failed: {program} ({})", output.status);
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
