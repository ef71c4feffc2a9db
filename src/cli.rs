//! CLI argument parsing and runtime configuration.
use clap::Parser;
use color_eyre::eyre::eyre;
use secrecy::SecretString;
use std::{env, path::PathBuf};

use crate::{
    event::PullRequestEvent, forge::config::RemoteConfig, result::Result,
};

/// Default title template applied to created backport pull requests.
pub const DEFAULT_TITLE_TEMPLATE: &str =
    "[Backport {{base}}] {{originalTitle}}";

/// CLI arguments for a backport run.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, default_value = "")]
    /// Path to the pull_request event payload. Falls back to
    /// GITHUB_EVENT_PATH env var.
    pub event_path: String,

    #[arg(long, default_value = "")]
    /// Access token used for API calls and pushes. Falls back to
    /// GITHUB_TOKEN env var.
    pub github_token: String,

    #[arg(long, default_value = "")]
    /// Server url hosting the repository. Falls back to GITHUB_SERVER_URL
    /// env var, then https://github.com.
    pub github_server_url: String,

    #[arg(long, default_value = "")]
    /// API base url. Falls back to GITHUB_API_URL env var, then
    /// https://api.github.com.
    pub github_api_url: String,

    #[arg(long = "label")]
    /// Extra label to add to each created backport pull request. Repeatable.
    pub labels: Vec<String>,

    #[arg(long, default_value = DEFAULT_TITLE_TEMPLATE)]
    /// Title template for created pull requests. Supports {{base}} and
    /// {{originalTitle}} placeholders.
    pub title_template: String,

    #[arg(long, default_value = "")]
    /// Directory to clone the repository into. Defaults to a per-change
    /// directory under the system temp dir.
    pub workdir: String,

    #[arg(long, default_value = "github-actions[bot]")]
    /// Committer name for replayed commits.
    pub git_user_name: String,

    #[arg(
        long,
        default_value = "github-actions[bot]@users.noreply.github.com"
    )]
    /// Committer email for replayed commits.
    pub git_user_email: String,

    #[arg(long, default_value_t = false)]
    /// Enable debug logging.
    pub debug: bool,
}

impl Args {
    /// Resolve the event payload path from arguments or the environment.
    pub fn get_event_path(&self) -> Result<PathBuf> {
        if !self.event_path.is_empty() {
            return Ok(PathBuf::from(&self.event_path));
        }

        if let Ok(path) = env::var("GITHUB_EVENT_PATH")
            && !path.is_empty()
        {
            return Ok(PathBuf::from(path));
        }

        Err(eyre!("must provide --event-path or set GITHUB_EVENT_PATH"))
    }

    /// Configure the remote connection for the event's repository.
    pub fn get_remote(&self, event: &PullRequestEvent) -> Result<RemoteConfig> {
        let token = self.get_token()?;

        let server_url = resolve_with_env(
            &self.github_server_url,
            "GITHUB_SERVER_URL",
            "https://github.com",
        );

        let api_url = resolve_with_env(
            &self.github_api_url,
            "GITHUB_API_URL",
            "https://api.github.com",
        );

        let (scheme, host) = split_server_url(&server_url)?;

        Ok(RemoteConfig {
            host,
            scheme,
            api_url,
            owner: event.repository.owner.login.clone(),
            repo: event.repository.name.clone(),
            token,
        })
    }

    fn get_token(&self) -> Result<SecretString> {
        if !self.github_token.is_empty() {
            return Ok(SecretString::from(self.github_token.clone()));
        }

        if let Ok(token) = env::var("GITHUB_TOKEN")
            && !token.is_empty()
        {
            return Ok(SecretString::from(token));
        }

        Err(eyre!("must set github token"))
    }
}

/// Pick the explicit argument, then the env var, then the default.
fn resolve_with_env(arg: &str, var: &str, default: &str) -> String {
    if !arg.is_empty() {
        return arg.to_string();
    }

    if let Ok(value) = env::var(var)
        && !value.is_empty()
    {
        return value;
    }

    default.to_string()
}

/// Validate a server url and split it into scheme and host.
fn split_server_url(url: &str) -> Result<(String, String)> {
    let (scheme, host) = url
        .split_once("://")
        .ok_or_else(|| eyre!("invalid server url: {url}"))?;

    match scheme {
        "http" | "https" => Ok((
            scheme.to_string(),
            host.trim_end_matches('/').to_string(),
        )),
        _ => Err(eyre!(
            "only http and https schemes are supported for server urls"
        )),
    }
}
