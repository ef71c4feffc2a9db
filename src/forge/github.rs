//! Implements the Forge trait for GitHub
use async_trait::async_trait;
use log::*;
use octocrab::Octocrab;
use serde::Deserialize;

use crate::{
    error::ForgeError,
    forge::{
        config::RemoteConfig,
        traits::Forge,
        types::{AddLabelsRequest, CreateCommentRequest, CreatePrRequest},
    },
};

/// Page size for paginated commit listings.
const PAGE_SIZE: u8 = 100;

#[derive(Debug, Deserialize)]
struct PrCommit {
    pub sha: String,
}

/// GitHub forge implementation using Octocrab for pull request, comment, and
/// label interactions.
pub struct Github {
    config: RemoteConfig,
    instance: Octocrab,
}

impl Github {
    /// Create GitHub client with personal access token authentication and
    /// API base URL configuration.
    pub fn new(config: RemoteConfig) -> Result<Self, ForgeError> {
        let builder = Octocrab::builder()
            .personal_token(config.token.clone())
            .base_uri(config.api_url.clone())
            .map_err(|err| {
                ForgeError::new("configuring api base url", err)
            })?;

        let instance = builder
            .build()
            .map_err(|err| ForgeError::new("building github client", err))?;

        Ok(Self { config, instance })
    }
}

#[async_trait]
impl Forge for Github {
    async fn list_pr_commits(
        &self,
        pr_number: u64,
    ) -> Result<Vec<String>, ForgeError> {
        let mut commits: Vec<String> = vec![];
        let mut page = 1u32;

        loop {
            let route = format!(
                "/repos/{}/{}/pulls/{}/commits?per_page={}&page={}",
                self.config.owner,
                self.config.repo,
                pr_number,
                PAGE_SIZE,
                page,
            );

            let batch: Vec<PrCommit> = self
                .instance
                .get(&route, None::<&()>)
                .await
                .map_err(|err| {
                    ForgeError::new(
                        format!(
                            "listing commits for pull request #{pr_number}"
                        ),
                        err,
                    )
                })?;

            let len = batch.len();
            commits.extend(batch.into_iter().map(|c| c.sha));

            if len < PAGE_SIZE as usize {
                break;
            }

            page += 1;
        }

        debug!("pull request #{pr_number} has {} commits", commits.len());

        Ok(commits)
    }

    async fn create_pr(
        &self,
        req: CreatePrRequest,
    ) -> Result<u64, ForgeError> {
        let pr = self
            .instance
            .pulls(&self.config.owner, &self.config.repo)
            .create(req.title, req.head_branch, req.base_branch)
            .body(req.body)
            .send()
            .await
            .map_err(|err| {
                ForgeError::new("creating pull request", err)
            })?;

        info!("created pull request #{}", pr.number);

        Ok(pr.number)
    }

    async fn add_labels(
        &self,
        req: AddLabelsRequest,
    ) -> Result<(), ForgeError> {
        self.instance
            .issues(&self.config.owner, &self.config.repo)
            .add_labels(req.number, &req.labels)
            .await
            .map_err(|err| {
                ForgeError::new(
                    format!("adding labels to #{}", req.number),
                    err,
                )
            })?;

        Ok(())
    }

    async fn create_comment(
        &self,
        req: CreateCommentRequest,
    ) -> Result<(), ForgeError> {
        self.instance
            .issues(&self.config.owner, &self.config.repo)
            .create_comment(req.number, req.body)
            .await
            .map_err(|err| {
                ForgeError::new(
                    format!("commenting on #{}", req.number),
                    err,
                )
            })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers;

    #[tokio::test]
    async fn builds_client_for_configured_api_url() {
        let github =
            Github::new(test_helpers::create_test_remote_config());
        assert!(github.is_ok());
    }

    #[test]
    fn rejects_invalid_api_urls() {
        let mut config = test_helpers::create_test_remote_config();
        config.api_url = "not a url".to_string();

        let github = Github::new(config);
        assert!(github.is_err());
    }
}
