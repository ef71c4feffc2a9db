//! Traits related to remote git forges
use async_trait::async_trait;

use crate::{
    error::ForgeError,
    forge::types::{
        AddLabelsRequest, CreateCommentRequest, CreatePrRequest,
    },
};

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait Forge: Send + Sync {
    /// Ordered commit identifiers belonging to a pull request, in merge
    /// order as returned by the platform.
    async fn list_pr_commits(
        &self,
        pr_number: u64,
    ) -> Result<Vec<String>, ForgeError>;

    /// Open a pull request and return its number.
    async fn create_pr(
        &self,
        req: CreatePrRequest,
    ) -> Result<u64, ForgeError>;

    /// Attach labels to an issue or pull request.
    async fn add_labels(
        &self,
        req: AddLabelsRequest,
    ) -> Result<(), ForgeError>;

    /// Post a comment on an issue or pull request.
    async fn create_comment(
        &self,
        req: CreateCommentRequest,
    ) -> Result<(), ForgeError>;
}
