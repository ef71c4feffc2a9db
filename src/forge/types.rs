#[derive(Debug, Clone)]
/// Request to create a new pull request.
pub struct CreatePrRequest {
    pub head_branch: String,
    pub base_branch: String,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone)]
/// Request to attach labels to an issue or pull request.
pub struct AddLabelsRequest {
    pub number: u64,
    pub labels: Vec<String>,
}

#[derive(Debug, Clone)]
/// Request to post a comment on an issue or pull request.
pub struct CreateCommentRequest {
    pub number: u64,
    pub body: String,
}
