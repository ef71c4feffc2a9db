//! Failure reporting for targets that could not be backported.
//!
//! A report renders entirely from captured state (error text, process
//! streams, the original commit list), so the recovery instructions never
//! require another platform query.

use crate::{error::BackportError, target::BackportTarget};

/// Everything needed to explain one failed target on the original change.
#[derive(Debug)]
pub struct FailureReport<'a> {
    pub target: &'a BackportTarget,
    /// Original commits in merge order, for the manual cherry-pick.
    pub commits: &'a [String],
    pub error: &'a BackportError,
}

impl FailureReport<'_> {
    /// Render the comment body posted on the original pull request: the
    /// failure cause, collapsible raw diagnostics when present, and a
    /// copy-pasteable manual recovery procedure.
    pub fn comment_body(&self) -> String {
        let mut body = format!(
            "Backport failed for `{}`: {}\n",
            self.target.base, self.error,
        );

        if !self.error.stderr().is_empty() {
            body.push_str(&details_section("stderr", self.error.stderr()));
        }

        if !self.error.stdout().is_empty() {
            body.push_str(&details_section("stdout", self.error.stdout()));
        }

        body.push_str(&self.recovery_script());
        body
    }

    fn recovery_script(&self) -> String {
        let base = &self.target.base;
        let head = &self.target.head;
        let worktree = format!(".worktree/backport-{base}");
        let commits = self.commits.join(" ");

        format!(
            r"
To backport this change manually, run:

```bash
git fetch origin {base}
git worktree add {worktree} origin/{base}
cd {worktree}
git switch --create {head}
git cherry-pick {commits}
git push --set-upstream origin {head}
cd -
git worktree remove {worktree}
```

Then open a pull request with base `{base}` and head `{head}`.
"
        )
    }
}

fn details_section(title: &str, content: &str) -> String {
    format!(
        "\n<details><summary>{title}</summary>\n\n```\n{content}\n```\n\n</details>\n"
    )
}
