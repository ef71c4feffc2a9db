//! Backport target resolution from event state and label text.

use log::*;
use regex::Regex;

use crate::{event::TriggerAction, result::Result};

/// Pattern for backport request labels: `backport <base> [<head>]`.
const LABEL_PATTERN: &str = r"^backport ([^ ]+)(?: ([^ ]+))?$";

/// One unit of backport work: replay the change onto `base` in a new branch
/// named `head`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackportTarget {
    pub base: String,
    pub head: String,
}

/// Compute the targets to process for a trigger.
///
/// A merged-and-closed event considers every label currently on the change; a
/// label addition considers only the new label, so pre-existing backport
/// labels are not re-processed. Labels that do not match the pattern are
/// dropped silently since labels are free-form user text. When the label
/// omits a head branch the name `backport-<pr>-to-<base>` is generated.
///
/// Duplicate bases collapse to the last-seen head while keeping the
/// first-seen position, so processing order stays deterministic.
pub fn resolve(
    trigger: &TriggerAction,
    current_labels: &[String],
    pr_number: u64,
) -> Result<Vec<BackportTarget>> {
    let candidates: Vec<&str> = match trigger {
        TriggerAction::Closed => {
            current_labels.iter().map(String::as_str).collect()
        }
        TriggerAction::Labeled { label } => vec![label.as_str()],
        TriggerAction::Other => vec![],
    };

    let re = Regex::new(LABEL_PATTERN)?;
    let mut targets: Vec<BackportTarget> = vec![];

    for candidate in candidates {
        let Some(caps) = re.captures(candidate) else {
            debug!("ignoring label: {candidate}");
            continue;
        };

        let base = caps[1].to_string();
        let head = caps
            .get(2)
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| format!("backport-{pr_number}-to-{base}"));

        if let Some(existing) = targets.iter_mut().find(|t| t.base == base) {
            existing.head = head;
        } else {
            targets.push(BackportTarget { base, head });
        }
    }

    Ok(targets)
}
