use log::warn;
use serde::{Deserialize, Serialize};

use super::model::Node;
use super::path::{PathSpec, Segment};
use crate::error::ResolutionFailure;

/// What to do when a wildcard segment has more than one candidate child.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WildcardPolicy {
    /// Take the lexicographically smallest name and log a warning.
    #[default]
    FirstSorted,
    /// Fail with [`ResolutionFailure::AmbiguousWildcard`].
    Strict,
}

/// Walk `path` from `root`, one segment at a time.
///
/// Wildcards pick among matching children in lexicographic order, so the
/// same file always resolves to the same node.
pub fn resolve_node<N: Node>(
    root: &N,
    path: &PathSpec,
    policy: WildcardPolicy,
) -> Result<N, ResolutionFailure> {
    let mut current = root.clone();

    for (at, segment) in path.segments().iter().enumerate() {
        current = match segment {
            Segment::Literal(name) => current.child(name).ok_or_else(|| ResolutionFailure::GroupNotFound {
                name: name.clone(),
                at,
            })?,
            Segment::Wildcard { .. } => {
                let name = pick_wildcard_child(&current, segment, at, policy)?;
                current.child(&name).ok_or(ResolutionFailure::NoSubgroup { at })?
            }
        };
    }

    Ok(current)
}

/// Resolve `path` and read the target as a flat numeric sequence.
pub fn resolve_dataset<N: Node>(
    root: &N,
    path: &PathSpec,
    policy: WildcardPolicy,
) -> Result<Vec<f64>, ResolutionFailure> {
    let node = resolve_node(root, path, policy)?;
    node.values().ok_or_else(|| ResolutionFailure::NotADataset {
        path: path.to_string(),
    })
}

fn pick_wildcard_child<N: Node>(
    node: &N,
    segment: &Segment,
    at: usize,
    policy: WildcardPolicy,
) -> Result<String, ResolutionFailure> {
    let mut candidates: Vec<String> = node
        .child_names()
        .into_iter()
        .filter(|name| segment.matches(name))
        .collect();
    candidates.sort();

    let count = candidates.len();
    if count > 1 {
        match policy {
            WildcardPolicy::Strict => return Err(ResolutionFailure::AmbiguousWildcard { count, at }),
            WildcardPolicy::FirstSorted => warn!(
                "wildcard '{segment}' at segment {at} matches {count} children, using '{}'",
                candidates[0]
            ),
        }
    }

    candidates
        .into_iter()
        .next()
        .ok_or(ResolutionFailure::NoSubgroup { at })
}
