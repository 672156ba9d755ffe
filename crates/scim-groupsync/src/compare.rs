//! Comparing group snapshots.

use std::collections::HashSet;

use scim_prop::Resource;
use tracing::debug;

use crate::diff::Diff;

const MEMBERS: &str = "members";
const MEMBER_VALUE: &str = "value";
const DISPLAY_NAME: &str = "displayName";

/// A change to a group, with at least one snapshot present.
#[derive(Clone, Copy, Debug)]
pub enum GroupChange<'a> {
    Created { after: &'a Resource },
    Modified { before: &'a Resource, after: &'a Resource },
    Deleted { before: &'a Resource },
}

impl<'a> GroupChange<'a> {
    /// `None` when both snapshots are absent.
    pub fn from_snapshots(before: Option<&'a Resource>, after: Option<&'a Resource>) -> Option<Self> {
        match (before, after) {
            (None, None) => None,
            (None, Some(after)) => Some(Self::Created { after }),
            (Some(before), None) => Some(Self::Deleted { before }),
            (Some(before), Some(after)) => Some(Self::Modified { before, after }),
        }
    }

    /// The resource as it was before the change, if it existed.
    pub fn before(&self) -> Option<&'a Resource> {
        match *self {
            Self::Created { .. } => None,
            Self::Modified { before, .. } | Self::Deleted { before } => Some(before),
        }
    }

    /// The resource as it is after the change, if it still exists.
    pub fn after(&self) -> Option<&'a Resource> {
        match *self {
            Self::Deleted { .. } => None,
            Self::Modified { after, .. } | Self::Created { after } => Some(after),
        }
    }
}

impl Diff {
    /// Diff the snapshots carried by `change`.
    pub fn from_change(change: GroupChange<'_>) -> Diff {
        let properties_changed = match change {
            GroupChange::Modified { before, after } => display_name(before) != display_name(after),
            GroupChange::Created { .. } | GroupChange::Deleted { .. } => false,
        };
        let before = change.before().map(member_ids).unwrap_or_default();
        let after = change.after().map(member_ids).unwrap_or_default();
        let diff = Diff::from_members(before, after, properties_changed);
        debug!(
            joined = diff.count_joined(),
            stayed = diff.count_stayed(),
            left = diff.count_left(),
            properties_changed,
            "compared group snapshots"
        );
        diff
    }
}

/// Compare two snapshots of the same group.
///
/// # Panics
///
/// Panics if both `before` and `after` are `None`. Use
/// [`GroupChange::from_snapshots`] and [`Diff::from_change`] to handle that
/// case without panicking.
pub fn compare(before: Option<&Resource>, after: Option<&Resource>) -> Diff {
    match GroupChange::from_snapshots(before, after) {
        Some(change) => Diff::from_change(change),
        None => panic!("compare requires at least one group snapshot"),
    }
}

/// Assigned `members[].value` ids of a group.
fn member_ids(group: &Resource) -> HashSet<String> {
    let Some(members) = group.root_property().child(MEMBERS) else {
        return HashSet::new();
    };
    members
        .children()
        .iter()
        .filter_map(|member| member.child(MEMBER_VALUE))
        .filter(|value| !value.is_unassigned())
        .filter_map(|value| value.as_str().map(str::to_string))
        .collect()
}

fn display_name(group: &Resource) -> Option<&str> {
    group
        .root_property()
        .child(DISPLAY_NAME)
        .and_then(|p| p.as_str())
}
