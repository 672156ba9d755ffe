//! Membership diff between two snapshots of a group.

use std::collections::HashSet;

/// Members that joined, stayed in, or left a group, plus whether the
/// group's own properties changed.
///
/// The three sets are disjoint. Iteration order is unspecified.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Diff {
    pub(crate) joined: HashSet<String>,
    pub(crate) stayed: HashSet<String>,
    pub(crate) left: HashSet<String>,
    pub(crate) properties_changed: bool,
}

impl Diff {
    /// Classify member ids of the `before` and `after` snapshots.
    pub(crate) fn from_members(
        before: HashSet<String>,
        after: HashSet<String>,
        properties_changed: bool,
    ) -> Self {
        let mut diff = Diff {
            properties_changed,
            ..Diff::default()
        };
        for id in before {
            if after.contains(&id) {
                diff.stayed.insert(id);
            } else {
                diff.left.insert(id);
            }
        }
        for id in after {
            if !diff.stayed.contains(&id) {
                diff.joined.insert(id);
            }
        }
        diff
    }

    /// Number of members that joined.
    pub fn count_joined(&self) -> usize {
        self.joined.len()
    }

    /// Number of members that stayed.
    pub fn count_stayed(&self) -> usize {
        self.stayed.len()
    }

    /// Number of members that left.
    pub fn count_left(&self) -> usize {
        self.left.len()
    }

    /// Call `visit` with every member that joined.
    pub fn for_each_joined(&self, visit: impl FnMut(&str)) {
        for_each(&self.joined, visit);
    }

    /// Call `visit` with every member that stayed.
    pub fn for_each_stayed(&self, visit: impl FnMut(&str)) {
        for_each(&self.stayed, visit);
    }

    /// Call `visit` with every member that left.
    pub fn for_each_left(&self, visit: impl FnMut(&str)) {
        for_each(&self.left, visit);
    }

    /// Ids only in the later snapshot.
    pub fn joined(&self) -> impl Iterator<Item = &str> {
        self.joined.iter().map(String::as_str)
    }

    /// Ids in both snapshots.
    pub fn stayed(&self) -> impl Iterator<Item = &str> {
        self.stayed.iter().map(String::as_str)
    }

    /// Ids only in the earlier snapshot.
    pub fn left(&self) -> impl Iterator<Item = &str> {
        self.left.iter().map(String::as_str)
    }

    /// Returns `true` if `displayName` differs between two present
    /// snapshots. Always `false` for creation and deletion.
    pub fn properties_changed(&self) -> bool {
        self.properties_changed
    }

    /// Returns `true` if nobody joined or left and no property changed.
    pub fn is_empty(&self) -> bool {
        self.joined.is_empty() && self.left.is_empty() && !self.properties_changed
    }
}

fn for_each(set: &HashSet<String>, mut visit: impl FnMut(&str)) {
    for id in set {
        visit(id);
    }
}
