//! Target divergence states

use std::fmt;

use serde::Serialize;

/// How a provisioned working copy should differ from its remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetState {
    /// In sync, no local modifications
    Clean,
    /// Local has unpublished commits
    Ahead,
    /// Remote has commits the local copy lacks
    Behind,
    /// A tracked file is modified but uncommitted
    Dirty,
    /// A file exists outside version control
    Untracked,
}

impl TargetState {
    /// Non-clean states in the order names are matched against them.
    pub const DIVERGENT: [TargetState; 4] =
        [Self::Ahead, Self::Behind, Self::Dirty, Self::Untracked];

    /// Derive the target state from a repository name.
    ///
    /// A name containing `Ahead`, `Behind`, `Dirty` or `Untracked`
    /// (case-sensitive, first match in that order) selects that state;
    /// anything else is `Clean`.
    pub fn from_name(name: &str) -> Self {
        Self::DIVERGENT
            .into_iter()
            .find(|state| name.contains(state.marker()))
            .unwrap_or(Self::Clean)
    }

    /// The substring that selects this state.
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Clean => "Clean",
            Self::Ahead => "Ahead",
            Self::Behind => "Behind",
            Self::Dirty => "Dirty",
            Self::Untracked => "Untracked",
        }
    }

    pub fn is_clean(&self) -> bool {
        *self == Self::Clean
    }

    /// Whether this state needs an auxiliary clone.
    pub fn needs_aux_clone(&self) -> bool {
        *self == Self::Behind
    }
}

impl fmt::Display for TargetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Alpha", TargetState::Clean)]
    #[case("ght-Clean", TargetState::Clean)]
    #[case("ght-Ahead", TargetState::Ahead)]
    #[case("RepoBehind", TargetState::Behind)]
    #[case("DirtyRepo", TargetState::Dirty)]
    #[case("x-Untracked-y", TargetState::Untracked)]
    #[case("behind", TargetState::Clean)]
    #[case("AheadAndBehind", TargetState::Ahead)]
    fn test_from_name(#[case] name: &str, #[case] expected: TargetState) {
        assert_eq!(TargetState::from_name(name), expected);
    }

    #[test]
    fn test_only_behind_needs_aux_clone() {
        assert!(TargetState::Behind.needs_aux_clone());
        assert!(!TargetState::Ahead.needs_aux_clone());
        assert!(!TargetState::Clean.needs_aux_clone());
    }
}
