//! Repository descriptors and their deterministic expansion

use ght_fs::NormalizedPath;
use serde::Serialize;

use crate::credential::Credential;
use crate::state::TargetState;

/// Prefix of the auxiliary clone directory next to a working copy.
pub const AUX_PREFIX: &str = "_";

/// Everything needed to provision one repository.
///
/// Models never share paths or remotes, so they can be driven concurrently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoModel {
    /// Requested name, e.g. `ght-Ahead`
    pub name: String,
    /// `owner/name` on the host, e.g. `jychri/ght-Ahead`
    pub remote_id: String,
    /// Working copy, `<root>/<name>`
    pub local_path: NormalizedPath,
    /// Auxiliary clone, `<root>/_<name>`; only for `Behind`
    pub aux_path: Option<NormalizedPath>,
    pub target: TargetState,
}

impl RepoModel {
    pub fn new(credential: &Credential, root: &NormalizedPath, name: &str) -> Self {
        let target = TargetState::from_name(name);
        let aux_path = target
            .needs_aux_clone()
            .then(|| root.join(&format!("{AUX_PREFIX}{name}")));

        Self {
            name: name.to_string(),
            remote_id: format!("{}/{}", credential.username, name),
            local_path: root.join(name),
            aux_path,
            target,
        }
    }

    /// File name of the seed document, `<name>.md`.
    pub fn seed_file_name(&self) -> String {
        format!("{}.md", self.name)
    }

    /// Full path of the seed document in the working copy.
    pub fn seed_path(&self) -> NormalizedPath {
        self.local_path.join(&self.seed_file_name())
    }
}

/// Expands requested names into models.
pub struct ModelRegistry;

impl ModelRegistry {
    /// One model per name, in input order. Empty input gives an empty list.
    pub fn expand(
        credential: &Credential,
        root: &NormalizedPath,
        names: &[String],
    ) -> Vec<RepoModel> {
        names
            .iter()
            .map(|name| RepoModel::new(credential, root, name))
            .collect()
    }
}
