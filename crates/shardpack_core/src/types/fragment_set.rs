use indexmap::IndexSet;
use serde::Serialize;

use super::DocumentUrl;
use crate::BundleError;

/// The documents that become output bundles, in emission order.
///
/// The shell always comes first so that its imports win document ordering. The entrypoint is only
/// a fragment of its own when neither a shell nor explicit fragments are configured.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FragmentSet {
  shell: Option<DocumentUrl>,
  fragments: IndexSet<DocumentUrl>,
}

impl FragmentSet {
  pub fn new(
    entrypoint: Option<DocumentUrl>,
    shell: Option<DocumentUrl>,
    fragments: Vec<DocumentUrl>,
  ) -> Result<Self, BundleError> {
    let mut ordered = Vec::with_capacity(fragments.len() + 2);

    if let Some(shell) = &shell {
      ordered.push(shell.clone());
    }

    if let Some(entrypoint) = entrypoint {
      if shell.is_none() && fragments.is_empty() {
        ordered.push(entrypoint);
      }
    }

    ordered.extend(fragments);

    let mut set = IndexSet::with_capacity(ordered.len());
    for url in ordered {
      if set.contains(&url) {
        return Err(BundleError::DuplicateFragment { url });
      }
      set.insert(url);
    }

    Ok(Self {
      shell,
      fragments: set,
    })
  }

  pub fn shell(&self) -> Option<&str> {
    self.shell.as_deref()
  }

  pub fn is_shell(&self, url: &str) -> bool {
    self.shell() == Some(url)
  }

  pub fn contains(&self, url: &str) -> bool {
    self.fragments.contains(url)
  }

  pub fn iter(&self) -> impl Iterator<Item = &DocumentUrl> {
    self.fragments.iter()
  }

  pub fn len(&self) -> usize {
    self.fragments.len()
  }

  pub fn is_empty(&self) -> bool {
    self.fragments.is_empty()
  }
}
