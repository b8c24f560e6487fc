use indexmap::IndexMap;
use indexmap::IndexSet;
use serde::Serialize;

use super::DocumentUrl;

/// Which imports every output bundle exposes.
///
/// Keys are bundle identities (the shell, a fragment or the synthetic shared bundle) in the order
/// they were first written to. Each value is an ordered, duplicate-free list of imports. The map
/// only grows through [`BundleMap::add_import`], which is what keeps the planner's output
/// independent of hash ordering.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BundleMap {
  bundles: IndexMap<DocumentUrl, IndexSet<DocumentUrl>>,
}

impl BundleMap {
  pub fn new() -> Self {
    Self::default()
  }

  /// Appends `to` to the imports of `from` unless it is already there
  pub fn add_import(&mut self, from: &str, to: &str) {
    let imports = self.bundles.entry(from.to_string()).or_default();
    if !imports.contains(to) {
      imports.insert(to.to_string());
    }
  }

  pub fn get(&self, bundle: &str) -> Option<&IndexSet<DocumentUrl>> {
    self.bundles.get(bundle)
  }

  /// Imports of `bundle`, empty when the bundle has none
  pub fn imports(&self, bundle: &str) -> Vec<DocumentUrl> {
    self
      .bundles
      .get(bundle)
      .map(|imports| imports.iter().cloned().collect())
      .unwrap_or_default()
  }

  pub fn contains_bundle(&self, bundle: &str) -> bool {
    self.bundles.contains_key(bundle)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&DocumentUrl, &IndexSet<DocumentUrl>)> {
    self.bundles.iter()
  }

  pub fn len(&self) -> usize {
    self.bundles.len()
  }

  pub fn is_empty(&self) -> bool {
    self.bundles.is_empty()
  }
}
