use indexmap::IndexMap;
use indexmap::IndexSet;
use serde::Serialize;

use super::DocumentUrl;
use crate::BundleError;

/// Facts about one build's import graph, as produced by an analyzer.
///
/// `fragment_to_deps` lists every transitive dependency of a fragment once, in the order it is
/// first used. Its key order is the order fragments are swept in while planning, so analyzers
/// must insert fragments in fragment-set order (shell first).
///
/// `dep_to_fragments` is the reverse mapping. Both maps are closed over the same keys, see
/// [`DependencyIndex::validate`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyIndex {
  pub fragment_to_deps: IndexMap<DocumentUrl, Vec<DocumentUrl>>,
  pub dep_to_fragments: IndexMap<DocumentUrl, IndexSet<DocumentUrl>>,
}

impl DependencyIndex {
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers a fragment without dependencies, keeping its position in the sweep order
  pub fn add_fragment(&mut self, fragment: &str) {
    if !self.fragment_to_deps.contains_key(fragment) {
      self
        .fragment_to_deps
        .insert(fragment.to_string(), Vec::new());
    }
  }

  /// Records that `fragment` uses `dependency`. Repeated edges are ignored.
  pub fn add_dependency(&mut self, fragment: &str, dependency: &str) {
    self.add_fragment(fragment);

    if let Some(deps) = self.fragment_to_deps.get_mut(fragment) {
      if !deps.iter().any(|dep| dep == dependency) {
        deps.push(dependency.to_string());
      }
    }

    self
      .dep_to_fragments
      .entry(dependency.to_string())
      .or_default()
      .insert(fragment.to_string());
  }

  /// Ordered dependencies of a fragment
  pub fn dependencies(&self, fragment: &str) -> Option<&[DocumentUrl]> {
    self.fragment_to_deps.get(fragment).map(|deps| deps.as_slice())
  }

  /// How many fragments use `dependency`, or `None` when the index has never heard of it
  pub fn fragment_count(&self, dependency: &str) -> Option<usize> {
    self
      .dep_to_fragments
      .get(dependency)
      .map(|fragments| fragments.len())
  }

  pub fn fragments(&self) -> impl Iterator<Item = &DocumentUrl> {
    self.fragment_to_deps.keys()
  }

  /// Checks that both mappings describe the same edges.
  pub fn validate(&self) -> Result<(), BundleError> {
    for (fragment, deps) in &self.fragment_to_deps {
      for dependency in deps {
        let is_recorded = self
          .dep_to_fragments
          .get(dependency)
          .is_some_and(|fragments| fragments.contains(fragment));

        if !is_recorded {
          return Err(BundleError::DanglingDependency {
            fragment: fragment.clone(),
            dependency: dependency.clone(),
          });
        }
      }
    }

    for (dependency, fragments) in &self.dep_to_fragments {
      for fragment in fragments {
        let is_listed = self
          .fragment_to_deps
          .get(fragment)
          .is_some_and(|deps| deps.contains(dependency));

        if !is_listed {
          return Err(BundleError::DanglingDependency {
            fragment: fragment.clone(),
            dependency: dependency.clone(),
          });
        }
      }
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn add_dependency_keeps_first_use_order_and_records_reverse_edges() {
    let mut index = DependencyIndex::new();
    index.add_dependency("a.html", "polymer.html");
    index.add_dependency("a.html", "x.html");
    index.add_dependency("a.html", "polymer.html");
    index.add_dependency("b.html", "polymer.html");

    assert_eq!(
      index.dependencies("a.html"),
      Some(&[String::from("polymer.html"), String::from("x.html")][..])
    );
    assert_eq!(index.fragment_count("polymer.html"), Some(2));
    assert_eq!(index.fragment_count("x.html"), Some(1));
    assert_eq!(index.fragment_count("missing.html"), None);
    assert!(index.validate().is_ok());
  }

  #[test]
  fn fragments_keep_insertion_order() {
    let mut index = DependencyIndex::new();
    index.add_fragment("shell.html");
    index.add_dependency("b.html", "x.html");
    index.add_dependency("a.html", "x.html");
    index.add_dependency("shell.html", "x.html");

    assert_eq!(
      index.fragments().collect::<Vec<_>>(),
      vec!["shell.html", "b.html", "a.html"]
    );
  }

  #[test]
  fn validate_rejects_dependencies_without_reverse_entry() {
    let mut index = DependencyIndex::new();
    index
      .fragment_to_deps
      .insert(String::from("a.html"), vec![String::from("ghost.html")]);

    assert!(matches!(
      index.validate(),
      Err(BundleError::DanglingDependency { fragment, dependency })
        if fragment == "a.html" && dependency == "ghost.html"
    ));
  }

  #[test]
  fn validate_rejects_reverse_entries_without_forward_edge() {
    let mut index = DependencyIndex::new();
    index.add_fragment("a.html");
    index.dep_to_fragments.insert(
      String::from("orphan.html"),
      IndexSet::from([String::from("a.html")]),
    );

    assert!(matches!(
      index.validate(),
      Err(BundleError::DanglingDependency { .. })
    ));
  }
}
