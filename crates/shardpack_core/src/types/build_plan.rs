use super::BundleMap;
use super::DocumentUrl;
use super::FragmentSet;

/// Everything later build steps need to know about the planning decisions.
///
/// Created once per build after planning and only ever borrowed afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildPlan {
  fragments: FragmentSet,
  bundle_map: BundleMap,
  shared_bundle_url: DocumentUrl,
}

impl BuildPlan {
  pub fn new(fragments: FragmentSet, bundle_map: BundleMap, shared_bundle_url: DocumentUrl) -> Self {
    Self {
      fragments,
      bundle_map,
      shared_bundle_url,
    }
  }

  pub fn fragments(&self) -> &FragmentSet {
    &self.fragments
  }

  pub fn bundle_map(&self) -> &BundleMap {
    &self.bundle_map
  }

  pub fn shell(&self) -> Option<&str> {
    self.fragments.shell()
  }

  pub fn shared_bundle_url(&self) -> &str {
    &self.shared_bundle_url
  }

  /// The bundle that carries shared dependencies: the shell when there is one, otherwise the
  /// synthetic shared bundle.
  pub fn shared_dependencies_bundle(&self) -> &str {
    self.shell().unwrap_or(&self.shared_bundle_url)
  }

  /// Dependencies supplied by [`BuildPlan::shared_dependencies_bundle`]
  pub fn shared_dependencies(&self) -> Vec<DocumentUrl> {
    self.bundle_map.imports(self.shared_dependencies_bundle())
  }

  /// Whether a synthetic shared bundle has to be generated
  pub fn has_shared_bundle(&self) -> bool {
    self.shell().is_none()
      && self
        .bundle_map
        .get(&self.shared_bundle_url)
        .is_some_and(|imports| !imports.is_empty())
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn shared_dependencies_come_from_the_shell_when_configured() {
    let fragments = FragmentSet::new(
      None,
      Some(String::from("shell.html")),
      vec![String::from("a.html")],
    )
    .unwrap();
    let mut bundle_map = BundleMap::new();
    bundle_map.add_import("shell.html", "common.html");

    let plan = BuildPlan::new(fragments, bundle_map, String::from("shared-bundle.html"));

    assert_eq!(plan.shared_dependencies_bundle(), "shell.html");
    assert_eq!(plan.shared_dependencies(), vec![String::from("common.html")]);
    assert!(!plan.has_shared_bundle());
  }

  #[test]
  fn shared_bundle_exists_only_with_shared_imports() {
    let fragments = FragmentSet::new(None, None, vec![String::from("a.html")]).unwrap();
    let plan = BuildPlan::new(
      fragments.clone(),
      BundleMap::new(),
      String::from("shared-bundle.html"),
    );
    assert!(!plan.has_shared_bundle());

    let mut bundle_map = BundleMap::new();
    bundle_map.add_import("shared-bundle.html", "common.html");
    let plan = BuildPlan::new(fragments, bundle_map, String::from("shared-bundle.html"));
    assert!(plan.has_shared_bundle());
  }
}
