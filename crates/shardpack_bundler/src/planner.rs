use shardpack_core::types::BundleMap;
use shardpack_core::types::DependencyIndex;
use shardpack_core::types::FragmentSet;
use shardpack_core::BundleError;

/// Classifies every (fragment, dependency) edge as shared or private.
///
/// Fragments are swept in the dependency index's key order and each fragment's dependencies in
/// document order, rather than iterating the dependency set directly. Shared dependencies are
/// therefore collected in first-use order across the whole fragment set, which makes the shared
/// bundle's contents stable from build to build. This assumes fragments agree on the relative
/// order of the imports they share; the shell comes first so its order wins.
///
/// - A dependency used by more than one fragment goes to the shell when there is one. Otherwise
///   it goes to the synthetic shared bundle, and the fragment imports the shared bundle instead.
/// - A dependency used by a single fragment stays with that fragment.
#[derive(Debug)]
pub struct BundlePlanner<'a> {
  fragments: &'a FragmentSet,
  shared_bundle_url: &'a str,
}

impl<'a> BundlePlanner<'a> {
  pub fn new(fragments: &'a FragmentSet, shared_bundle_url: &'a str) -> Self {
    Self {
      fragments,
      shared_bundle_url,
    }
  }

  #[tracing::instrument(level = "debug", skip_all, fields(fragments = index.fragment_to_deps.len()))]
  pub fn plan(&self, index: &DependencyIndex) -> Result<BundleMap, BundleError> {
    let shell = self.fragments.shell();

    if let Some(shell) = shell {
      if index.dependencies(shell).is_none() {
        return Err(BundleError::ShellNotAnalyzed {
          shell: shell.to_string(),
        });
      }
    }

    let mut bundle_map = BundleMap::new();

    for (fragment, dependencies) in &index.fragment_to_deps {
      for dependency in dependencies {
        let fragment_count =
          index
            .fragment_count(dependency)
            .ok_or_else(|| BundleError::DanglingDependency {
              fragment: fragment.clone(),
              dependency: dependency.clone(),
            })?;

        if fragment_count > 1 {
          match shell {
            Some(shell) => {
              tracing::trace!(%fragment, %dependency, fragment_count, "Moving shared dependency to the shell");
              bundle_map.add_import(shell, dependency);
            }
            None => {
              tracing::trace!(%fragment, %dependency, fragment_count, "Moving shared dependency to the shared bundle");
              bundle_map.add_import(self.shared_bundle_url, dependency);
              bundle_map.add_import(fragment, self.shared_bundle_url);
            }
          }
        } else {
          tracing::trace!(%fragment, %dependency, "Keeping private dependency");
          bundle_map.add_import(fragment, dependency);
        }
      }
    }

    tracing::debug!(bundles = bundle_map.len(), "Planned bundles");

    Ok(bundle_map)
  }
}
