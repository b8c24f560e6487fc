use thiserror::Error;

use crate::types::DocumentUrl;

/// Every way a build can fail. None of these are recoverable inside a build: they all surface to
/// the caller and nothing is emitted.
#[derive(Error, Debug)]
pub enum BundleError {
  #[error("{url} is listed more than once in the fragment set")]
  DuplicateFragment { url: DocumentUrl },

  #[error("Fragment {url} would be overwritten by the shared bundle of the same URL")]
  SharedBundleCollision { url: DocumentUrl },

  #[error("{fragment} depends on {dependency}, which is missing from the dependency index")]
  DanglingDependency {
    fragment: DocumentUrl,
    dependency: DocumentUrl,
  },

  #[error("Shell {shell} is configured but was not found in the analyzer output")]
  ShellNotAnalyzed { shell: DocumentUrl },

  #[error("{url} was never registered with the analyzer")]
  MissingDocument { url: DocumentUrl },

  #[error("Failed to analyze dependencies: {0}")]
  Analysis(#[source] anyhow::Error),

  #[error("Failed to rewrite imports of {url}: {source}")]
  Format {
    url: DocumentUrl,
    #[source]
    source: anyhow::Error,
  },

  #[error("Failed to inline {url}: {source}")]
  Inline {
    url: DocumentUrl,
    #[source]
    source: anyhow::Error,
  },

  #[error("Inlining task did not complete: {0}")]
  TaskFailed(String),
}

impl BundleError {
  /// The document the error is about, when there is one
  pub fn url(&self) -> Option<&str> {
    match self {
      BundleError::DuplicateFragment { url }
      | BundleError::SharedBundleCollision { url }
      | BundleError::MissingDocument { url }
      | BundleError::Format { url, .. }
      | BundleError::Inline { url, .. } => Some(url),
      BundleError::DanglingDependency { fragment, .. } => Some(fragment),
      BundleError::ShellNotAnalyzed { shell } => Some(shell),
      BundleError::Analysis(_) | BundleError::TaskFailed(_) => None,
    }
  }
}
