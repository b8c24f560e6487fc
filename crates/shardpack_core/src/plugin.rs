//! Collaborators the bundler drives but does not implement.
//!
//! The bundler only decides *what* each output document imports. Discovering dependencies,
//! editing import declarations and producing final document text are delegated to these traits.

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use serde::Serialize;

use crate::types::DependencyIndex;
use crate::types::Document;
use crate::types::DocumentUrl;
use crate::types::ShellRewrite;

pub type AnalyzerRef = Arc<dyn Analyzer + Send + Sync>;
pub type InlinerRef = Arc<dyn Inliner + Send + Sync>;
pub type DocumentFormatRef = Arc<dyn DocumentFormat + Send + Sync>;

/// Fact base for one build: dependency discovery plus a registry of input documents.
#[automock]
#[async_trait]
pub trait Analyzer: Debug {
  /// Discovers the import graph of every fragment.
  ///
  /// Fragments must be keyed in fragment-set order and the two mappings must be closed over the
  /// same dependencies.
  async fn dependency_index(&self) -> anyhow::Result<DependencyIndex>;

  /// Looks up a previously registered document
  fn get_file(&self, url: &str) -> Option<Document>;

  /// Registers a document so that later lookups, including the inliner's, can resolve it
  fn add_file(&self, document: Document);
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineOptions {
  /// Imports to add to the document. These reference other output bundles and stay as imports.
  pub added_imports: Vec<String>,
  /// Root-relative URLs of imports another bundle already supplies. They are stripped wherever
  /// they appear in the document's import graph.
  pub excluded_imports: Vec<DocumentUrl>,
  pub inline_scripts: bool,
  pub inline_css: bool,
}

/// Produces the final text of one output document.
#[automock]
#[async_trait]
pub trait Inliner: Debug {
  async fn process(&self, url: &str, options: InlineOptions) -> anyhow::Result<String>;
}

/// Textual operations on import declarations of a document format.
#[automock]
pub trait DocumentFormat: Debug {
  /// Import hrefs declared directly by a document, as written
  fn declared_imports(&self, contents: &str) -> anyhow::Result<Vec<String>>;

  /// Applies a shell rewrite and returns the new document text
  fn apply_shell_rewrite(&self, contents: &str, rewrite: &ShellRewrite) -> anyhow::Result<String>;

  /// A document that consists of nothing but the given imports, in order
  fn import_document(&self, imports: &[DocumentUrl]) -> String;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[derive(Debug)]
  struct TestInliner {}

  #[async_trait]
  impl Inliner for TestInliner {
    async fn process(&self, url: &str, _options: InlineOptions) -> anyhow::Result<String> {
      Ok(url.to_string())
    }
  }

  #[test]
  fn can_be_dyn() {
    let _inliner: InlinerRef = Arc::new(TestInliner {});
    let _analyzer: AnalyzerRef = Arc::new(MockAnalyzer::new());
    let _format: DocumentFormatRef = Arc::new(MockDocumentFormat::new());
  }
}
