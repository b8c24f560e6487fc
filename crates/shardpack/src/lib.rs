//! Command line front end: configuration, wiring of the HTML implementations and output.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use shardpack_bundler::Bundler;
use shardpack_core::loader::Loader;
use shardpack_filesystem::FileSystemRef;
use shardpack_html::{HtmlDocumentFormat, HtmlImportAnalyzer, HtmlInliner};

use crate::config::BuildConfig;

pub mod cli;
pub mod config;

/// Bundles the configured fragments and writes every bundle to `dest/<url>`.
///
/// Returns the written paths, fragments first and the shared bundle last. Nothing is written
/// unless every bundle was produced.
#[tracing::instrument(level = "info", skip_all, fields(root = %config.root.display()))]
pub async fn build(config: &BuildConfig, fs: FileSystemRef) -> anyhow::Result<Vec<PathBuf>> {
  let fragments = config.fragment_set()?;

  let loader = Arc::new(Loader::new(fs.clone(), config.root.clone()));
  let bundler = Bundler::new(
    config.bundler_options(),
    Arc::new(HtmlImportAnalyzer::new(loader.clone(), fragments.clone())),
    Arc::new(HtmlInliner::new(loader)),
    Arc::new(HtmlDocumentFormat::default()),
  );

  let documents = bundler.bundle(&fragments).await?;

  let mut written = Vec::with_capacity(documents.len());
  for document in documents {
    let path = config.dest.join(&document.url);
    if let Some(parent) = path.parent() {
      fs.create_dir_all(parent)?;
    }

    fs.write(&path, document.contents.as_bytes())
      .with_context(|| format!("Unable to write {}", path.display()))?;

    tracing::info!(path = %path.display(), "Wrote bundle");
    written.push(path);
  }

  Ok(written)
}
