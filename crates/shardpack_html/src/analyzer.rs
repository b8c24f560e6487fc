use std::collections::HashSet;

use anyhow::Context;
use async_trait::async_trait;
use shardpack_core::loader::LoaderRef;
use shardpack_core::plugin::Analyzer;
use shardpack_core::types::DependencyIndex;
use shardpack_core::types::Document;
use shardpack_core::types::DocumentUrl;
use shardpack_core::types::FragmentSet;
use shardpack_core::url::resolve_url;

use crate::imports::import_links;
use crate::parse_html;

/// Discovers the HTML import graph of every fragment.
///
/// Dependencies are listed in the order they execute: a document's own imports come before the
/// document, and every document is listed once even when imported repeatedly. Import cycles are
/// cut at the first repeated document.
#[derive(Debug)]
pub struct HtmlImportAnalyzer {
  loader: LoaderRef,
  fragments: FragmentSet,
}

impl HtmlImportAnalyzer {
  pub fn new(loader: LoaderRef, fragments: FragmentSet) -> Self {
    Self { loader, fragments }
  }

  fn build_index(&self) -> anyhow::Result<DependencyIndex> {
    let mut index = DependencyIndex::new();

    for fragment in self.fragments.iter() {
      let mut visited = HashSet::from([fragment.clone()]);
      let mut dependencies = Vec::new();
      self.collect_dependencies(fragment, &mut visited, &mut dependencies)?;

      tracing::debug!(%fragment, dependencies = dependencies.len(), "Analyzed fragment");

      index.add_fragment(fragment);
      for dependency in &dependencies {
        index.add_dependency(fragment, dependency);
      }
    }

    Ok(index)
  }

  fn collect_dependencies(
    &self,
    url: &str,
    visited: &mut HashSet<DocumentUrl>,
    dependencies: &mut Vec<DocumentUrl>,
  ) -> anyhow::Result<()> {
    let document = self
      .loader
      .load(url)
      .with_context(|| format!("Unable to read {url}"))?;
    let dom = parse_html(document.contents.as_bytes())
      .with_context(|| format!("Unable to parse {url}"))?;

    let imports = import_links(&dom.document)
      .into_iter()
      .filter_map(|link| resolve_url(url, &link.href))
      .collect::<Vec<_>>();

    for import in imports {
      if !visited.insert(import.clone()) {
        continue;
      }

      self.collect_dependencies(&import, visited, dependencies)?;
      dependencies.push(import);
    }

    Ok(())
  }
}

#[async_trait]
impl Analyzer for HtmlImportAnalyzer {
  async fn dependency_index(&self) -> anyhow::Result<DependencyIndex> {
    self.build_index()
  }

  fn get_file(&self, url: &str) -> Option<Document> {
    self.loader.get(url)
  }

  fn add_file(&self, document: Document) {
    self.loader.put(document);
  }
}
