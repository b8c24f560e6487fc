use shardpack_core::plugin::AnalyzerRef;
use shardpack_core::plugin::DocumentFormatRef;
use shardpack_core::plugin::InlinerRef;
use shardpack_core::types::BuildPlan;
use shardpack_core::types::Document;
use shardpack_core::types::DocumentUrl;
use shardpack_core::types::FragmentSet;
use shardpack_core::types::DEFAULT_SHARED_BUNDLE_URL;
use shardpack_core::BundleError;

use crate::BundleAssembler;
use crate::BundlePlanner;
use crate::ShellRewriter;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BundlerOptions {
  /// Root-relative URL of the synthetic bundle that carries shared dependencies
  pub shared_bundle_url: DocumentUrl,
  pub inline_scripts: bool,
  pub inline_css: bool,
}

impl Default for BundlerOptions {
  fn default() -> Self {
    Self {
      shared_bundle_url: DEFAULT_SHARED_BUNDLE_URL.to_string(),
      inline_scripts: true,
      inline_css: true,
    }
  }
}

/// Runs a complete build for a fragment set.
#[derive(Debug)]
pub struct Bundler {
  options: BundlerOptions,
  analyzer: AnalyzerRef,
  format: DocumentFormatRef,
  assembler: BundleAssembler,
}

impl Bundler {
  pub fn new(
    options: BundlerOptions,
    analyzer: AnalyzerRef,
    inliner: InlinerRef,
    format: DocumentFormatRef,
  ) -> Self {
    let assembler = BundleAssembler::new(&options, analyzer.clone(), inliner, format.clone());

    Self {
      options,
      analyzer,
      format,
      assembler,
    }
  }

  /// Bundles `fragments`, returning every fragment followed by the shared bundle when one was
  /// needed.
  ///
  /// Nothing is returned unless every bundle was produced.
  #[tracing::instrument(level = "info", skip_all, fields(fragments = fragments.len()))]
  pub async fn bundle(&self, fragments: &FragmentSet) -> Result<Vec<Document>, BundleError> {
    let shared_bundle_url = &self.options.shared_bundle_url;
    if fragments.shell().is_none() && fragments.contains(shared_bundle_url) {
      return Err(BundleError::SharedBundleCollision {
        url: shared_bundle_url.clone(),
      });
    }

    let index = self
      .analyzer
      .dependency_index()
      .await
      .map_err(BundleError::Analysis)?;
    index.validate()?;

    let bundle_map =
      BundlePlanner::new(fragments, &self.options.shared_bundle_url).plan(&index)?;
    let plan = BuildPlan::new(
      fragments.clone(),
      bundle_map,
      self.options.shared_bundle_url.clone(),
    );

    if let Some(shell) = plan.shell() {
      self.rewrite_shell(shell, &plan)?;
    }

    let mut bundles = self.assembler.assemble(&plan).await?;

    let mut documents = Vec::with_capacity(bundles.len());
    for url in fragments.iter() {
      let contents = bundles
        .shift_remove(url)
        .ok_or_else(|| BundleError::MissingDocument { url: url.clone() })?;
      documents.push(Document::new(url.clone(), contents));
    }

    if plan.has_shared_bundle() {
      let contents = bundles.shift_remove(plan.shared_bundle_url()).ok_or_else(|| {
        BundleError::MissingDocument {
          url: plan.shared_bundle_url().to_string(),
        }
      })?;
      documents.push(Document::new(plan.shared_bundle_url(), contents));
    }

    tracing::info!(documents = documents.len(), "Bundled fragments");

    Ok(documents)
  }

  fn rewrite_shell(&self, shell: &str, plan: &BuildPlan) -> Result<(), BundleError> {
    let document = self
      .analyzer
      .get_file(shell)
      .ok_or_else(|| BundleError::MissingDocument {
        url: shell.to_string(),
      })?;

    let format_error = |source| BundleError::Format {
      url: shell.to_string(),
      source,
    };

    let declared_imports = self
      .format
      .declared_imports(&document.contents)
      .map_err(format_error)?;

    let rewrite =
      ShellRewriter::new(shell).rewrite(&declared_imports, &plan.bundle_map().imports(shell));
    if rewrite.is_empty() {
      return Ok(());
    }

    let contents = self
      .format
      .apply_shell_rewrite(&document.contents, &rewrite)
      .map_err(format_error)?;

    self.analyzer.add_file(Document::new(shell, contents));

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use pretty_assertions::assert_eq;
  use shardpack_core::plugin::InlineOptions;
  use shardpack_core::plugin::MockAnalyzer;
  use shardpack_core::plugin::MockDocumentFormat;
  use shardpack_core::types::DependencyIndex;
  use shardpack_core::types::ShellRewrite;

  use super::*;
  use crate::test_utils::dependency_index;
  use crate::test_utils::fragment_set;
  use crate::test_utils::strings;
  use crate::test_utils::TestInliner;

  fn analyzer(index: DependencyIndex) -> MockAnalyzer {
    let mut analyzer = MockAnalyzer::new();
    analyzer
      .expect_dependency_index()
      .returning(move || Ok(index.clone()));
    analyzer.expect_add_file().returning(|_| ());
    analyzer
  }

  fn format() -> MockDocumentFormat {
    let mut format = MockDocumentFormat::new();
    format
      .expect_import_document()
      .returning(|imports| imports.join("\n"));
    format
  }

  fn options(shared_bundle_url: &str) -> BundlerOptions {
    BundlerOptions {
      shared_bundle_url: shared_bundle_url.to_string(),
      ..BundlerOptions::default()
    }
  }

  fn urls(documents: &[Document]) -> Vec<&str> {
    documents
      .iter()
      .map(|document| document.url.as_str())
      .collect()
  }

  #[tokio::test]
  async fn shared_dependencies_without_a_shell_get_a_shared_bundle() {
    let index = dependency_index(&[("a.doc", &["shared.doc"]), ("b.doc", &["shared.doc"])]);
    let inliner = Arc::new(TestInliner::default());
    let bundler = Bundler::new(
      options("shared-bundle.doc"),
      Arc::new(analyzer(index)),
      inliner.clone(),
      Arc::new(format()),
    );

    let documents = bundler
      .bundle(&fragment_set(None, &["a.doc", "b.doc"]))
      .await
      .unwrap();

    assert_eq!(urls(&documents), vec!["a.doc", "b.doc", "shared-bundle.doc"]);

    let mut requests = inliner.requests();
    requests.sort_by(|a, b| a.0.cmp(&b.0));
    let fragment_options = InlineOptions {
      added_imports: strings(&["shared-bundle.doc"]),
      excluded_imports: strings(&["shared.doc", "shared-bundle.doc"]),
      inline_scripts: true,
      inline_css: true,
    };
    assert_eq!(
      requests,
      vec![
        (String::from("a.doc"), fragment_options.clone()),
        (String::from("b.doc"), fragment_options),
        (
          String::from("shared-bundle.doc"),
          InlineOptions {
            inline_scripts: true,
            inline_css: true,
            ..InlineOptions::default()
          }
        ),
      ]
    );
  }

  #[tokio::test]
  async fn shared_dependencies_move_to_the_end_of_the_shell() {
    let index = dependency_index(&[
      ("shell.doc", &[]),
      ("a.doc", &["common.doc"]),
      ("b.doc", &["common.doc"]),
    ]);

    let mut analyzer = MockAnalyzer::new();
    analyzer
      .expect_dependency_index()
      .returning(move || Ok(index.clone()));
    analyzer
      .expect_get_file()
      .withf(|url| url == "shell.doc")
      .returning(|url| Some(Document::new(url, "<shell>")));
    analyzer
      .expect_add_file()
      .withf(|document| document == &Document::new("shell.doc", "<shell>\ncommon.doc"))
      .times(1)
      .returning(|_| ());

    let mut format = MockDocumentFormat::new();
    format.expect_declared_imports().returning(|_| Ok(vec![]));
    format
      .expect_apply_shell_rewrite()
      .withf(|_, rewrite| {
        rewrite
          == &ShellRewrite {
            remove: Default::default(),
            append: strings(&["common.doc"]),
          }
      })
      .returning(|contents, rewrite| Ok(format!("{contents}\n{}", rewrite.append.join("\n"))));
    format.expect_import_document().never();

    let inliner = Arc::new(TestInliner::default());
    let bundler = Bundler::new(
      options("shared-bundle.doc"),
      Arc::new(analyzer),
      inliner.clone(),
      Arc::new(format),
    );

    let documents = bundler
      .bundle(&fragment_set(Some("shell.doc"), &["a.doc", "b.doc"]))
      .await
      .unwrap();

    assert_eq!(urls(&documents), vec!["shell.doc", "a.doc", "b.doc"]);

    for (url, options) in inliner.requests() {
      if url == "shell.doc" {
        assert_eq!(options.excluded_imports, Vec::<String>::new());
      } else {
        assert_eq!(options.added_imports, Vec::<String>::new());
        assert_eq!(options.excluded_imports, strings(&["common.doc", "shell.doc"]));
      }
    }
  }

  #[tokio::test]
  async fn private_dependencies_produce_no_shared_bundle() {
    let index = dependency_index(&[("solo.doc", &["only-used-here.doc"])]);
    let mut format = MockDocumentFormat::new();
    format.expect_import_document().never();

    let bundler = Bundler::new(
      options("shared-bundle.doc"),
      Arc::new(analyzer(index)),
      Arc::new(TestInliner::default()),
      Arc::new(format),
    );

    let documents = bundler
      .bundle(&fragment_set(None, &["solo.doc"]))
      .await
      .unwrap();

    assert_eq!(
      documents,
      vec![Document::new("solo.doc", "inlined solo.doc")]
    );
  }

  #[tokio::test]
  async fn one_failing_bundle_fails_the_build() {
    let index = dependency_index(&[
      ("a.doc", &["a-only.doc"]),
      ("b.doc", &["b-only.doc"]),
      ("c.doc", &["c-only.doc"]),
    ]);
    let inliner = TestInliner::default()
      .with_failure("b.doc")
      .with_delay("a.doc", 20);

    let bundler = Bundler::new(
      options("shared-bundle.doc"),
      Arc::new(analyzer(index)),
      Arc::new(inliner),
      Arc::new(format()),
    );

    let result = bundler
      .bundle(&fragment_set(None, &["a.doc", "b.doc", "c.doc"]))
      .await;

    assert!(matches!(result, Err(BundleError::Inline { url, .. }) if url == "b.doc"));
  }

  #[tokio::test]
  async fn missing_shell_document_fails_the_build() {
    let index = dependency_index(&[("shell.doc", &["x.doc"]), ("a.doc", &["x.doc"])]);
    let mut analyzer = analyzer(index);
    analyzer.expect_get_file().returning(|_| None);

    let bundler = Bundler::new(
      options("shared-bundle.doc"),
      Arc::new(analyzer),
      Arc::new(TestInliner::default()),
      Arc::new(format()),
    );

    let result = bundler
      .bundle(&fragment_set(Some("shell.doc"), &["a.doc"]))
      .await;

    assert!(matches!(result, Err(BundleError::MissingDocument { url }) if url == "shell.doc"));
  }

  #[tokio::test]
  async fn fragments_named_like_the_shared_bundle_are_rejected() {
    let mut analyzer = MockAnalyzer::new();
    analyzer.expect_dependency_index().never();

    let bundler = Bundler::new(
      options("shared-bundle.doc"),
      Arc::new(analyzer),
      Arc::new(TestInliner::default()),
      Arc::new(format()),
    );

    let result = bundler
      .bundle(&fragment_set(None, &["a.doc", "shared-bundle.doc"]))
      .await;

    assert!(matches!(
      result,
      Err(BundleError::SharedBundleCollision { url }) if url == "shared-bundle.doc"
    ));
  }

  #[tokio::test]
  async fn analysis_errors_surface_unchanged() {
    let mut analyzer = MockAnalyzer::new();
    analyzer
      .expect_dependency_index()
      .returning(|| Err(anyhow::anyhow!("Unable to parse a.doc")));

    let bundler = Bundler::new(
      BundlerOptions::default(),
      Arc::new(analyzer),
      Arc::new(TestInliner::default()),
      Arc::new(format()),
    );

    let error = bundler
      .bundle(&fragment_set(None, &["a.doc"]))
      .await
      .unwrap_err();

    assert_eq!(
      error.to_string(),
      "Failed to analyze dependencies: Unable to parse a.doc"
    );
  }
}
