use indexmap::IndexMap;
use shardpack_core::plugin::AnalyzerRef;
use shardpack_core::plugin::DocumentFormatRef;
use shardpack_core::plugin::InlineOptions;
use shardpack_core::plugin::InlinerRef;
use shardpack_core::types::BuildPlan;
use shardpack_core::types::Document;
use shardpack_core::types::DocumentUrl;
use shardpack_core::url::relative_url;
use shardpack_core::url::url_dirname;
use shardpack_core::BundleError;
use tokio::task::JoinSet;

use crate::BundlerOptions;

/// One call to the inliner
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineRequest {
  pub url: DocumentUrl,
  pub options: InlineOptions,
}

/// Turns a build plan into the final text of every output bundle.
#[derive(Debug)]
pub struct BundleAssembler {
  analyzer: AnalyzerRef,
  inliner: InlinerRef,
  format: DocumentFormatRef,
  inline_scripts: bool,
  inline_css: bool,
}

impl BundleAssembler {
  pub fn new(
    options: &BundlerOptions,
    analyzer: AnalyzerRef,
    inliner: InlinerRef,
    format: DocumentFormatRef,
  ) -> Self {
    Self {
      analyzer,
      inliner,
      format,
      inline_scripts: options.inline_scripts,
      inline_css: options.inline_css,
    }
  }

  fn base_options(&self) -> InlineOptions {
    InlineOptions {
      inline_scripts: self.inline_scripts,
      inline_css: self.inline_css,
      ..InlineOptions::default()
    }
  }

  /// Lists the inliner calls needed for `plan`: one per fragment in fragment-set order, then the
  /// shared bundle when there is one.
  ///
  /// Every fragment other than the shell excludes the shared dependencies, and the bundle carrying
  /// them, so they are emitted once. Without a shell, fragments that rely on shared dependencies import the shared bundle
  /// instead. With a shell nothing is added, since the shell hosting a fragment already provides
  /// them.
  pub fn inline_requests(&self, plan: &BuildPlan) -> Vec<InlineRequest> {
    let mut excluded_imports = plan.shared_dependencies();
    excluded_imports.push(plan.shared_dependencies_bundle().to_string());
    let shared_bundle_url = plan.shared_bundle_url();

    let mut requests = plan
      .fragments()
      .iter()
      .map(|fragment| {
        let mut options = self.base_options();

        if !plan.fragments().is_shell(fragment) {
          let imports_shared_bundle = plan.shell().is_none()
            && plan
              .bundle_map()
              .get(fragment)
              .is_some_and(|imports| imports.contains(shared_bundle_url));

          if imports_shared_bundle {
            options
              .added_imports
              .push(relative_url(url_dirname(fragment), shared_bundle_url));
          }

          options.excluded_imports = excluded_imports.clone();
        }

        InlineRequest {
          url: fragment.clone(),
          options,
        }
      })
      .collect::<Vec<_>>();

    if plan.has_shared_bundle() {
      requests.push(InlineRequest {
        url: shared_bundle_url.to_string(),
        options: self.base_options(),
      });
    }

    requests
  }

  /// Inlines every bundle of `plan` concurrently.
  ///
  /// Results are keyed by bundle and ordered like [`BundleAssembler::inline_requests`]. The first
  /// failure cancels the remaining work.
  #[tracing::instrument(level = "debug", skip_all)]
  pub async fn assemble(
    &self,
    plan: &BuildPlan,
  ) -> Result<IndexMap<DocumentUrl, String>, BundleError> {
    if plan.has_shared_bundle() {
      let bundle_dir = url_dirname(plan.shared_bundle_url());
      let hrefs = plan
        .shared_dependencies()
        .iter()
        .map(|dependency| relative_url(bundle_dir, dependency))
        .collect::<Vec<_>>();
      let contents = self.format.import_document(&hrefs);
      self
        .analyzer
        .add_file(Document::new(plan.shared_bundle_url(), contents));
    }

    let requests = self.inline_requests(plan);
    let mut join_set = JoinSet::new();

    for (index, request) in requests.iter().enumerate() {
      let inliner = self.inliner.clone();
      let InlineRequest { url, options } = request.clone();

      join_set.spawn(async move {
        tracing::debug!(%url, "Inlining bundle");
        let result = inliner.process(&url, options).await;
        (index, url, result)
      });
    }

    let mut contents: Vec<Option<String>> = vec![None; requests.len()];

    while let Some(joined) = join_set.join_next().await {
      let (index, url, result) = match joined {
        Ok(joined) => joined,
        Err(error) => {
          join_set.abort_all();
          return Err(BundleError::TaskFailed(error.to_string()));
        }
      };

      match result {
        Ok(output) => contents[index] = Some(output),
        Err(source) => {
          tracing::error!(%url, "Inlining failed, cancelling remaining bundles");
          join_set.abort_all();
          return Err(BundleError::Inline { url, source });
        }
      }
    }

    requests
      .into_iter()
      .zip(contents)
      .map(|(request, output)| match output {
        Some(output) => Ok((request.url, output)),
        None => Err(BundleError::TaskFailed(format!(
          "No output was produced for {}",
          request.url
        ))),
      })
      .collect()
  }
}
