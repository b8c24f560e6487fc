use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use serde::Deserialize;
use shardpack_bundler::BundlerOptions;
use shardpack_core::types::FragmentSet;
use shardpack_core::types::DEFAULT_SHARED_BUNDLE_URL;
use shardpack_core::url::url_from_path;
use shardpack_filesystem::FileSystem;

/// Name of the project configuration file looked up in the project root
pub const CONFIG_FILE_NAME: &str = "shardpack.json";

/// Build settings as written in a configuration file or given on the command line.
///
/// Relative paths in a configuration file are relative to the file. Command line paths are
/// relative to the working directory.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PartialBuildConfig {
  pub root: Option<PathBuf>,
  pub entrypoint: Option<PathBuf>,
  pub shell: Option<PathBuf>,
  pub fragments: Option<Vec<PathBuf>>,
  pub dest: Option<PathBuf>,
  pub shared_bundle_url: Option<String>,
  pub inline_scripts: Option<bool>,
  pub inline_css: Option<bool>,
}

impl PartialBuildConfig {
  /// Combines two configurations, preferring values set in `overrides`
  pub fn merge(self, overrides: PartialBuildConfig) -> Self {
    Self {
      root: overrides.root.or(self.root),
      entrypoint: overrides.entrypoint.or(self.entrypoint),
      shell: overrides.shell.or(self.shell),
      fragments: overrides.fragments.or(self.fragments),
      dest: overrides.dest.or(self.dest),
      shared_bundle_url: overrides.shared_bundle_url.or(self.shared_bundle_url),
      inline_scripts: overrides.inline_scripts.or(self.inline_scripts),
      inline_css: overrides.inline_css.or(self.inline_css),
    }
  }

  /// Makes every path absolute
  fn resolve_paths(self, base: &Path) -> Self {
    let resolve = |path: PathBuf| normalize_path(&base.join(path));

    Self {
      root: self.root.map(resolve),
      entrypoint: self.entrypoint.map(resolve),
      shell: self.shell.map(resolve),
      fragments: self
        .fragments
        .map(|fragments| fragments.into_iter().map(resolve).collect()),
      dest: self.dest.map(resolve),
      ..self
    }
  }
}

/// Folds `.` and `..` components without touching the file system
fn normalize_path(path: &Path) -> PathBuf {
  let mut normalized = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => {
        normalized.pop();
      }
      component => normalized.push(component),
    }
  }
  normalized
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildConfig {
  /// Project root. Every document URL is relative to it.
  pub root: PathBuf,
  pub entrypoint: Option<PathBuf>,
  pub shell: Option<PathBuf>,
  pub fragments: Vec<PathBuf>,
  /// Output directory, bundles are written to `dest/<url>`
  pub dest: PathBuf,
  pub shared_bundle_url: String,
  pub inline_scripts: bool,
  pub inline_css: bool,
}

impl BuildConfig {
  /// Loads the configuration file, if any, and applies `overrides` on top of it.
  ///
  /// The file is `config_path` when given, otherwise `shardpack.json` in the project root when it
  /// exists.
  pub fn load(
    fs: &dyn FileSystem,
    config_path: Option<&Path>,
    overrides: PartialBuildConfig,
  ) -> anyhow::Result<Self> {
    let cwd = fs.cwd()?;
    let overrides = overrides.resolve_paths(&cwd);

    let config_path = match config_path {
      Some(config_path) => Some(normalize_path(&cwd.join(config_path))),
      None => {
        let root = overrides.root.clone().unwrap_or_else(|| cwd.clone());
        let config_path = root.join(CONFIG_FILE_NAME);
        fs.is_file(&config_path).then_some(config_path)
      }
    };

    let file_config = match config_path {
      Some(config_path) => {
        let raw = fs
          .read_to_string(&config_path)
          .with_context(|| format!("Unable to read {}", config_path.display()))?;
        let config: PartialBuildConfig = serde_json::from_str(&raw)
          .with_context(|| format!("Invalid configuration in {}", config_path.display()))?;

        tracing::debug!(path = %config_path.display(), "Loaded configuration file");

        config.resolve_paths(config_path.parent().unwrap_or(&cwd))
      }
      None => PartialBuildConfig::default(),
    };

    Ok(Self::from_partial(file_config.merge(overrides), &cwd))
  }

  fn from_partial(config: PartialBuildConfig, cwd: &Path) -> Self {
    let root = config.root.unwrap_or_else(|| cwd.to_path_buf());
    let dest = config.dest.unwrap_or_else(|| root.join("build"));

    Self {
      entrypoint: config.entrypoint,
      shell: config.shell,
      fragments: config.fragments.unwrap_or_default(),
      dest,
      shared_bundle_url: config
        .shared_bundle_url
        .unwrap_or_else(|| DEFAULT_SHARED_BUNDLE_URL.to_string()),
      inline_scripts: config.inline_scripts.unwrap_or(true),
      inline_css: config.inline_css.unwrap_or(true),
      root,
    }
  }

  /// The documents to bundle, as URLs relative to the project root
  pub fn fragment_set(&self) -> anyhow::Result<FragmentSet> {
    let url = |path: &PathBuf| url_from_path(&self.root, path);

    let fragments = FragmentSet::new(
      self.entrypoint.as_ref().map(url),
      self.shell.as_ref().map(url),
      self.fragments.iter().map(url).collect(),
    )?;

    if fragments.is_empty() {
      return Err(anyhow!(
        "Nothing to bundle, configure an entrypoint, a shell or fragments"
      ));
    }

    Ok(fragments)
  }

  pub fn bundler_options(&self) -> BundlerOptions {
    BundlerOptions {
      shared_bundle_url: self.shared_bundle_url.clone(),
      inline_scripts: self.inline_scripts,
      inline_css: self.inline_css,
    }
  }
}
