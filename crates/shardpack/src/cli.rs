use std::path::PathBuf;

use clap::Parser;

use crate::config::PartialBuildConfig;

/// Bundles fragment based HTML applications
#[derive(Debug, Parser)]
#[command(name = "shardpack", version, about)]
pub struct Cli {
  /// Project root, every bundled document must live below it [default: working directory]
  #[arg(long)]
  pub root: Option<PathBuf>,

  /// Document bundled on its own when there is neither a shell nor fragments
  #[arg(long)]
  pub entrypoint: Option<PathBuf>,

  /// Fragment that carries every shared dependency
  #[arg(long)]
  pub shell: Option<PathBuf>,

  /// Lazily loaded fragment, can be given more than once
  #[arg(long = "fragment")]
  pub fragments: Vec<PathBuf>,

  /// Output directory [default: <root>/build]
  #[arg(long)]
  pub dest: Option<PathBuf>,

  /// Configuration file [default: <root>/shardpack.json when present]
  #[arg(long)]
  pub config: Option<PathBuf>,

  /// URL of the bundle holding shared dependencies when there is no shell
  #[arg(long)]
  pub shared_bundle_url: Option<String>,

  /// Keep external scripts as references
  #[arg(long)]
  pub no_inline_scripts: bool,

  /// Keep external stylesheets as references
  #[arg(long)]
  pub no_inline_css: bool,
}

impl Cli {
  /// Settings given on the command line, to apply over the configuration file
  pub fn overrides(&self) -> PartialBuildConfig {
    PartialBuildConfig {
      root: self.root.clone(),
      entrypoint: self.entrypoint.clone(),
      shell: self.shell.clone(),
      fragments: (!self.fragments.is_empty()).then(|| self.fragments.clone()),
      dest: self.dest.clone(),
      shared_bundle_url: self.shared_bundle_url.clone(),
      inline_scripts: self.no_inline_scripts.then_some(false),
      inline_css: self.no_inline_css.then_some(false),
    }
  }
}
