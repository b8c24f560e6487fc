use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use shardpack::cli::Cli;
use shardpack::config::BuildConfig;
use shardpack_filesystem::os_file_system::OsFileSystem;
use shardpack_filesystem::FileSystemRef;
use shardpack_monitoring::{
  close_monitoring, initialize_from_env, initialize_monitoring, MonitoringOptions, TracerMode,
  TRACING_MODE_VAR,
};

async fn run(cli: Cli) -> anyhow::Result<()> {
  let fs: FileSystemRef = Arc::new(OsFileSystem);
  let config = BuildConfig::load(&*fs, cli.config.as_deref(), cli.overrides())?;

  let written = shardpack::build(&config, fs).await?;
  for path in written {
    println!("{}", path.display());
  }

  Ok(())
}

fn initialize_tracing() -> anyhow::Result<()> {
  if std::env::var_os(TRACING_MODE_VAR).is_some() {
    return initialize_from_env();
  }

  initialize_monitoring(MonitoringOptions {
    tracing_options: vec![TracerMode::Stdout],
  })
}

#[tokio::main]
async fn main() -> ExitCode {
  let cli = Cli::parse();

  if let Err(error) = initialize_tracing() {
    eprintln!("Unable to set up tracing: {error:#}");
  }

  let exit_code = match run(cli).await {
    Ok(()) => ExitCode::SUCCESS,
    Err(error) => {
      tracing::error!("{error:#}");
      ExitCode::FAILURE
    }
  };

  close_monitoring();

  exit_code
}
