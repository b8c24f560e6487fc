//! Subscriber layers for each [`TracerMode`].
use anyhow::anyhow;
use serde::Deserialize;
use serde::Serialize;
use tracing::Subscriber;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{self, Rotation};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::from_env::{optional_var, FromEnvError};

/// Comma separated list of [`TracerMode`]s to enable
pub const TRACING_MODE_VAR: &str = "SHARDPACK_TRACING_MODE";

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", tag = "mode")]
pub enum TracerMode {
  /// Output the Tracer logs to Stdout
  Stdout,
  /// Output the Tracer logs to hourly rotated files in the temporary directory
  File,
}

impl TracerMode {
  pub fn from_env() -> Result<Vec<Self>, FromEnvError> {
    let Some(mode) = optional_var(TRACING_MODE_VAR) else {
      return Ok(vec![]);
    };

    Self::parse_list(&mode)
  }

  /// Parses a comma separated list of modes, ignoring repeats
  pub fn parse_list(modes: &str) -> Result<Vec<Self>, FromEnvError> {
    let mut tracer_modes = vec![];

    for mode in modes.split(',').map(str::trim) {
      let mode = match mode {
        "stdout" => Self::Stdout,
        "file" => Self::File,
        value => {
          return Err(FromEnvError::InvalidKey(
            String::from(TRACING_MODE_VAR),
            anyhow!("Invalid value: {}", value),
          ))
        }
      };

      if !tracer_modes.contains(&mode) {
        tracer_modes.push(mode);
      }
    }

    Ok(tracer_modes)
  }
}

/// Keeps the background writers alive. Dropping it flushes them.
pub struct Tracer {
  _writers: Vec<WorkerGuard>,
}

impl Tracer {
  pub fn new(modes: &[TracerMode]) -> anyhow::Result<Self> {
    let mut writers = Vec::new();

    let file_layer = if modes.contains(&TracerMode::File) {
      let appender = rolling::Builder::new()
        .rotation(Rotation::HOURLY)
        .max_log_files(4)
        .filename_prefix("shardpack-tracing")
        .build(std::env::temp_dir().join("shardpack_trace"))
        .map_err(|error| anyhow!(error))?;

      let (writer, guard) = tracing_appender::non_blocking(appender);
      writers.push(guard);
      Some(output_layer(writer, false))
    } else {
      None
    };

    let stdout_layer = if modes.contains(&TracerMode::Stdout) {
      let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
      writers.push(guard);
      Some(output_layer(writer, true))
    } else {
      None
    };

    tracing::subscriber::set_global_default(
      Registry::default().with(file_layer).with(stdout_layer),
    )?;

    Ok(Self { _writers: writers })
  }
}

/// Formats events and closed spans, filtered by `RUST_LOG`
fn output_layer<S>(writer: NonBlocking, ansi: bool) -> impl Layer<S>
where
  S: Subscriber + for<'span> LookupSpan<'span>,
{
  tracing_subscriber::fmt::layer()
    .with_writer(writer)
    .with_ansi(ansi)
    .with_span_events(FmtSpan::CLOSE)
    .with_filter(EnvFilter::from_default_env())
}
