//! Process-wide tracing setup for shardpack builds.
//!
//! Nothing is recorded until a [`TracerMode`] is chosen, either in [`MonitoringOptions`] or through
//! `SHARDPACK_TRACING_MODE` (for example `stdout` or `stdout,file`).
use std::sync::Mutex;

pub use from_env::FromEnvError;
pub use tracer::{TracerMode, TRACING_MODE_VAR};

mod from_env;
mod tracer;

/// Guard for the installed subscriber. Only the first initialization populates it.
pub static MONITORING_GUARD: Mutex<Option<MonitoringGuard>> = Mutex::new(None);

#[derive(Default)]
pub struct MonitoringGuard {
  tracer: Option<tracer::Tracer>,
}

impl MonitoringGuard {
  /// Drops the non-blocking writers, which flushes any buffered lines
  fn flush(&mut self) {
    if self.tracer.take().is_some() {
      tracing::debug!("Flushing tracing output");
    }
  }
}

#[derive(Debug, Default)]
pub struct MonitoringOptions {
  pub tracing_options: Vec<TracerMode>,
}

impl MonitoringOptions {
  pub fn from_env() -> Result<Self, FromEnvError> {
    let tracing_options = TracerMode::from_env()?;
    Ok(Self { tracing_options })
  }
}

pub fn initialize_monitoring(options: MonitoringOptions) -> anyhow::Result<()> {
  let mut slot = MONITORING_GUARD
    .lock()
    .map_err(|_| anyhow::anyhow!("Monitoring guard lock was poisoned"))?;

  if slot.is_some() {
    tracing::warn!("Monitoring was already initialized, ignoring");
    return Ok(());
  }

  let tracer = tracer::Tracer::new(&options.tracing_options)?;
  slot.replace(MonitoringGuard {
    tracer: Some(tracer),
  });

  Ok(())
}

pub fn initialize_from_env() -> anyhow::Result<()> {
  initialize_monitoring(MonitoringOptions::from_env()?)
}

/// Flushes buffered output. Events recorded afterwards are dropped.
pub fn close_monitoring() {
  if let Ok(mut slot) = MONITORING_GUARD.lock() {
    if let Some(guard) = slot.as_mut() {
      guard.flush();
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn initializing_again_after_close_is_a_no_op() {
    let stdout = || MonitoringOptions {
      tracing_options: vec![TracerMode::Stdout],
    };

    initialize_monitoring(stdout()).unwrap();
    close_monitoring();
    initialize_monitoring(stdout()).unwrap();

    let slot = MONITORING_GUARD.lock().unwrap();
    assert!(slot.as_ref().is_some_and(|guard| guard.tracer.is_none()));
    drop(slot);

    close_monitoring();
  }

  #[test]
  fn invalid_modes_in_the_environment_fail_initialization() {
    let _guard = from_env::ENV_LOCK.lock();
    std::env::set_var(TRACING_MODE_VAR, "stdout,chrome");
    let result = initialize_from_env();
    std::env::remove_var(TRACING_MODE_VAR);

    assert_eq!(
      result.unwrap_err().to_string(),
      "Invalid value for SHARDPACK_TRACING_MODE: Invalid value: chrome"
    );
  }
}
