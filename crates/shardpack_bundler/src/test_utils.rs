use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use shardpack_core::plugin::InlineOptions;
use shardpack_core::plugin::Inliner;
use shardpack_core::types::DependencyIndex;
use shardpack_core::types::FragmentSet;

/// Builds a dependency index from `(fragment, dependencies)` pairs, keeping the given order
pub fn dependency_index(fragments: &[(&str, &[&str])]) -> DependencyIndex {
  let mut index = DependencyIndex::new();
  for (fragment, dependencies) in fragments {
    index.add_fragment(fragment);
    for dependency in dependencies.iter() {
      index.add_dependency(fragment, dependency);
    }
  }
  index
}

pub fn fragment_set(shell: Option<&str>, fragments: &[&str]) -> FragmentSet {
  FragmentSet::new(
    None,
    shell.map(String::from),
    fragments.iter().map(|fragment| fragment.to_string()).collect(),
  )
  .unwrap()
}

pub fn strings(values: &[&str]) -> Vec<String> {
  values.iter().map(|value| value.to_string()).collect()
}

/// Inliner that echoes the bundle URL, optionally slowly or with an error
#[derive(Debug, Default)]
pub struct TestInliner {
  delays: HashMap<String, u64>,
  failures: HashSet<String>,
  requests: Mutex<Vec<(String, InlineOptions)>>,
}

impl TestInliner {
  pub fn with_delay(mut self, url: &str, millis: u64) -> Self {
    self.delays.insert(url.to_string(), millis);
    self
  }

  pub fn with_failure(mut self, url: &str) -> Self {
    self.failures.insert(url.to_string());
    self
  }

  pub fn requests(&self) -> Vec<(String, InlineOptions)> {
    self.requests.lock().unwrap().clone()
  }
}

#[async_trait]
impl Inliner for TestInliner {
  async fn process(&self, url: &str, options: InlineOptions) -> anyhow::Result<String> {
    self
      .requests
      .lock()
      .unwrap()
      .push((url.to_string(), options));

    if let Some(millis) = self.delays.get(url) {
      tokio::time::sleep(Duration::from_millis(*millis)).await;
    }

    if self.failures.contains(url) {
      return Err(anyhow!("Unable to inline {url}"));
    }

    Ok(format!("inlined {url}"))
  }
}
