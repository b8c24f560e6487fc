use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use shardpack_core::loader::Loader;
use shardpack_core::loader::LoaderRef;
use shardpack_filesystem::in_memory_file_system::InMemoryFileSystem;
use shardpack_filesystem::FileSystem;

use crate::{parse_html, serialize_html};

pub fn normalize_html(html: &str) -> String {
  let dom = parse_html(html.as_bytes()).unwrap();
  let output = serialize_html(dom).unwrap();
  output
    .lines()
    .map(|line| line.trim())
    .filter(|line| !line.is_empty())
    .collect()
}

/// Loader over an in-memory project rooted at `/app`
pub fn loader(files: &[(&str, &str)]) -> LoaderRef {
  let fs = InMemoryFileSystem::default();
  let root = PathBuf::from("/app");

  for (url, contents) in files {
    fs.write(&root.join(Path::new(url)), contents.as_bytes())
      .unwrap();
  }

  Arc::new(Loader::new(Arc::new(fs), root))
}
