use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use shardpack_filesystem::FileSystemRef;

use crate::types::Document;
use crate::types::DocumentUrl;

pub type LoaderRef = Arc<Loader>;

/// Resolves document URLs to their contents.
///
/// Documents registered with [`Loader::put`] shadow files on disk, so synthesized or rewritten
/// documents resolve the same way as real inputs.
#[derive(Debug)]
pub struct Loader {
  fs: FileSystemRef,
  root: PathBuf,
  overlay: RwLock<HashMap<DocumentUrl, String>>,
}

impl Loader {
  pub fn new(fs: FileSystemRef, root: PathBuf) -> Self {
    Self {
      fs,
      root,
      overlay: Default::default(),
    }
  }

  pub fn load(&self, url: &str) -> io::Result<Document> {
    if let Some(contents) = self.overlay.read().get(url) {
      return Ok(Document::new(url, contents.clone()));
    }

    let contents = self.fs.read_to_string(&self.root.join(url))?;
    Ok(Document::new(url, contents))
  }

  pub fn get(&self, url: &str) -> Option<Document> {
    self.load(url).ok()
  }

  /// Registers `document`, replacing any earlier registration of the same URL
  pub fn put(&self, document: Document) {
    tracing::debug!(url = %document.url, "Registering document");
    self.overlay.write().insert(document.url, document.contents);
  }
}

#[cfg(test)]
mod tests {
  use std::path::Path;

  use pretty_assertions::assert_eq;
  use shardpack_filesystem::in_memory_file_system::InMemoryFileSystem;
  use shardpack_filesystem::FileSystem;

  use super::*;

  fn loader() -> Loader {
    let fs = InMemoryFileSystem::default();
    fs.write(Path::new("/app/src/a.html"), b"<p>a</p>").unwrap();
    Loader::new(Arc::new(fs), PathBuf::from("/app"))
  }

  #[test]
  fn loads_documents_relative_to_the_root() {
    let loader = loader();

    assert_eq!(
      loader.get("src/a.html"),
      Some(Document::new("src/a.html", "<p>a</p>"))
    );
    assert_eq!(loader.get("src/missing.html"), None);
  }

  #[test]
  fn registered_documents_shadow_files() {
    let loader = loader();
    loader.put(Document::new("src/a.html", "<p>rewritten</p>"));
    loader.put(Document::new("shared-bundle.html", "<link rel=\"import\">"));

    assert_eq!(loader.get("src/a.html").unwrap().contents, "<p>rewritten</p>");
    assert_eq!(
      loader.get("shared-bundle.html").unwrap().contents,
      "<link rel=\"import\">"
    );
  }

  #[test]
  fn load_reports_not_found() {
    let loader = loader();

    assert_eq!(
      loader.load("nope.html").unwrap_err().kind(),
      io::ErrorKind::NotFound
    );
  }
}
