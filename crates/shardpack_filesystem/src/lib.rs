use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

/// In-memory file-system for testing
pub mod in_memory_file_system;

/// File-system implementation using std::fs
pub mod os_file_system;

/// FileSystem abstraction instance
///
/// This should be `OsFileSystem` for non-testing environments and `InMemoryFileSystem` for testing.
pub type FileSystemRef = Arc<dyn FileSystem + Send + Sync>;

/// Trait abstracting the file-system operations a build needs.
///
/// Reading inputs and writing bundles both go through this trait so that a build can run
/// entirely in memory.
#[mockall::automock]
pub trait FileSystem: std::fmt::Debug {
  fn cwd(&self) -> io::Result<PathBuf> {
    Err(io::Error::new(
      io::ErrorKind::Unsupported,
      "Not implemented: FileSystem::cwd",
    ))
  }

  /// Resolve `path` against the current working directory and remove `.` and `..` components
  fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;

  /// Create a directory and all of its missing parents
  fn create_dir_all(&self, path: &Path) -> io::Result<()>;

  fn read_to_string(&self, path: &Path) -> io::Result<String>;

  /// Write `contents` to `path`, creating parent directories as needed
  fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

  fn is_file(&self, path: &Path) -> bool;
  fn is_dir(&self, path: &Path) -> bool;
}
