use std::collections::BTreeMap;
use std::io;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use parking_lot::RwLock;

use crate::FileSystem;

#[derive(Debug)]
enum Entry {
  File(Vec<u8>),
  Directory,
}

#[derive(Debug)]
struct State {
  cwd: PathBuf,
  entries: BTreeMap<PathBuf, Entry>,
}

impl State {
  /// Lexically resolves `path` against the working directory
  fn resolve(&self, path: &Path) -> PathBuf {
    let mut resolved = if path.is_absolute() {
      PathBuf::new()
    } else {
      self.cwd.clone()
    };

    for component in path.components() {
      match component {
        Component::CurDir => {}
        Component::ParentDir => {
          resolved.pop();
        }
        component => resolved.push(component),
      }
    }

    resolved
  }

  fn insert_ancestors(&mut self, path: &Path) {
    for ancestor in path.ancestors() {
      self
        .entries
        .entry(ancestor.to_path_buf())
        .or_insert(Entry::Directory);
    }
  }
}

/// File system kept entirely in memory, for tests.
///
/// Paths are resolved lexically against a configurable working directory. Writing a file creates
/// its parent directories.
#[derive(Debug)]
pub struct InMemoryFileSystem {
  state: RwLock<State>,
}

impl Default for InMemoryFileSystem {
  fn default() -> Self {
    let root = if cfg!(windows) {
      PathBuf::from("C:/")
    } else {
      PathBuf::from("/")
    };

    Self {
      state: RwLock::new(State {
        cwd: root,
        entries: BTreeMap::new(),
      }),
    }
  }
}

impl InMemoryFileSystem {
  /// Changes the directory relative paths are resolved against
  pub fn set_current_working_directory(&self, cwd: &Path) {
    let mut state = self.state.write();
    state.cwd = state.resolve(cwd);
  }

  /// Every file path currently stored, sorted
  pub fn files(&self) -> Vec<PathBuf> {
    self
      .state
      .read()
      .entries
      .iter()
      .filter(|(_, entry)| matches!(entry, Entry::File(_)))
      .map(|(path, _)| path.clone())
      .collect()
  }
}

impl FileSystem for InMemoryFileSystem {
  fn cwd(&self) -> io::Result<PathBuf> {
    Ok(self.state.read().cwd.clone())
  }

  fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
    Ok(self.state.read().resolve(path))
  }

  fn create_dir_all(&self, path: &Path) -> io::Result<()> {
    let mut state = self.state.write();
    let path = state.resolve(path);

    if matches!(state.entries.get(&path), Some(Entry::File(_))) {
      return Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("{} is a file", path.display()),
      ));
    }

    state.insert_ancestors(&path);
    Ok(())
  }

  fn read_to_string(&self, path: &Path) -> io::Result<String> {
    let state = self.state.read();
    let path = state.resolve(path);

    match state.entries.get(&path) {
      Some(Entry::File(contents)) => String::from_utf8(contents.clone())
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error)),
      Some(Entry::Directory) => Err(io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("{} is a directory", path.display()),
      )),
      None => Err(io::Error::new(io::ErrorKind::NotFound, "File not found")),
    }
  }

  fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut state = self.state.write();
    let path = state.resolve(path);

    if let Some(parent) = path.parent() {
      state.insert_ancestors(parent);
    }
    state.entries.insert(path, Entry::File(contents.to_vec()));

    Ok(())
  }

  fn is_file(&self, path: &Path) -> bool {
    let state = self.state.read();
    matches!(state.entries.get(&state.resolve(path)), Some(Entry::File(_)))
  }

  fn is_dir(&self, path: &Path) -> bool {
    let state = self.state.read();
    matches!(
      state.entries.get(&state.resolve(path)),
      Some(Entry::Directory)
    )
  }
}
