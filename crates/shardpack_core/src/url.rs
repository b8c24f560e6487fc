//! Conversions between file-system paths and the root-relative, forward-slash URLs used to
//! identify documents everywhere inside a build.

use std::path::Path;

use path_slash::PathBufExt;
use pathdiff::diff_paths;

/// Converts a file path to a URL relative to `root`.
///
/// Relative paths are taken to already be relative to `root`.
pub fn url_from_path(root: &Path, path: &Path) -> String {
  let relative = if path.is_absolute() {
    diff_paths(path, root).unwrap_or_else(|| path.to_path_buf())
  } else {
    path.to_path_buf()
  };

  normalize_url(&relative.to_slash_lossy())
}

/// Directory portion of a URL, without a trailing slash. Top level documents have an empty
/// directory.
pub fn url_dirname(url: &str) -> &str {
  match url.rfind('/') {
    Some(index) => &url[..index],
    None => "",
  }
}

/// Whether an href points outside of the project (another origin, an absolute path, a data URL
/// or a fragment-only reference). These are never resolved or inlined.
pub fn is_external(href: &str) -> bool {
  href.is_empty()
    || href.starts_with('/')
    || href.starts_with('#')
    || href.starts_with("data:")
    || href.contains("://")
    || href.starts_with("//")
}

/// Removes `.` segments and folds `..` segments into their parent.
pub fn normalize_url(url: &str) -> String {
  let mut segments: Vec<&str> = Vec::new();
  for segment in url.split('/') {
    match segment {
      "" | "." => {}
      ".." => {
        if segments.last().is_some_and(|last| *last != "..") {
          segments.pop();
        } else {
          segments.push("..");
        }
      }
      segment => segments.push(segment),
    }
  }
  segments.join("/")
}

/// Resolves `href` as written in the document at `base_url` into a root-relative URL.
///
/// Returns `None` for external references.
pub fn resolve_url(base_url: &str, href: &str) -> Option<String> {
  if is_external(href) {
    return None;
  }

  let href = href
    .split(|c: char| c == '?' || c == '#')
    .next()
    .unwrap_or(href);

  let dirname = url_dirname(base_url);
  if dirname.is_empty() {
    Some(normalize_url(href))
  } else {
    Some(normalize_url(&format!("{dirname}/{href}")))
  }
}

/// Computes the href that reaches `to_url` from a document living in `from_dir`.
pub fn relative_url(from_dir: &str, to_url: &str) -> String {
  let from_dir = normalize_url(from_dir);
  let to_url = normalize_url(to_url);

  if from_dir.is_empty() {
    return to_url;
  }

  diff_paths(Path::new(&to_url), Path::new(&from_dir))
    .map(|relative| relative.to_slash_lossy())
    .unwrap_or(to_url)
}
