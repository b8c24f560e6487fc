use std::collections::HashSet;

use shardpack_core::types::DocumentUrl;
use shardpack_core::types::ShellRewrite;
use shardpack_core::url::relative_url;
use shardpack_core::url::resolve_url;
use shardpack_core::url::url_dirname;

/// Moves everything the shell supplies to the end of the shell's imports.
///
/// Imports the shell already declares are removed and declared again after every other import,
/// so that they load once the shell's own imports are in place. Applying the resulting rewrite to
/// an already rewritten shell changes nothing.
#[derive(Debug)]
pub struct ShellRewriter<'a> {
  shell: &'a str,
}

impl<'a> ShellRewriter<'a> {
  pub fn new(shell: &'a str) -> Self {
    Self { shell }
  }

  /// Computes the rewrite for a shell declaring `declared_imports` whose bundle map entry is
  /// `shell_entry`
  pub fn rewrite(&self, declared_imports: &[String], shell_entry: &[DocumentUrl]) -> ShellRewrite {
    let shell_dir = url_dirname(self.shell);

    let mut rewrite = ShellRewrite::default();
    let mut appended = HashSet::with_capacity(shell_entry.len());

    for dependency in shell_entry {
      let href = relative_url(shell_dir, dependency);
      if appended.insert(href.clone()) {
        rewrite.append.push(href);
      }
    }

    let shell_entry = shell_entry.iter().collect::<HashSet<_>>();
    for href in declared_imports {
      let Some(url) = resolve_url(self.shell, href) else {
        continue;
      };

      if shell_entry.contains(&url) {
        rewrite.remove.insert(href.clone());
      }
    }

    tracing::debug!(
      shell = self.shell,
      removed = rewrite.remove.len(),
      appended = rewrite.append.len(),
      "Rewriting shell imports"
    );

    rewrite
  }
}
