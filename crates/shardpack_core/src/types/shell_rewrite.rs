use indexmap::IndexSet;
use serde::Serialize;

/// Patch for the shell's import declarations.
///
/// Imports in `remove` are matched against the hrefs exactly as the shell declares them. `append`
/// holds hrefs relative to the shell, to be added after every remaining import in their given
/// order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ShellRewrite {
  pub remove: IndexSet<String>,
  pub append: Vec<String>,
}

impl ShellRewrite {
  pub fn is_empty(&self) -> bool {
    self.remove.is_empty() && self.append.is_empty()
  }
}
