pub use self::build_plan::*;
pub use self::bundle_map::*;
pub use self::dependency_index::*;
pub use self::document::*;
pub use self::fragment_set::*;
pub use self::shell_rewrite::*;

mod build_plan;
mod bundle_map;
mod dependency_index;
mod document;
mod fragment_set;
mod shell_rewrite;

/// Root-relative, forward-slash URL identifying a document within a build
pub type DocumentUrl = String;

/// Name of the synthetic bundle that carries shared dependencies when no shell is configured
pub const DEFAULT_SHARED_BUNDLE_URL: &str = "shared-bundle.html";
