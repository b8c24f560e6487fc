//! Bundling decisions for fragment based applications.
//!
//! A build goes through these steps:
//!
//! 1. [`BundlePlanner`] sweeps every fragment's dependencies and classifies each one as private
//!    to the fragment or shared, producing a [`BundleMap`](shardpack_core::types::BundleMap).
//! 2. [`ShellRewriter`] moves shared dependencies to the end of the shell's imports, when a shell
//!    is configured.
//! 3. [`BundleAssembler`] inlines every fragment, and the synthetic shared bundle when there is
//!    one, concurrently.
//!
//! [`Bundler`] runs the three steps for a [`FragmentSet`](shardpack_core::types::FragmentSet).

pub use assembler::*;
pub use bundler::*;
pub use planner::*;
pub use shell_rewriter::*;

mod assembler;
mod bundler;
mod planner;
mod shell_rewriter;

#[cfg(test)]
mod test_utils;
