//! Configuration loading and resolution utilities.
//!
//! Sources are layered by [`sources`], deserialized into a [`raw`] mirror of
//! the file format, overridden from the command line, and finally validated
//! into a [`ResolvedConfig`]. `load` is the entry point.

mod loader;
mod raw;
mod resolved;
mod sources;

pub use loader::load;
pub use resolved::ResolvedConfig;
