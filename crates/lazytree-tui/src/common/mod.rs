//! Helpers shared across rendering paths.

pub mod text;

pub use text::truncate_with_ellipsis;
