//! HTTP middleware components.

pub mod minify;

pub use minify::minify_html;
