//! CLI library components for docview.

pub mod logging;
pub mod replay;
