//! CLI command implementations

pub mod template;
pub mod upload;
