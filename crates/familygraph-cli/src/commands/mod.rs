//! CLI command implementations

pub mod completions;
pub mod config;
pub mod family;
pub mod person;
pub mod relation;
pub mod serve;
pub mod title;
pub mod titlemap;
