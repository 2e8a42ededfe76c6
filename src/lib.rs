//! Rickdex library exports for testing

pub mod api;
pub mod core;
pub mod data;
pub mod domain;
pub mod tui;

#[cfg(test)]
pub mod test_support;
