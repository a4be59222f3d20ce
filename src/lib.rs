//! Extract time-to-merge features from a GitHub pull request and ask a
//! prediction service which duration bucket it falls into.

pub mod config;
pub mod features;
pub mod github;
pub mod predict;
pub mod report;

pub use features::get_mi_parsed_pr;
pub use predict::get_ttm;

#[cfg(test)]
mod test_support;
