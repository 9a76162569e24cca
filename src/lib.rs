//! Build tooling for the Dreaming Tower Archives.
//!
//! - [`chronicle`] - The chronicles index and its records
//! - [`feed`] - RSS generation with the custom `tower:` fields
//! - [`dial`] - Mythology Dial audience scoring
//! - [`config`] - Static site configuration with optional TOML overrides

pub mod chronicle;
pub mod config;
pub mod dial;
pub mod feed;
pub mod util;
