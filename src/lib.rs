//! # ATP Proxy
//!
//! A thin proxy in front of the unofficial ATP Tour JSON endpoints, serving
//! raw or flattened match and head-to-head data.
//!
//! ## Architecture
//!
//! - **registry**: Local tournament registry (loading, resolution, offline rebuild)
//! - **draw**: Candidate match id generation from draw sizes
//! - **fetch**: Upstream HTTP client and concurrent match probing
//! - **normalize**: Flattening of match-stats and head-to-head payloads
//! - **models**: Flattened record types
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod config;
pub mod draw;
pub mod fetch;
pub mod models;
pub mod normalize;
pub mod registry;

pub use models::*;
