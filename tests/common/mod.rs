//! Common test utilities and helpers
//!
//! Shared between the integration test crates. Not every crate uses every
//! helper, hence the `dead_code` allowance.

#![allow(dead_code)]

pub mod mock_services;
pub mod test_fixtures;
