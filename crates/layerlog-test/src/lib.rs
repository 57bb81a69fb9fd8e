//! Layerlog Test - Shared test utilities for layerlog.
//!
//! This crate provides capture writers and harnesses that can be used as a
//! dev-dependency by tests that need to inspect what a logger wrote.
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! layerlog-test.workspace = true
//! ```
//!
//! Then use in your tests:
//!
//! ```rust,ignore
//! #[cfg(test)]
//! mod tests {
//!     use layerlog::fields;
//!     use layerlog_test::TestHarness;
//!
//!     #[test]
//!     fn test_info_is_written() {
//!         let harness = TestHarness::new();
//!         let logger = harness.logger(1, "svc", &fields!["env", "test"]);
//!
//!         logger.info("hello", &[]);
//!
//!         assert_eq!(harness.normal_records().len(), 1);
//!     }
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod fixtures;
pub mod harness;
pub mod mocks;

pub use fixtures::*;
pub use harness::*;
pub use mocks::*;
