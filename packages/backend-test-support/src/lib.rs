//! Backend test support utilities
//!
//! Unique-value helpers for test isolation and a unified logging
//! initialization shared by unit and integration tests.

pub mod test_logging;
pub mod unique_helpers;
