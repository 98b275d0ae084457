//! Logging initialization for integration test binaries.
//!
//! Respects `TEST_LOG` first, then `RUST_LOG`, defaulting to `warn`.

/// Runs once per integration test binary before any test executes.
#[ctor::ctor]
fn _auto_init_for_integration_tests() {
    backend_test_support::test_logging::init();
}
