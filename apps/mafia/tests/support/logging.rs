//! Logging for integration test binaries. Same precedence as the unit
//! tests: `TEST_LOG`, then `RUST_LOG`, then `"warn"`.

#[ctor::ctor]
fn _auto_init_for_integration_tests() {
    mafia_test_support::test_logging::init();
}
