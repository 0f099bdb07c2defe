use proptest::test_runner::Config;

/// Shared proptest configuration.
///
/// `PROPTEST_CASES` overrides the case count (default 8 keeps the suite fast).
/// `PROPTEST_MAX_SHRINK_MS` caps shrinking time.
pub fn proptest_config() -> Config {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8);
    let max_shrink_time = std::env::var("PROPTEST_MAX_SHRINK_MS")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(0);

    Config {
        cases,
        max_shrink_time,
        failure_persistence: None,
        ..Config::default()
    }
}
