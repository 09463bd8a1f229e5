use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_config_lifecycle() {
    // Create a temporary directory for test config
    let temp_dir = TempDir::new().unwrap();

    // Override the config path for testing
    unsafe {
        std::env::set_var("XDG_CONFIG_HOME", temp_dir.path());
    }

    // Test that config doesn't exist initially
    assert!(!trim_studio::config::Config::exists().unwrap());

    // Loading without a file gives the defaults
    let defaults = trim_studio::config::Config::load().unwrap();
    assert_eq!(defaults.ffmpeg_path, "ffmpeg");
    assert_eq!(
        defaults.recovery_policy(),
        trim_studio::playback::RecoveryPolicy::default()
    );

    // Create and save a config
    let config = trim_studio::config::Config::new();
    config.save().unwrap();

    // Verify it exists now
    assert!(trim_studio::config::Config::exists().unwrap());

    // Test config mutation
    let mut config = trim_studio::config::Config::load().unwrap();
    config.set_value("output_dir", "/tmp/trims").unwrap();
    config.set_value("load_retry_delay_ms", "750").unwrap();
    config.set_value("recreate_engine_on_retry", "true").unwrap();
    config.save().unwrap();

    // Verify mutations persisted
    let reloaded = trim_studio::config::Config::load().unwrap();
    assert_eq!(reloaded.output_dir.as_deref(), Some("/tmp/trims"));
    let policy = reloaded.recovery_policy();
    assert_eq!(policy.retry_delay, Duration::from_millis(750));
    assert!(policy.recreate_before_retry);

    // Test invalid key and value
    let mut config = trim_studio::config::Config::load().unwrap();
    assert!(config.set_value("invalid_key", "value").is_err());
    assert!(config.set_value("repair_delay_ms", "soon").is_err());
}
