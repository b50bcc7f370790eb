/*!
 * Tests for application configuration
 */

use std::str::FromStr;
use dualsub::app_config::{AlignmentConfig, Config, OutputFormat, Strategy};
use crate::common;

/// Default configuration values
#[test]
fn test_default_config_shouldMatchDocumentedDefaults() {
    let config = Config::default();

    assert_eq!(config.strategy, Strategy::Paired);
    assert_eq!(config.alignment.max_gap_seconds, 1.0);
    assert_eq!(config.alignment.search_window, 10);
    assert_eq!(config.alignment.backtrack, 2);
    assert_eq!(config.output_format, OutputFormat::Srt);
    assert!(config.validate().is_ok());
}

/// Partial JSON fills missing fields with defaults
#[test]
fn test_config_parse_withPartialJson_shouldApplyDefaults() {
    let json = r#"{ "strategy": "timeline", "alignment": { "max_gap_seconds": 0.5 } }"#;
    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.strategy, Strategy::Timeline);
    assert_eq!(config.alignment.max_gap_seconds, 0.5);
    assert_eq!(config.alignment.search_window, 10);
    assert_eq!(config.alignment.backtrack, 2);
    assert_eq!(config.output_format, OutputFormat::Srt);
}

/// Save and reload round trip
#[test]
fn test_config_save_and_load_shouldRoundTrip() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = temp_dir.path().join("conf.json");

    let mut config = Config::default();
    config.strategy = Strategy::Timeline;
    config.alignment.search_window = 25;
    config.output_format = OutputFormat::Text;
    config.save_to_file(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    assert_eq!(loaded.strategy, Strategy::Timeline);
    assert_eq!(loaded.alignment.search_window, 25);
    assert_eq!(loaded.output_format, OutputFormat::Text);
}

/// Out-of-bounds alignment knobs are rejected before processing
#[test]
fn test_alignment_validate_withBadValues_shouldFail() {
    let negative_gap = AlignmentConfig {
        max_gap_seconds: -0.5,
        ..AlignmentConfig::default()
    };
    assert!(negative_gap.validate().is_err());

    let zero_window = AlignmentConfig {
        search_window: 0,
        ..AlignmentConfig::default()
    };
    assert!(zero_window.validate().is_err());

    let infinite_gap = AlignmentConfig {
        max_gap_seconds: f64::INFINITY,
        ..AlignmentConfig::default()
    };
    assert!(infinite_gap.validate().is_err());

    // Zero gap is allowed; it just disables matching
    let zero_gap = AlignmentConfig {
        max_gap_seconds: 0.0,
        ..AlignmentConfig::default()
    };
    assert!(zero_gap.validate().is_ok());
}

/// Empty track labels fail config validation
#[test]
fn test_config_validate_withEmptyTrackLabel_shouldFail() {
    let mut config = Config::default();
    config.primary_track = "  ".to_string();
    assert!(config.validate().is_err());
}

/// Strategy string conversions
#[test]
fn test_strategy_fromStr_withValidNames_shouldRoundTrip() {
    assert_eq!(Strategy::from_str("timeline").unwrap(), Strategy::Timeline);
    assert_eq!(Strategy::from_str("Paired").unwrap(), Strategy::Paired);
    assert!(Strategy::from_str("nearest").is_err());

    assert_eq!(Strategy::Timeline.to_string(), "timeline");
    assert_eq!(Strategy::Paired.display_name(), "Paired");
}

/// Output format conversions and properties
#[test]
fn test_output_format_properties_shouldMatchFormat() {
    assert!(OutputFormat::Srt.is_timed());
    assert!(!OutputFormat::Text.is_timed());
    assert_eq!(OutputFormat::Srt.extension(), "srt");
    assert_eq!(OutputFormat::Text.extension(), "txt");

    assert_eq!(OutputFormat::from_str("txt").unwrap(), OutputFormat::Text);
    assert!(OutputFormat::from_str("vtt").is_err());
}
