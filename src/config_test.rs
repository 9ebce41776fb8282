use std::collections::HashMap;

use review_canvas::camera::PanMode;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_when_unset() {
    let config = HostConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(config.variant, CanvasVariant::Board);
    assert_eq!(config.scan_latency, Duration::from_millis(2500));
    assert_eq!(config.settle_timeout, Duration::from_millis(10_000));
    assert!(config.script.is_none());
    assert!(!config.bring_to_front);
}

#[test]
fn parses_every_variable() {
    let config = HostConfig::from_lookup(lookup_from(&[
        ("REVIEW_VARIANT", "single"),
        ("REVIEW_SCAN_LATENCY_MS", "10"),
        ("REVIEW_SETTLE_TIMEOUT_MS", " 500 "),
        ("REVIEW_SCRIPT", "/tmp/session.json"),
        ("REVIEW_BRING_TO_FRONT", "TRUE"),
    ]))
    .unwrap();
    assert_eq!(config.variant, CanvasVariant::SingleImage);
    assert_eq!(config.scan_latency, Duration::from_millis(10));
    assert_eq!(config.settle_timeout, Duration::from_millis(500));
    assert_eq!(config.script, Some(PathBuf::from("/tmp/session.json")));
    assert!(config.bring_to_front);
}

#[test]
fn blank_script_means_demo() {
    let config = HostConfig::from_lookup(lookup_from(&[("REVIEW_SCRIPT", "  ")])).unwrap();
    assert!(config.script.is_none());
}

#[test]
fn unknown_variant_is_rejected() {
    let err = HostConfig::from_lookup(lookup_from(&[("REVIEW_VARIANT", "gallery")])).unwrap_err();
    assert!(matches!(err, HostError::Config(ref msg) if msg.contains("gallery")));
}

#[test]
fn non_numeric_latency_is_rejected() {
    let err = HostConfig::from_lookup(lookup_from(&[("REVIEW_SCAN_LATENCY_MS", "soon")])).unwrap_err();
    assert!(err.to_string().contains("REVIEW_SCAN_LATENCY_MS"));
}

#[test]
fn bad_bool_is_rejected() {
    assert!(HostConfig::from_lookup(lookup_from(&[("REVIEW_BRING_TO_FRONT", "maybe")])).is_err());
}

#[test]
fn canvas_config_applies_variant_and_policy() {
    let config =
        HostConfig::from_lookup(lookup_from(&[("REVIEW_VARIANT", "single"), ("REVIEW_BRING_TO_FRONT", "1")])).unwrap();
    let canvas = config.canvas_config().unwrap();
    assert_eq!(canvas.variant, CanvasVariant::SingleImage);
    assert_eq!(canvas.pan_mode, PanMode::Screen);
    assert!(canvas.bring_to_front_on_select);
}

#[test]
fn every_variant_yields_a_valid_canvas_config() {
    for variant in ["board", "single"] {
        let config = HostConfig::from_lookup(lookup_from(&[("REVIEW_VARIANT", variant)])).unwrap();
        assert!(config.canvas_config().is_ok(), "{variant}");
    }
}

#[test]
fn canvas_config_errors_surface_as_host_errors() {
    let err = CanvasConfig { default_zoom: 9.0, ..CanvasConfig::board() }.validate().unwrap_err();
    let host: HostError = err.into();
    assert!(matches!(host, HostError::Canvas(_)));
    assert_eq!(host.to_string(), "invalid canvas config: default zoom 9 outside [0.2, 4]");
}
