//! Config file loading.

use cohort_core::config::GeneratorConfig;

#[test]
fn bundled_config_loads_and_validates() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../data/cohort.json");
    let config = GeneratorConfig::load(path).unwrap();
    config.validate().unwrap();
    assert_eq!(config, GeneratorConfig::default());
}

#[test]
fn missing_fields_fall_back_to_defaults() {
    let config: GeneratorConfig = serde_json::from_str(r#"{ "seed": 7, "p_attend": 1.0 }"#).unwrap();
    assert_eq!(config.seed, 7);
    assert_eq!(config.p_attend, 1.0);
    assert_eq!(config.n_subjects, GeneratorConfig::default().n_subjects);
}

#[test]
fn missing_file_is_an_error() {
    let err = GeneratorConfig::load("/nonexistent/cohort.json").unwrap_err();
    assert!(err.to_string().contains("Cannot read"), "Unexpected error: {err}");
}
