// SPDX-License-Identifier: Apache-2.0

use prizenation_core::{ClientConfig, ConfigLayer, DEFAULT_API_URL};
use std::fs;
use tempfile::tempdir;

#[test]
fn missing_file_is_an_empty_layer() {
    let dir = tempdir().expect("tempdir");
    let layer = ConfigLayer::load(&dir.path().join("absent.toml")).expect("missing ok");
    assert_eq!(layer, ConfigLayer::default());
    assert_eq!(ClientConfig::from_layers(&[layer]).api_url, DEFAULT_API_URL);
}

#[test]
fn toml_file_layer_is_parsed() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        "api_url = \"https://prizes.example\"\ntimeout_secs = 12\nlog_json = true\n",
    )
    .expect("write config");
    let cfg = ClientConfig::from_layers(&[ConfigLayer::load(&path).expect("parse")]);
    assert_eq!(cfg.api_url, "https://prizes.example");
    assert_eq!(cfg.timeout_secs, 12);
    assert!(cfg.log_json);
}

#[test]
fn unknown_keys_are_rejected() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    fs::write(&path, "api = \"typo\"\n").expect("write config");
    let err = ConfigLayer::load(&path).expect_err("unknown key");
    assert!(err.to_string().contains("failed to parse config"));
}
