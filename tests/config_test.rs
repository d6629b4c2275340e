//! Integration tests for Settings config loading with layered precedence.
//!
//! Every test injects its own environment map, so nothing depends on the
//! process environment or on a real global config file.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use config::Environment;
use ktree::config::{Settings, SettingsError};
use ktree::util::testing;
use ktree::Order;
use rstest::{fixture, rstest};
use tempfile::TempDir;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

fn env(vars: &[(&str, &str)]) -> Environment {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Environment::with_prefix("KTREE").source(Some(map))
}

#[fixture]
fn config_dir() -> TempDir {
    TempDir::new().unwrap()
}

fn write_config(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[rstest]
fn given_no_layers_when_load_then_defaults() {
    let settings = Settings::load_layers(None, None, env(&[])).expect("load settings");
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.arity, 2);
    assert_eq!(settings.order, Order::DepthFirst);
    assert!(!settings.strict_orders);
}

#[rstest]
fn given_missing_global_file_when_load_then_skipped(config_dir: TempDir) {
    let global = config_dir.path().join("does-not-exist.toml");
    let settings = Settings::load_layers(Some(&global), None, env(&[])).expect("load settings");
    assert_eq!(settings, Settings::default());
}

#[rstest]
fn given_global_file_when_load_then_overrides_defaults(config_dir: TempDir) {
    let global = write_config(&config_dir, "ktree.toml", "arity = 3\norder = \"bfs\"\n");

    let settings = Settings::load_layers(Some(&global), None, env(&[])).expect("load settings");

    assert_eq!(settings.arity, 3);
    assert_eq!(settings.order, Order::BreadthFirst);
    assert!(!settings.strict_orders);
}

#[rstest]
fn given_global_and_explicit_file_when_load_then_explicit_wins_per_field(config_dir: TempDir) {
    let global = write_config(&config_dir, "global.toml", "arity = 3\norder = \"heap\"\n");
    let local = write_config(&config_dir, "local.toml", "arity = 5\nstrict_orders = true\n");

    let settings =
        Settings::load_layers(Some(&global), Some(&local), env(&[])).expect("load settings");

    assert_eq!(settings.arity, 5);
    assert_eq!(settings.order, Order::Heap, "order inherited from global");
    assert!(settings.strict_orders);
}

#[rstest]
fn given_env_vars_when_load_then_override_files(config_dir: TempDir) {
    let local = write_config(&config_dir, "local.toml", "arity = 5\norder = \"in-order\"\n");

    let settings = Settings::load_layers(
        None,
        Some(&local),
        env(&[
            ("KTREE_ARITY", "4"),
            ("KTREE_ORDER", "post-order"),
            ("KTREE_STRICT_ORDERS", "true"),
        ]),
    )
    .expect("load settings");

    assert_eq!(settings.arity, 4);
    assert_eq!(settings.order, Order::PostOrder);
    assert!(settings.strict_orders);
}

#[rstest]
fn given_missing_explicit_file_when_load_then_read_error(config_dir: TempDir) {
    let missing = config_dir.path().join("nope.toml");
    let result = Settings::load_layers(None, Some(&missing), env(&[]));
    assert!(matches!(result, Err(SettingsError::Read { .. })));
}

#[rstest]
#[case("arity = \"many\"\n")]
#[case("order = \"sideways\"\n")]
#[case("arity = 2\narity = 3\n")]
fn given_malformed_file_when_load_then_parse_error(config_dir: TempDir, #[case] content: &str) {
    let path = write_config(&config_dir, "bad.toml", content);
    let result = Settings::load_layers(None, Some(&path), env(&[]));
    assert!(
        matches!(result, Err(SettingsError::Parse { .. })),
        "expected parse error, got {result:?}"
    );
}

#[rstest]
fn given_zero_arity_in_file_when_load_then_invalid_arity(config_dir: TempDir) {
    let path = write_config(&config_dir, "zero.toml", "arity = 0\n");
    let result = Settings::load_layers(None, Some(&path), env(&[]));
    assert!(matches!(result, Err(SettingsError::InvalidArity(0))));
}

#[rstest]
fn given_zero_arity_in_global_file_when_local_file_overrides_then_still_invalid_arity(
    config_dir: TempDir,
) {
    let global = write_config(&config_dir, "global.toml", "arity = 0\n");
    let local = write_config(&config_dir, "local.toml", "arity = 3\n");

    let result = Settings::load_layers(Some(&global), Some(&local), env(&[]));

    assert!(matches!(result, Err(SettingsError::InvalidArity(0))), "got {result:?}");
}

#[rstest]
fn given_zero_arity_in_env_when_load_then_invalid_arity() {
    let result = Settings::load_layers(None, None, env(&[("KTREE_ARITY", "0")]));
    assert!(matches!(result, Err(SettingsError::InvalidArity(0))), "got {result:?}");
}

#[rstest]
#[case("KTREE_ARITY", "lots")]
#[case("KTREE_ORDER", "zigzag")]
#[case("KTREE_STRICT_ORDERS", "maybe")]
fn given_bad_env_value_when_load_then_env_error(#[case] key: &str, #[case] value: &str) {
    let result = Settings::load_layers(None, None, env(&[(key, value)]));
    assert!(matches!(result, Err(SettingsError::Env(_))), "got {result:?}");
}
