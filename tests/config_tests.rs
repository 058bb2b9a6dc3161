//! Configuration loading tests

use dna_portal::auth::{Role, RoleSet};
use dna_portal::config::{loader, save_config, Config, MatchMode, RuleConfig};
use dna_portal::error::Error;
use dna_portal::guard::RouteTable;
use std::fs;
use tempfile::TempDir;

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("portal.toml");
    fs::write(&path, content).expect("Failed to write config");
    path
}

#[test]
fn test_empty_file_gives_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "");

    let config = loader::load_config_from_path(&path).unwrap();
    assert_eq!(config.server.port, 3456);
    assert_eq!(config.auth.cookie_name, "dna_portal_session");
    assert_eq!(config.auth.session_ttl_secs, 3600);
    assert_eq!(config.access.fallback, RoleSet::only(Role::Guest));
    assert_eq!(config.access.matching, MatchMode::Segment);
}

#[test]
fn test_custom_rules_are_loaded() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[access]
matching = "prefix"

[[access.rules]]
prefix = "/"
exact = true
roles = ["guest", "customer", "staff", "manager", "admin"]

[[access.rules]]
prefix = "/lab"
roles = ["staff", "manager"]
"#,
    );

    let config = loader::load_config_from_path(&path).unwrap();
    assert_eq!(config.access.rules.len(), 2);
    assert_eq!(config.access.matching, MatchMode::Prefix);

    let table = RouteTable::from_config(&config.access).unwrap();
    assert_eq!(
        table.allowed_roles("/lab/queue"),
        RoleSet::only(Role::Staff).with(Role::Manager)
    );
}

#[test]
fn test_unknown_role_in_rules_fails_to_parse() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[[access.rules]]
prefix = "/lab"
roles = ["wizard"]
"#,
    );

    let result = loader::load_config_from_path(&path);
    assert!(matches!(result, Err(Error::TomlParse(_))));
}

#[test]
fn test_table_without_open_home_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[[access.rules]]
prefix = "/admin"
roles = ["admin"]
"#,
    );

    let config = loader::load_config_from_path(&path).unwrap();
    let result = RouteTable::from_config(&config.access);
    assert!(matches!(result, Err(Error::InvalidRouteTable(_))));
}

#[test]
fn test_env_interpolation_in_file() {
    std::env::set_var("DNA_PORTAL_TEST_API", "http://lab.internal/api");
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[api]
base_url = "${DNA_PORTAL_TEST_API}"
timeout_secs = 3
"#,
    );

    let config = loader::load_config_from_path(&path).unwrap();
    assert_eq!(config.api.base_url, "http://lab.internal/api");
    assert_eq!(config.api.timeout_secs, 3);
    std::env::remove_var("DNA_PORTAL_TEST_API");
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let result = loader::load_config_from_path(&dir.path().join("nope.toml"));
    assert!(matches!(result, Err(Error::ConfigNotFound)));
}

#[test]
fn test_save_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("portal.toml");

    let mut config = Config::default();
    config.server.port = 8088;
    config.access.fallback = RoleSet::all();
    save_config(&config, &path).unwrap();

    let reloaded = loader::load_config_from_path(&path).unwrap();
    assert_eq!(reloaded.server.port, 8088);
    assert_eq!(reloaded.access.fallback, RoleSet::all());
}

#[test]
fn test_exported_default_rules_reload_to_same_table() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("portal.toml");

    let mut config = Config::default();
    config.access.rules = RouteTable::portal_default()
        .rules()
        .iter()
        .map(RuleConfig::from)
        .collect();
    save_config(&config, &path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("[[access.rules]]"));

    let reloaded = loader::load_config_from_path(&path).unwrap();
    let table = RouteTable::from_config(&reloaded.access).unwrap();
    assert_eq!(table.rules(), RouteTable::portal_default().rules());
    assert!(table.rules().iter().any(|rule| rule.prefix == "/" && rule.exact));
}
