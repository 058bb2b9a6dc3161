//! CLI command implementations

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::api;
use crate::auth::{Role, SessionKeys, SessionUser};
use crate::cli::{error, info, print_decision, print_route_table, success, warn, OutputFormat};
use crate::config::{self, loader::CONFIG_FILENAME, Config, RuleConfig};
use crate::guard::{Guard, RouteTable};

/// Initialize a new portal.toml configuration file.
/// With `with_rules` the built-in route table is written out so it can be edited.
pub async fn init(with_rules: bool) -> Result<()> {
    let config_path = Path::new(CONFIG_FILENAME);

    if config_path.exists() {
        warn(&format!("{} already exists", CONFIG_FILENAME));
        return Ok(());
    }

    if with_rules {
        let mut config = Config::default();
        config.access.rules = RouteTable::portal_default()
            .rules()
            .iter()
            .map(RuleConfig::from)
            .collect();
        config::save_config(&config, config_path)?;
        warn("Change [auth] secret before exposing the portal");
    } else {
        fs::write(config_path, config::loader::default_config_content())?;
    }

    success(&format!("Created {}", CONFIG_FILENAME));
    info("Point [api] base_url at the remote API and run 'dna-portal serve'");

    Ok(())
}

/// Start the portal server
pub async fn serve(host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = load_config()?;
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    info(&format!("Starting portal on http://{}:{}", host, port));
    api::run_server(config, &host, port).await?;
    Ok(())
}

/// Print the effective route table
pub async fn routes(format: OutputFormat) -> Result<()> {
    let table = load_table()?;

    match format {
        OutputFormat::Table => print_route_table(&table),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&table)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&table)?),
    }

    Ok(())
}

/// Evaluate the guard for one role and path
pub async fn check(role: Role, path: &str) -> Result<()> {
    let guard = Guard::new(load_table()?);
    let decision = guard.check(path, role);

    match guard.table().resolve(path) {
        Some(rule) => info(&format!(
            "{} is covered by rule '{}' ({})",
            path, rule.prefix, rule.roles
        )),
        None => info(&format!(
            "{} matches no rule, fallback allows ({})",
            path,
            guard.table().fallback()
        )),
    }
    print_decision(path, role, &decision);

    Ok(())
}

/// Sign a session token with the configured secret
pub async fn token(role: Role, user_id: String, name: String) -> Result<()> {
    let config = load_config()?;
    let keys = SessionKeys::from_config(&config.auth);
    let user = SessionUser::new(user_id, name, role);

    let token = keys.issue(&user, None)?;
    info(&format!(
        "Valid for {} seconds. Send as 'Authorization: Bearer <token>' or the '{}' cookie.",
        keys.ttl_secs(),
        config.auth.cookie_name
    ));
    println!("{}", token);

    Ok(())
}

fn load_config() -> Result<Config> {
    match config::load_config_or_default() {
        Ok(config) => Ok(config),
        Err(e) => {
            error(&format!("Failed to load config: {}", e));
            Err(e.into())
        }
    }
}

fn load_table() -> Result<RouteTable> {
    let config = load_config()?;
    Ok(RouteTable::from_config(&config.access)?)
}
