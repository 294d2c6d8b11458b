use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use haulquote_core::config::{AppConfig, LoadOptions};
use secrecy::ExposeSecret;
use toml::Value;

use crate::commands::CommandResult;

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "config",
                "config_validation",
                format!("config validation failed: {error}"),
                2,
            );
        }
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line(
        "lead.endpoint",
        config.lead.endpoint.as_deref().unwrap_or("<unset>"),
        source("lead.endpoint", &["HAULQUOTE_LEAD_ENDPOINT"]),
    ));
    lines.push(render_line(
        "lead.timeout_ms",
        &config.lead.timeout_ms.to_string(),
        source("lead.timeout_ms", &["HAULQUOTE_LEAD_TIMEOUT_MS"]),
    ));
    lines.push(render_line(
        "lead.source",
        &config.lead.source,
        source("lead.source", &["HAULQUOTE_LEAD_SOURCE"]),
    ));
    let auth_token = config
        .lead
        .auth_token
        .as_ref()
        .map(|token| redact_token(token.expose_secret()))
        .unwrap_or_else(|| "<unset>".to_string());
    lines.push(render_line(
        "lead.auth_token",
        &auth_token,
        source("lead.auth_token", &["HAULQUOTE_LEAD_AUTH_TOKEN"]),
    ));

    lines.push(render_line(
        "contact.phone",
        &config.contact.phone,
        source("contact.phone", &["HAULQUOTE_CONTACT_PHONE"]),
    ));
    lines.push(render_line(
        "contact.email",
        &config.contact.email,
        source("contact.email", &["HAULQUOTE_CONTACT_EMAIL"]),
    ));

    lines.push(render_line(
        "wizard.variant",
        config.wizard.variant.as_str(),
        source("wizard.variant", &["HAULQUOTE_WIZARD_VARIANT"]),
    ));

    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        source("logging.level", &["HAULQUOTE_LOGGING_LEVEL", "HAULQUOTE_LOG_LEVEL"]),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        source("logging.format", &["HAULQUOTE_LOGGING_FORMAT", "HAULQUOTE_LOG_FORMAT"]),
    ));

    CommandResult::success("config", lines.join("\n"))
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("haulquote.toml"), PathBuf::from("config/haulquote.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

fn redact_token(token: &str) -> String {
    let trimmed = token.trim();
    if trimmed.chars().count() <= 4 {
        return "<redacted>".to_string();
    }
    let prefix: String = trimmed.chars().take(4).collect();
    format!("{prefix}***")
}
