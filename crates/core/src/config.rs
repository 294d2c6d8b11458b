use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_LEAD_TIMEOUT_MS: u64 = 8_000;
pub const DEFAULT_LEAD_SOURCE: &str = "insure.supertruck.ai";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub lead: LeadConfig,
    pub contact: ContactConfig,
    pub wizard: WizardConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct LeadConfig {
    pub endpoint: Option<String>,
    pub timeout_ms: u64,
    pub source: String,
    pub auth_token: Option<SecretString>,
}

impl LeadConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Fallback channel surfaced to the user when a lead cannot be delivered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContactConfig {
    pub phone: String,
    pub email: String,
}

impl ContactConfig {
    /// `tel:` link for call and chat widgets.
    pub fn phone_uri(&self) -> String {
        let digits: String = self
            .phone
            .chars()
            .filter(|ch| ch.is_ascii_digit() || *ch == '+')
            .collect();
        format!("tel:{digits}")
    }
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self { phone: "+1 (800) 555-1234".to_string(), email: "hello@supertruck.ai".to_string() }
    }
}

#[derive(Clone, Debug)]
pub struct WizardConfig {
    pub variant: WizardVariant,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardVariant {
    Standard,
    Extended,
}

impl WizardVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Extended => "extended",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub lead_endpoint: Option<String>,
    pub lead_timeout_ms: Option<u64>,
    pub lead_source: Option<String>,
    pub lead_auth_token: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub wizard_variant: Option<WizardVariant>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            lead: LeadConfig {
                endpoint: None,
                timeout_ms: DEFAULT_LEAD_TIMEOUT_MS,
                source: DEFAULT_LEAD_SOURCE.to_string(),
                auth_token: None,
            },
            contact: ContactConfig::default(),
            wizard: WizardConfig { variant: WizardVariant::Standard },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for WizardVariant {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "extended" => Ok(Self::Extended),
            other => Err(ConfigError::Validation(format!(
                "unsupported wizard variant `{other}` (expected standard|extended)"
            ))),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from("haulquote.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(lead) = patch.lead {
            if let Some(endpoint) = lead.endpoint {
                self.lead.endpoint = non_blank(endpoint);
            }
            if let Some(timeout_ms) = lead.timeout_ms {
                self.lead.timeout_ms = timeout_ms;
            }
            if let Some(source) = lead.source {
                self.lead.source = source;
            }
            if let Some(lead_auth_token_value) = lead.auth_token {
                self.lead.auth_token = Some(secret_value(lead_auth_token_value));
            }
        }

        if let Some(contact) = patch.contact {
            if let Some(phone) = contact.phone {
                self.contact.phone = phone;
            }
            if let Some(email) = contact.email {
                self.contact.email = email;
            }
        }

        if let Some(wizard) = patch.wizard {
            if let Some(variant) = wizard.variant {
                self.wizard.variant = variant;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("HAULQUOTE_LEAD_ENDPOINT") {
            self.lead.endpoint = Some(value);
        }
        if let Some(value) = read_env("HAULQUOTE_LEAD_TIMEOUT_MS") {
            self.lead.timeout_ms = parse_u64("HAULQUOTE_LEAD_TIMEOUT_MS", &value)?;
        }
        if let Some(value) = read_env("HAULQUOTE_LEAD_SOURCE") {
            self.lead.source = value;
        }
        if let Some(value) = read_env("HAULQUOTE_LEAD_AUTH_TOKEN") {
            self.lead.auth_token = Some(secret_value(value));
        }

        if let Some(value) = read_env("HAULQUOTE_CONTACT_PHONE") {
            self.contact.phone = value;
        }
        if let Some(value) = read_env("HAULQUOTE_CONTACT_EMAIL") {
            self.contact.email = value;
        }

        if let Some(value) = read_env("HAULQUOTE_WIZARD_VARIANT") {
            self.wizard.variant = value.parse()?;
        }

        let log_level =
            read_env("HAULQUOTE_LOGGING_LEVEL").or_else(|| read_env("HAULQUOTE_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("HAULQUOTE_LOGGING_FORMAT").or_else(|| read_env("HAULQUOTE_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(endpoint) = overrides.lead_endpoint {
            self.lead.endpoint = non_blank(endpoint);
        }
        if let Some(timeout_ms) = overrides.lead_timeout_ms {
            self.lead.timeout_ms = timeout_ms;
        }
        if let Some(source) = overrides.lead_source {
            self.lead.source = source;
        }
        if let Some(auth_token) = overrides.lead_auth_token {
            self.lead.auth_token = Some(secret_value(auth_token));
        }
        if let Some(phone) = overrides.contact_phone {
            self.contact.phone = phone;
        }
        if let Some(email) = overrides.contact_email {
            self.contact.email = email;
        }
        if let Some(variant) = overrides.wizard_variant {
            self.wizard.variant = variant;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_lead(&self.lead)?;
        validate_contact(&self.contact)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("haulquote.toml"), PathBuf::from("config/haulquote.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_lead(lead: &LeadConfig) -> Result<(), ConfigError> {
    if let Some(endpoint) = &lead.endpoint {
        let endpoint = endpoint.trim();
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(ConfigError::Validation(
                "lead.endpoint must start with http:// or https://".to_string(),
            ));
        }
    }

    if lead.timeout_ms == 0 || lead.timeout_ms > 60_000 {
        return Err(ConfigError::Validation(
            "lead.timeout_ms must be in range 1..=60000".to_string(),
        ));
    }

    if lead.source.trim().is_empty() {
        return Err(ConfigError::Validation("lead.source must not be empty".to_string()));
    }

    if let Some(token) = &lead.auth_token {
        if token.expose_secret().trim().is_empty() {
            return Err(ConfigError::Validation(
                "lead.auth_token must not be blank when set".to_string(),
            ));
        }
    }

    Ok(())
}

fn validate_contact(contact: &ContactConfig) -> Result<(), ConfigError> {
    if contact.phone.trim().is_empty() {
        return Err(ConfigError::Validation(
            "contact.phone is required for the delivery fallback message".to_string(),
        ));
    }

    let email = contact.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(ConfigError::Validation(
            "contact.email must be an email address for the delivery fallback message"
                .to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().and_then(non_blank)
}

/// A blank endpoint means "not configured", which delivery reports as a fallback.
fn non_blank(value: String) -> Option<String> {
    (!value.trim().is_empty()).then_some(value)
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    lead: Option<LeadPatch>,
    contact: Option<ContactPatch>,
    wizard: Option<WizardPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct LeadPatch {
    endpoint: Option<String>,
    timeout_ms: Option<u64>,
    source: Option<String>,
    auth_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ContactPatch {
    phone: Option<String>,
    email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WizardPatch {
    variant: Option<WizardVariant>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::sync::{Mutex, OnceLock};

    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    use super::{
        AppConfig, ConfigError, ConfigOverrides, ContactConfig, LoadOptions, LogFormat,
        WizardVariant,
    };

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    fn ensure(condition: bool, message: &'static str) -> Result<(), String> {
        if condition {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }

    #[test]
    fn defaults_leave_endpoint_unset_with_eight_second_timeout() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let config = AppConfig::load(LoadOptions::default())
            .map_err(|err| format!("config load failed: {err}"))?;

        ensure(config.lead.endpoint.is_none(), "endpoint should be unset by default")?;
        ensure(config.lead.timeout_ms == 8_000, "default timeout should be 8 seconds")?;
        ensure(config.lead.source == "insure.supertruck.ai", "default source tag")?;
        ensure(config.wizard.variant == WizardVariant::Standard, "standard layout by default")?;
        ensure(matches!(config.logging.format, LogFormat::Compact), "compact logs by default")
    }

    #[test]
    fn file_load_supports_env_interpolation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("TEST_LEAD_INTAKE_TOKEN", "intake-from-env");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("haulquote.toml");
            fs::write(
                &path,
                r#"
[lead]
endpoint = "https://leads.example.test/api/leads"
auth_token = "${TEST_LEAD_INTAKE_TOKEN}"

[wizard]
variant = "extended"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.lead.auth_token.as_ref().map(|token| token.expose_secret())
                    == Some("intake-from-env"),
                "auth token should be interpolated from environment",
            )?;
            ensure(
                config.lead.endpoint.as_deref() == Some("https://leads.example.test/api/leads"),
                "endpoint should be read from file",
            )?;
            ensure(config.wizard.variant == WizardVariant::Extended, "variant from file")?;
            Ok(())
        })();

        clear_vars(&["TEST_LEAD_INTAKE_TOKEN"]);
        result
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("HAULQUOTE_LEAD_ENDPOINT", "https://from-env.test/leads");
        env::set_var("HAULQUOTE_CONTACT_PHONE", "+1 (336) 442-1139");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("haulquote.toml");
            fs::write(
                &path,
                r#"
[lead]
endpoint = "https://from-file.test/leads"
timeout_ms = 5000

[contact]
phone = "+1 (555) 000-0000"
email = "file@supertruck.ai"

[logging]
level = "warn"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    lead_timeout_ms: Some(250),
                    log_level: Some("debug".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.lead.endpoint.as_deref() == Some("https://from-env.test/leads"),
                "env endpoint should win over file",
            )?;
            ensure(config.lead.timeout_ms == 250, "override timeout should win")?;
            ensure(config.contact.phone == "+1 (336) 442-1139", "env phone should win")?;
            ensure(config.contact.email == "file@supertruck.ai", "file email should apply")?;
            ensure(config.logging.level == "debug", "overridden log level should be debug")?;
            Ok(())
        })();

        clear_vars(&["HAULQUOTE_LEAD_ENDPOINT", "HAULQUOTE_CONTACT_PHONE"]);
        result
    }

    #[test]
    fn logging_env_aliases_are_supported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("HAULQUOTE_LOG_LEVEL", "warn");
        env::set_var("HAULQUOTE_LOG_FORMAT", "json");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.logging.level == "warn", "log level should be set from env alias")?;
            ensure(
                matches!(config.logging.format, LogFormat::Json),
                "json logging format should be set from env alias",
            )
        })();

        clear_vars(&["HAULQUOTE_LOG_LEVEL", "HAULQUOTE_LOG_FORMAT"]);
        result
    }

    #[test]
    fn validation_rejects_non_http_endpoint() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let error = match AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                lead_endpoint: Some("ftp://leads.example.test".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        }) {
            Ok(_) => return Err("expected validation failure but config load succeeded".into()),
            Err(error) => error,
        };

        ensure(
            matches!(
                error,
                ConfigError::Validation(ref message) if message.contains("lead.endpoint")
            ),
            "validation failure should mention lead.endpoint",
        )
    }

    #[test]
    fn blank_endpoint_from_file_or_override_is_treated_as_unset() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let path = dir.path().join("haulquote.toml");
        fs::write(&path, "[lead]\nendpoint = \"\"\n").map_err(|err| err.to_string())?;

        let from_file =
            AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                .map_err(|err| format!("blank file endpoint should load: {err}"))?;
        ensure(from_file.lead.endpoint.is_none(), "blank file endpoint should be unset")?;

        let from_override = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                lead_endpoint: Some("   ".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .map_err(|err| format!("blank override endpoint should load: {err}"))?;
        ensure(from_override.lead.endpoint.is_none(), "blank override endpoint should be unset")
    }

    #[test]
    fn invalid_timeout_env_override_is_reported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("HAULQUOTE_LEAD_TIMEOUT_MS", "soon");
        let result = match AppConfig::load(LoadOptions::default()) {
            Ok(_) => Err("expected invalid override error".to_string()),
            Err(ConfigError::InvalidEnvOverride { key, .. }) => {
                ensure(key == "HAULQUOTE_LEAD_TIMEOUT_MS", "error should name the variable")
            }
            Err(other) => Err(format!("unexpected error: {other}")),
        };

        clear_vars(&["HAULQUOTE_LEAD_TIMEOUT_MS"]);
        result
    }

    #[test]
    fn auth_token_is_not_leaked_by_debug() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let config = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                lead_auth_token: Some("intake-secret-value".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .map_err(|err| format!("config load failed: {err}"))?;

        let debug = format!("{config:?}");
        ensure(!debug.contains("intake-secret-value"), "debug output should not contain token")
    }

    #[test]
    fn phone_uri_keeps_only_dialable_characters() {
        let contact = ContactConfig::default();
        assert_eq!(contact.phone_uri(), "tel:+18005551234");
    }
}
