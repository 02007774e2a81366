use regex::Regex;
use serde::Deserialize;
use std::error::Error;
use std::sync::Arc;

use crate::auth::{Argon2Hasher, CredentialHasher};
use crate::error::ConfigError;

fn default_db_path() -> String {
    "sqlite:///var/formwright/forms.db".into()
}

fn default_auth_db_path() -> String {
    "sqlite:///var/formwright/auth.db".into()
}

fn expand_placeholders(text: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
    let env_re = Regex::new(r"\$ENV\{([^}]+)\}")?;
    let file_re = Regex::new(r"\$FILE\{([^}]+)\}")?;
    let mut out = String::new();
    let mut last = 0;
    for caps in env_re.captures_iter(text) {
        let Some(m) = caps.get(0) else { continue };
        out.push_str(&text[last..m.start()]);
        let var = std::env::var(&caps[1])
            .map_err(|e| ConfigError::Invalid(format!("$ENV{{{}}}: {e}", &caps[1])))?;
        out.push_str(&var);
        last = m.end();
    }
    out.push_str(&text[last..]);
    let text = out;
    let mut out = String::new();
    let mut last = 0;
    for caps in file_re.captures_iter(&text) {
        let Some(m) = caps.get(0) else { continue };
        out.push_str(&text[last..m.start()]);
        let contents = std::fs::read_to_string(&caps[1])
            .map_err(|_| ConfigError::FileNotFound(caps[1].to_string()))?;
        out.push_str(contents.trim_end_matches(['\r', '\n']));
        last = m.end();
    }
    out.push_str(&text[last..]);
    Ok(out)
}

/// Argon2 cost parameters. Unset values use the library defaults.
#[derive(Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct HashSettings {
    #[serde(default)]
    pub memory_kib: Option<u32>,
    #[serde(default)]
    pub iterations: Option<u32>,
    #[serde(default)]
    pub parallelism: Option<u32>,
}

impl HashSettings {
    /// Build the credential hasher these settings describe.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are rejected by Argon2.
    pub fn hasher(&self) -> Result<Arc<dyn CredentialHasher>, ConfigError> {
        if *self == HashSettings::default() {
            return Ok(Arc::new(Argon2Hasher::default()));
        }
        let defaults = argon2::Params::default();
        let hasher = Argon2Hasher::with_params(
            self.memory_kib.unwrap_or(defaults.m_cost()),
            self.iterations.unwrap_or(defaults.t_cost()),
            self.parallelism.unwrap_or(defaults.p_cost()),
        )
        .map_err(|e| ConfigError::Invalid(format!("argon2: {e}")))?;
        Ok(Arc::new(hasher))
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub addr: String,
    #[serde(default = "default_db_path")]
    pub db_path: String,
    #[serde(default = "default_auth_db_path")]
    pub auth_db_path: String,
    /// Reject form and field names that are not plain SQL identifiers
    /// before they reach the database.
    #[serde(default)]
    pub strict_identifiers: bool,
    #[serde(default)]
    pub argon2: HashSettings,
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &str) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let text = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.to_string()))?;
        Self::from_toml(&text)
    }

    /// Parse configuration text, expanding `$ENV{..}` and `$FILE{..}`
    /// placeholders first.
    ///
    /// # Errors
    ///
    /// Returns an error if a placeholder cannot be resolved or the TOML is
    /// invalid.
    pub fn from_toml(text: &str) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let text = expand_placeholders(text)?;
        let cfg: Config = toml::from_str(&text)?;
        Ok(cfg)
    }
}
