//! Local `KEY=VALUE` env file and API credential resolution.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::ConfigError;

/// Environment variable (and env-file key) holding the Replicate credential.
pub const TOKEN_KEY: &str = "REPLICATE_API_TOKEN";

/// Key/value pairs read from a local env file.
///
/// The process environment is never modified; values are only looked up
/// explicitly through [`EnvFile::get`].
#[derive(Debug, Clone, Default)]
pub struct EnvFile {
    path: PathBuf,
    vars: HashMap<String, String>,
}

impl EnvFile {
    /// Load an env file. A missing file yields an empty set.
    ///
    /// Each line is `KEY=VALUE`, split on the first `=` with both sides
    /// trimmed; one matching pair of surrounding `"` or `'` quotes is removed
    /// from the value. Blank lines, `#` comments, lines without `=` and lines
    /// with an empty key are skipped. Values are taken literally (no escapes,
    /// no `$VAR` expansion).
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut env = Self { path: path.to_path_buf(), vars: HashMap::new() };

        if !path.exists() {
            info!("[config] No env file found at {}", path.display());
            return Ok(env);
        }

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::EnvFile { path: path.to_path_buf(), source })?;
        for (number, line) in (1..).zip(contents.lines()) {
            match parse_line(line) {
                Some((key, value)) => {
                    debug!("[config] Loaded key {}", key);
                    env.vars.insert(key.to_string(), value.to_string());
                }
                None if is_ignorable(line) => {}
                None => warn!("[config] Skipping line {} in {}: expected KEY=VALUE", number, path.display()),
            }
        }

        info!("[config] Parsed {} key(s) from {}", env.len(), path.display());
        Ok(env)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn len(&self) -> usize {
        self.vars.len()
    }
}

fn is_ignorable(line: &str) -> bool {
    let line = line.trim();
    line.is_empty() || line.starts_with('#')
}

/// Parse one `KEY=VALUE` line. Returns `None` for comments, blanks, lines without `=` and empty keys.
fn parse_line(line: &str) -> Option<(&str, &str)> {
    if is_ignorable(line) {
        return None;
    }
    let (key, value) = line.trim().split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, strip_quotes(value.trim())))
}

fn strip_quotes(value: &str) -> &str {
    ['"', '\'']
        .iter()
        .find_map(|&quote| value.strip_prefix(quote).and_then(|v| v.strip_suffix(quote)))
        .unwrap_or(value)
}

/// Bearer credential for the Replicate API. Redacted in debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    /// Resolve the credential: process environment first, then the env file.
    /// Empty values count as absent.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingToken`] if neither source supplies one.
    pub fn resolve(from_process: Option<String>, env_file: &EnvFile) -> Result<Self, ConfigError> {
        let token = from_process
            .filter(|t| !t.trim().is_empty())
            .or_else(|| env_file.get(TOKEN_KEY).filter(|t| !t.trim().is_empty()).map(str::to_string));

        token.map(Self).ok_or_else(|| ConfigError::MissingToken(env_file.path().display().to_string()))
    }

    /// Resolve from the real process environment.
    pub fn from_env(env_file: &EnvFile) -> Result<Self, ConfigError> {
        Self::resolve(std::env::var(TOKEN_KEY).ok(), env_file)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(***)")
    }
}
