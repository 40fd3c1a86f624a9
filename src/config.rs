//! Configuration for the sender
//!
//! Every value comes from the process environment, except the message text
//! which is the first positional CLI argument.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const ENV_SESSION_FILE: &str = "SESSION_FILE";
pub const ENV_API_ID: &str = "TG_API_ID";
pub const ENV_API_HASH: &str = "TG_API_HASH";
pub const ENV_RECIPIENT: &str = "BOT_USERNAME";

/// Session file name under the home directory when `SESSION_FILE` is unset.
pub const DEFAULT_SESSION_FILE: &str = "~/.telethon_test_session";
pub const DEFAULT_RECIPIENT: &str = "autonous_bot";
pub const DEFAULT_MESSAGE: &str = "hello";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub session_file: PathBuf,
    pub api_id: i32,
    pub api_hash: String,
    /// Recipient username, stored without the leading `@`.
    pub recipient: String,
    pub message: String,
}

impl Config {
    /// Resolve configuration from the process environment.
    pub fn from_env(message: Option<String>) -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok(), dirs::home_dir(), message)
    }

    /// Resolve configuration through an arbitrary variable lookup.
    ///
    /// Required values are checked before anything else is touched, so a
    /// missing credential never reaches the session layer.
    pub fn from_lookup<F>(lookup: F, home: Option<PathBuf>, message: Option<String>) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_id = parse_api_id(required(&lookup, ENV_API_ID)?)?;
        let api_hash = required(&lookup, ENV_API_HASH)?;

        let session_raw =
            lookup(ENV_SESSION_FILE).unwrap_or_else(|| DEFAULT_SESSION_FILE.to_string());
        let session_file = expand_home(&session_raw, home.as_deref());

        let recipient = lookup(ENV_RECIPIENT).unwrap_or_else(|| DEFAULT_RECIPIENT.to_string());
        let recipient = normalize_username(&recipient).to_string();

        Ok(Self {
            session_file,
            api_id,
            api_hash,
            recipient,
            message: message.unwrap_or_else(|| DEFAULT_MESSAGE.to_string()),
        })
    }

    /// Lock file guarding the session file against concurrent runs.
    pub fn lock_file(&self) -> PathBuf {
        let mut name = self.session_file.clone().into_os_string();
        name.push(".lock");
        PathBuf::from(name)
    }
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::MissingEnv(key)),
    }
}

fn parse_api_id(raw: String) -> Result<i32> {
    raw.trim().parse::<i32>().map_err(|e| Error::InvalidEnv {
        key: ENV_API_ID,
        value: raw.clone(),
        reason: e.to_string(),
    })
}

/// Strip a single leading `@` from a username.
pub fn normalize_username(name: &str) -> &str {
    name.strip_prefix('@').unwrap_or(name)
}

/// Expand a leading `~` to the home directory. Without a home directory the
/// path is kept relative to the working directory.
pub fn expand_home(raw: &str, home: Option<&Path>) -> PathBuf {
    match (home, raw) {
        (Some(home), "~") => home.to_path_buf(),
        (Some(home), s) if s.starts_with("~/") => home.join(&s[2..]),
        (None, s) if s.starts_with("~/") => PathBuf::from(&s[2..]),
        _ => PathBuf::from(raw),
    }
}
