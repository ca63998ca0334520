//! osu! API credentials from the environment (optionally a `.env` file).

use std::path::PathBuf;

use rb_infra::CalculatorCredentials;
use tracing::{debug, warn};

pub const CLIENT_ID_VAR: &str = "OSU_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "OSU_CLIENT_SECRET";

#[derive(Debug, thiserror::Error)]
pub enum CredentialsError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),
}

/// Outcome of loading `.env` into the process environment.
#[derive(Debug, PartialEq, Eq)]
pub enum DotenvStatus {
    Loaded(PathBuf),
    Absent,
    Invalid(String),
}

impl DotenvStatus {
    pub fn from_result(result: dotenvy::Result<PathBuf>) -> Self {
        match result {
            Ok(path) => Self::Loaded(path),
            Err(err) if err.not_found() => Self::Absent,
            Err(err) => Self::Invalid(err.to_string()),
        }
    }

    /// Log the outcome; call once tracing is installed.
    pub fn report(&self) {
        match self {
            Self::Loaded(path) => debug!(path = %path.display(), "Loaded .env file"),
            Self::Absent => debug!("No .env file found"),
            Self::Invalid(reason) => warn!(reason = %reason, "Failed to load .env file"),
        }
    }
}

/// Load `.env` once. Runs before tracing so `RUST_LOG` from the file applies.
pub fn load_dotenv() -> DotenvStatus {
    DotenvStatus::from_result(dotenvy::dotenv())
}

/// Read both variables from the process environment.
pub fn load_credentials() -> Result<CalculatorCredentials, CredentialsError> {
    credentials_from(|key| std::env::var(key).ok())
}

fn credentials_from(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<CalculatorCredentials, CredentialsError> {
    let read = |key: &'static str| {
        lookup(key)
            .filter(|value| !value.trim().is_empty())
            .ok_or(CredentialsError::Missing(key))
    };
    Ok(CalculatorCredentials::new(
        read(CLIENT_ID_VAR)?,
        read(CLIENT_SECRET_VAR)?,
    ))
}
