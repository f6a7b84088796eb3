use std::path::PathBuf;

use thiserror::Error;

/// Failures along the console sign-in pipeline.
///
/// Everything except [`Error::BrowserLaunch`] aborts the run. A browser launch
/// failure is recovered by printing the console URL instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Usage(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Failed to read AWS profile store {path}: {source}")]
    ProfileStore {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },
    #[error("Profile '{profile}' has no role_arn configured")]
    MissingRoleArn { profile: String },
    #[error("Profile '{profile}' has no source_profile configured")]
    MissingSourceProfile { profile: String },
    #[error("Failed to assume role {role_arn}: {message}")]
    AssumeRole { role_arn: String, message: String },
    #[error("Failed to get signin token: {message}")]
    TokenExchange { message: String },
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch { message: String },
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn token_exchange(message: impl Into<String>) -> Self {
        Self::TokenExchange {
            message: message.into(),
        }
    }

    pub(crate) fn browser_launch(message: impl Into<String>) -> Self {
        Self::BrowserLaunch {
            message: message.into(),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
