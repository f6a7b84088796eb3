use std::env;

use crate::{
    browser::IncognitoBrowser,
    constants::{APP_NAME, BROWSER_ENV, ISSUER_ENV, REGION_ENVS, USER_ENVS},
    error::Result,
};

/// Run settings resolved once at startup and passed down explicitly
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Identity recorded as the federation issuer and role session name
    pub issuer: String,
    /// Region override taking precedence over the profile's region
    pub region: Option<String>,
    /// Browser used for private windows
    pub browser: IncognitoBrowser,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            issuer: APP_NAME.to_string(),
            region: None,
            browser: IncognitoBrowser::default(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let first_set = |keys: &[&str]| {
            keys.iter()
                .filter_map(|key| lookup(*key))
                .map(|value| value.trim().to_string())
                .find(|value| !value.is_empty())
        };

        let issuer = first_set(&[ISSUER_ENV])
            .or_else(|| first_set(&USER_ENVS))
            .unwrap_or_else(|| APP_NAME.to_string());

        let region = first_set(&REGION_ENVS);

        let browser = match first_set(&[BROWSER_ENV]) {
            Some(name) => name.parse()?,
            None => IncognitoBrowser::default(),
        };

        Ok(Self {
            issuer,
            region,
            browser,
        })
    }
}
