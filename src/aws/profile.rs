use std::path::PathBuf;

use ini::{Ini, Properties};
use tracing::debug;

use crate::{
    constants::{self, REGION_KEY, ROLE_ARN_KEY, SOURCE_PROFILE_KEY},
    error::{Error, Result},
};

/// Read access to named AWS profiles.
///
/// `get` returns `None` when the field is absent, and `Some("")` when it is
/// present but empty, so callers can tell the two apart.
pub trait ProfileStore {
    fn get(&self, profile: &str, field: &str) -> Result<Option<String>>;

    fn list_profiles(&self) -> Result<Vec<String>>;
}

/// Role settings of a profile, as configured
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleProfile {
    pub role_arn: String,
    pub source_profile: String,
    pub region: Option<String>,
}

/// Resolve the role to assume for `profile`.
///
/// `role_arn` is checked before `source_profile`. Absent and empty values are
/// both treated as missing.
pub fn lookup_role_profile(store: &impl ProfileStore, profile: &str) -> Result<RoleProfile> {
    let role_arn = non_empty(store.get(profile, ROLE_ARN_KEY)?, profile, ROLE_ARN_KEY)
        .ok_or_else(|| Error::MissingRoleArn {
            profile: profile.to_string(),
        })?;

    let source_profile = non_empty(
        store.get(profile, SOURCE_PROFILE_KEY)?,
        profile,
        SOURCE_PROFILE_KEY,
    )
    .ok_or_else(|| Error::MissingSourceProfile {
        profile: profile.to_string(),
    })?;

    // Region falls back to the source profile, like the CLI does for chained roles
    let region = match non_empty(store.get(profile, REGION_KEY)?, profile, REGION_KEY) {
        Some(region) => Some(region),
        None => non_empty(
            store.get(&source_profile, REGION_KEY)?,
            &source_profile,
            REGION_KEY,
        ),
    };

    debug!("Role ARN: {}", role_arn);
    debug!("Source profile: {}", source_profile);

    Ok(RoleProfile {
        role_arn,
        source_profile,
        region,
    })
}

fn non_empty(value: Option<String>, profile: &str, field: &str) -> Option<String> {
    match value {
        Some(value) if !value.is_empty() => Some(value),
        Some(_) => {
            debug!("{field} is empty in profile '{profile}'");
            None
        }
        None => {
            debug!("{field} is not set in profile '{profile}'");
            None
        }
    }
}

/// Profile store backed by the AWS shared config and credentials files
#[derive(Debug, Default)]
pub struct IniProfileStore {
    config: Option<Ini>,
    credentials: Option<Ini>,
}

impl IniProfileStore {
    /// Load from the default locations, honoring `AWS_CONFIG_FILE` and
    /// `AWS_SHARED_CREDENTIALS_FILE`
    pub fn load() -> Result<Self> {
        Self::from_paths(
            constants::get_aws_config_path(),
            constants::get_aws_credentials_path(),
        )
    }

    /// Load from explicit paths. Files that do not exist are treated as empty.
    pub fn from_paths(
        config_path: Option<PathBuf>,
        credentials_path: Option<PathBuf>,
    ) -> Result<Self> {
        Ok(Self {
            config: load_ini(config_path)?,
            credentials: load_ini(credentials_path)?,
        })
    }

    fn config_section(&self, profile: &str) -> Option<&Properties> {
        let ini = self.config.as_ref()?;

        ini.section(Some(config_section_name(profile))).or_else(|| {
            if profile == "default" {
                ini.section(Some("profile default"))
            } else {
                None
            }
        })
    }

    fn credentials_section(&self, profile: &str) -> Option<&Properties> {
        self.credentials.as_ref()?.section(Some(profile))
    }
}

impl ProfileStore for IniProfileStore {
    fn get(&self, profile: &str, field: &str) -> Result<Option<String>> {
        // Credentials file wins over the config file for keys present in both
        let value = self
            .credentials_section(profile)
            .and_then(|section| section.get(field))
            .or_else(|| {
                self.config_section(profile)
                    .and_then(|section| section.get(field))
            });

        Ok(value.map(str::to_string))
    }

    fn list_profiles(&self) -> Result<Vec<String>> {
        let mut profiles: Vec<String> = Vec::new();

        let config_profiles = self
            .config
            .iter()
            .flat_map(|ini| ini.sections().flatten())
            .filter_map(profile_name_from_config_section);

        let credentials_profiles = self
            .credentials
            .iter()
            .flat_map(|ini| ini.sections().flatten())
            .map(str::trim);

        for name in config_profiles.chain(credentials_profiles) {
            if !name.is_empty() && !profiles.iter().any(|p| p == name) {
                profiles.push(name.to_string());
            }
        }

        Ok(profiles)
    }
}

fn load_ini(path: Option<PathBuf>) -> Result<Option<Ini>> {
    let Some(path) = path else {
        return Ok(None);
    };

    if !path.exists() {
        debug!("AWS file not found, skipping: {}", path.display());
        return Ok(None);
    }

    match Ini::load_from_file(&path) {
        Ok(ini) => Ok(Some(ini)),
        Err(source) => Err(Error::ProfileStore { path, source }),
    }
}

fn config_section_name(profile: &str) -> String {
    if profile == "default" {
        profile.to_string()
    } else {
        format!("profile {profile}")
    }
}

fn profile_name_from_config_section(section: &str) -> Option<&str> {
    if section == "default" {
        return Some(section);
    }

    section.strip_prefix("profile ").map(str::trim)
}
