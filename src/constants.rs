use std::{env, path::PathBuf};

use dirs;

/// Tool name, used as the fallback issuer and role session name
pub const APP_NAME: &str = "awsconsole";

/// AWS configuration directory name
pub const AWS_CONFIG_DIR_NAME: &str = ".aws";

/// AWS configuration file name
pub const AWS_CONFIG_FILE_NAME: &str = "config";

/// AWS shared credentials file name
pub const AWS_CREDENTIALS_FILE_NAME: &str = "credentials";

/// Default AWS region for STS operations when no region is configured
pub const DEFAULT_AWS_REGION: &str = "us-east-1";

/// Profile keys read from the AWS shared files
pub const ROLE_ARN_KEY: &str = "role_arn";
pub const SOURCE_PROFILE_KEY: &str = "source_profile";
pub const REGION_KEY: &str = "region";

/// Environment overrides for the issuer and the incognito browser
pub const ISSUER_ENV: &str = "AWSCONSOLE_ISSUER";
pub const BROWSER_ENV: &str = "AWSCONSOLE_BROWSER";

/// Environment variables that identify the invoking user, in lookup order
pub const USER_ENVS: [&str; 3] = ["USER", "USERNAME", "LOGNAME"];

/// Environment variables that override the configured region, in lookup order
pub const REGION_ENVS: [&str; 2] = ["AWS_REGION", "AWS_DEFAULT_REGION"];

/// Get the AWS config file path
/// Respects AWS_CONFIG_FILE environment variable if set
pub fn get_aws_config_path() -> Option<PathBuf> {
    if let Ok(path) = env::var("AWS_CONFIG_FILE") {
        return Some(PathBuf::from(path));
    }

    dirs::home_dir().map(|home| home.join(AWS_CONFIG_DIR_NAME).join(AWS_CONFIG_FILE_NAME))
}

/// Get the AWS credentials file path
/// Respects AWS_SHARED_CREDENTIALS_FILE environment variable if set
pub fn get_aws_credentials_path() -> Option<PathBuf> {
    if let Ok(path) = env::var("AWS_SHARED_CREDENTIALS_FILE") {
        return Some(PathBuf::from(path));
    }

    dirs::home_dir().map(|home| {
        home.join(AWS_CONFIG_DIR_NAME)
            .join(AWS_CREDENTIALS_FILE_NAME)
    })
}
