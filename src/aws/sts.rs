use aws_config::{BehaviorVersion, Region};
use aws_sdk_sts::{Client as StsClient, error::DisplayErrorContext};
use tracing::{debug, info};

use super::Credentials;
use crate::{
    constants::{APP_NAME, DEFAULT_AWS_REGION},
    error::{Error, Result},
};

/// STS limits role session names to 64 characters
const MAX_SESSION_NAME_LEN: usize = 64;
const MIN_SESSION_NAME_LEN: usize = 2;

/// Input to a single AssumeRole call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssumeRoleRequest {
    pub role_arn: String,
    pub role_session_name: String,
    pub source_profile: String,
    pub region: Option<String>,
}

/// Exchanges a source profile's credentials for temporary role credentials
#[allow(async_fn_in_trait)]
pub trait RoleAssumer {
    async fn assume_role(&self, request: &AssumeRoleRequest) -> Result<Credentials>;
}

/// [`RoleAssumer`] backed by AWS STS
#[derive(Debug, Clone, Default)]
pub struct StsRoleAssumer;

impl RoleAssumer for StsRoleAssumer {
    async fn assume_role(&self, request: &AssumeRoleRequest) -> Result<Credentials> {
        info!("Calling AWS STS AssumeRole");
        debug!("Source profile: {}", request.source_profile);
        debug!("Role ARN: {}", request.role_arn);
        debug!("Role session name: {}", request.role_session_name);

        // Priority: request region -> ENV vars / config file -> DEFAULT_AWS_REGION
        let config = {
            let mut loader = aws_config::defaults(BehaviorVersion::latest())
                .profile_name(&request.source_profile);
            if let Some(region) = &request.region {
                loader = loader.region(Region::new(region.clone()));
            }
            let loaded = loader.load().await;

            match loaded.region() {
                Some(region) => {
                    info!("Using region: {}", region);
                    loaded
                }
                None => {
                    info!(
                        "No region configured, using default {} for STS",
                        DEFAULT_AWS_REGION
                    );
                    aws_config::defaults(BehaviorVersion::latest())
                        .profile_name(&request.source_profile)
                        .region(Region::new(DEFAULT_AWS_REGION))
                        .load()
                        .await
                }
            }
        };

        let client = StsClient::new(&config);

        let response = client
            .assume_role()
            .role_arn(&request.role_arn)
            .role_session_name(&request.role_session_name)
            .send()
            .await
            .map_err(|e| Error::AssumeRole {
                role_arn: request.role_arn.clone(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        let sts_creds = response.credentials().ok_or_else(|| Error::AssumeRole {
            role_arn: request.role_arn.clone(),
            message: "AWS STS returned no credentials".to_string(),
        })?;

        let credentials = Credentials {
            access_key_id: sts_creds.access_key_id().to_string(),
            secret_access_key: sts_creds.secret_access_key().to_string(),
            session_token: sts_creds.session_token().to_string(),
            expiration: Some(*sts_creds.expiration()),
        };

        info!("Successfully obtained temporary credentials");
        Ok(credentials)
    }
}

/// Derive a valid role session name from the issuer.
///
/// STS accepts `[\w+=,.@-]{2,64}`; anything else becomes `-`.
pub fn role_session_name(issuer: &str) -> String {
    let name: String = issuer
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || "+=,.@_-".contains(c) {
                c
            } else {
                '-'
            }
        })
        .take(MAX_SESSION_NAME_LEN)
        .collect();

    if name.len() < MIN_SESSION_NAME_LEN {
        APP_NAME.to_string()
    } else {
        name
    }
}
