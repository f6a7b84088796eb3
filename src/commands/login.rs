use aws_smithy_types::date_time::Format;
use tracing::{debug, info, warn};
use url::Url;

use super::Services;
use crate::{
    aws::{
        AssumeRoleRequest, Partition, ProfileStore, RoleAssumer, SigninTokenFetcher, console,
        profile, sts,
    },
    browser::BrowserLauncher,
    config::Settings,
    error::Result,
};

/// Sign in to the console as the role configured in `profile`
#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub profile: String,
    pub incognito: bool,
}

/// Result of a successful login run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub console_url: Url,
    /// False when no browser could be launched and the URL was printed instead
    pub opened: bool,
}

impl LoginCommand {
    pub async fn execute<P, R, F, B>(
        &self,
        settings: &Settings,
        services: &Services<P, R, F, B>,
    ) -> Result<LoginOutcome>
    where
        P: ProfileStore,
        R: RoleAssumer,
        F: SigninTokenFetcher,
        B: BrowserLauncher,
    {
        info!("Opening AWS Management Console for profile: {}", self.profile);

        let role = profile::lookup_role_profile(&services.profiles, &self.profile)?;

        let region = settings.region.clone().or(role.region);
        let partition = Partition::from_region(region.as_deref());

        let request = AssumeRoleRequest {
            role_arn: role.role_arn,
            role_session_name: sts::role_session_name(&settings.issuer),
            source_profile: role.source_profile,
            region: region.clone(),
        };
        let credentials = services.roles.assume_role(&request).await?;

        if let Some(expiration) = &credentials.expiration {
            debug!(
                "Temporary credentials expire at: {}",
                expiration
                    .fmt(Format::DateTime)
                    .unwrap_or_else(|_| "unknown".to_string())
            );
        }

        let endpoint = partition.federation_endpoint()?;
        let signin_token = services
            .federation
            .fetch_signin_token(&endpoint, &credentials)
            .await?;

        let destination = partition.destination(region.as_deref())?;
        let console_url =
            console::console_url(&endpoint, &signin_token, &settings.issuer, &destination);

        let launched = if self.incognito {
            services
                .browser
                .open_incognito(settings.browser, &console_url)
        } else {
            services.browser.open(&console_url)
        };

        let opened = match launched {
            Ok(()) => true,
            Err(e) => {
                warn!("{e}");
                eprintln!("Could not open a browser. Open this URL to sign in:");
                println!("{console_url}");
                false
            }
        };

        Ok(LoginOutcome {
            console_url,
            opened,
        })
    }
}
