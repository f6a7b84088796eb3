use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use super::Credentials;
use crate::error::{Error, Result};

// AWS Federation API types (internal use only)
// These types match the exact JSON format expected by AWS federation endpoint

/// Session credentials format for AWS federation getSigninToken API
#[derive(Debug, Serialize)]
struct SessionCredentials<'a> {
    #[serde(rename = "sessionId")]
    session_id: &'a str,
    #[serde(rename = "sessionKey")]
    session_key: &'a str,
    #[serde(rename = "sessionToken")]
    session_token: &'a str,
}

/// Response from AWS federation getSigninToken API
#[derive(Debug, Deserialize)]
struct SigninTokenResponse {
    #[serde(rename = "SigninToken")]
    signin_token: String,
}

/// AWS partition, which decides the sign-in and console domains
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    Aws,
    AwsUsGov,
    AwsCn,
}

impl Partition {
    pub fn from_region(region: Option<&str>) -> Self {
        match region {
            Some(r) if r.starts_with("us-gov-") => Self::AwsUsGov,
            Some(r) if r.starts_with("cn-") => Self::AwsCn,
            _ => Self::Aws,
        }
    }

    pub fn domain(self) -> &'static str {
        match self {
            Self::Aws => "aws.amazon.com",
            Self::AwsUsGov => "amazonaws-us-gov.com",
            Self::AwsCn => "amazonaws.cn",
        }
    }

    /// Federation endpoint serving both getSigninToken and login
    pub fn federation_endpoint(self) -> Result<Url> {
        Ok(Url::parse(&format!(
            "https://signin.{}/federation",
            self.domain()
        ))?)
    }

    /// Console landing page the federated session is redirected to
    pub fn destination(self, region: Option<&str>) -> Result<Url> {
        let mut url = Url::parse(&format!("https://console.{}/console/home", self.domain()))?;
        if let Some(region) = region {
            url.query_pairs_mut().append_pair("region", region);
        }
        Ok(url)
    }
}

/// Build the getSigninToken request URL for `creds`.
pub fn signin_token_url(endpoint: &Url, creds: &Credentials) -> Result<Url> {
    let session = SessionCredentials {
        session_id: &creds.access_key_id,
        session_key: &creds.secret_access_key,
        session_token: &creds.session_token,
    };

    let session_json = serde_json::to_string(&session)
        .map_err(|e| Error::token_exchange(format!("failed to encode session: {e}")))?;

    let mut url = endpoint.clone();
    url.query_pairs_mut()
        .clear()
        .append_pair("Action", "getSigninToken")
        .append_pair("Session", &session_json);

    Ok(url)
}

/// Build the console login URL for a signin token.
pub fn console_url(endpoint: &Url, signin_token: &str, issuer: &str, destination: &Url) -> Url {
    let mut url = endpoint.clone();
    url.query_pairs_mut()
        .clear()
        .append_pair("Action", "login")
        .append_pair("Issuer", issuer)
        .append_pair("Destination", destination.as_str())
        .append_pair("SigninToken", signin_token);

    url
}

/// Extract the signin token from a getSigninToken response body
fn parse_signin_token(body: &str) -> Result<String> {
    let response: SigninTokenResponse = serde_json::from_str(body)
        .map_err(|e| Error::token_exchange(format!("failed to parse response: {e}")))?;

    if response.signin_token.is_empty() {
        return Err(Error::token_exchange("response contained an empty SigninToken"));
    }

    Ok(response.signin_token)
}

/// Exchanges temporary credentials for a federation signin token
#[allow(async_fn_in_trait)]
pub trait SigninTokenFetcher {
    async fn fetch_signin_token(&self, endpoint: &Url, creds: &Credentials) -> Result<String>;
}

/// [`SigninTokenFetcher`] calling the federation endpoint over HTTPS
#[derive(Debug, Clone, Default)]
pub struct FederationClient {
    client: Client,
}

impl FederationClient {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SigninTokenFetcher for FederationClient {
    async fn fetch_signin_token(&self, endpoint: &Url, creds: &Credentials) -> Result<String> {
        info!("Requesting signin token from {}", endpoint);
        let url = signin_token_url(endpoint, creds)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::token_exchange(format!("request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::token_exchange(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(Error::token_exchange(format!(
                "federation endpoint returned {status}: {}",
                body.trim()
            )));
        }

        debug!("Received getSigninToken response ({} bytes)", body.len());
        parse_signin_token(&body)
    }
}
