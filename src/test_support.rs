//! In-memory collaborators that record how they were called.

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
};

use url::Url;

use crate::{
    aws::{AssumeRoleRequest, Credentials, ProfileStore, RoleAssumer, SigninTokenFetcher},
    browser::{BrowserLauncher, IncognitoBrowser},
    commands::Services,
    error::{Error, Result},
};

#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    values: HashMap<(String, String), String>,
    order: Vec<String>,
    pub list_calls: Cell<usize>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, profile: &str, field: &str, value: &str) -> Self {
        if !self.order.iter().any(|p| p == profile) {
            self.order.push(profile.to_string());
        }
        self.values
            .insert((profile.to_string(), field.to_string()), value.to_string());
        self
    }

    pub fn admin_profile() -> Self {
        Self::new()
            .with("base", "region", "eu-west-1")
            .with("admin", "role_arn", "arn:aws:iam::123456789012:role/Admin")
            .with("admin", "source_profile", "base")
    }
}

impl ProfileStore for MemoryProfileStore {
    fn get(&self, profile: &str, field: &str) -> Result<Option<String>> {
        Ok(self
            .values
            .get(&(profile.to_string(), field.to_string()))
            .cloned())
    }

    fn list_profiles(&self) -> Result<Vec<String>> {
        self.list_calls.set(self.list_calls.get() + 1);
        Ok(self.order.clone())
    }
}

#[derive(Debug, Default)]
pub struct FakeRoleAssumer {
    pub requests: RefCell<Vec<AssumeRoleRequest>>,
    pub failure: Option<String>,
}

impl FakeRoleAssumer {
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl RoleAssumer for FakeRoleAssumer {
    async fn assume_role(&self, request: &AssumeRoleRequest) -> Result<Credentials> {
        self.requests.borrow_mut().push(request.clone());

        if let Some(message) = &self.failure {
            return Err(Error::AssumeRole {
                role_arn: request.role_arn.clone(),
                message: message.clone(),
            });
        }

        Ok(Credentials {
            access_key_id: "ASIATEMPORARY".to_string(),
            secret_access_key: "temporary-secret".to_string(),
            session_token: "temporary-token".to_string(),
            expiration: None,
        })
    }
}

#[derive(Debug)]
pub struct FakeFederation {
    pub token: Option<String>,
    pub endpoints: RefCell<Vec<Url>>,
}

impl FakeFederation {
    pub fn returning(token: &str) -> Self {
        Self {
            token: Some(token.to_string()),
            endpoints: RefCell::default(),
        }
    }

    pub fn failing() -> Self {
        Self {
            token: None,
            endpoints: RefCell::default(),
        }
    }

    pub fn calls(&self) -> usize {
        self.endpoints.borrow().len()
    }
}

impl SigninTokenFetcher for FakeFederation {
    async fn fetch_signin_token(&self, endpoint: &Url, _creds: &Credentials) -> Result<String> {
        self.endpoints.borrow_mut().push(endpoint.clone());

        self.token.clone().ok_or_else(|| Error::TokenExchange {
            message: "federation endpoint returned 400 Bad Request".to_string(),
        })
    }
}

/// How the browser was asked to open a URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Opened {
    Default(Url),
    Incognito(IncognitoBrowser, Url),
}

#[derive(Debug, Default)]
pub struct RecordingBrowser {
    pub opened: RefCell<Vec<Opened>>,
    pub unavailable: bool,
}

impl RecordingBrowser {
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    fn launch(&self, opened: Opened) -> Result<()> {
        self.opened.borrow_mut().push(opened);
        if self.unavailable {
            return Err(Error::BrowserLaunch {
                message: "failed to execute xdg-open: No such file or directory".to_string(),
            });
        }
        Ok(())
    }
}

impl BrowserLauncher for RecordingBrowser {
    fn open(&self, url: &Url) -> Result<()> {
        self.launch(Opened::Default(url.clone()))
    }

    fn open_incognito(&self, browser: IncognitoBrowser, url: &Url) -> Result<()> {
        self.launch(Opened::Incognito(browser, url.clone()))
    }
}

pub type FakeServices =
    Services<MemoryProfileStore, FakeRoleAssumer, FakeFederation, RecordingBrowser>;

pub fn fake_services(profiles: MemoryProfileStore) -> FakeServices {
    Services {
        profiles,
        roles: FakeRoleAssumer::default(),
        federation: FakeFederation::returning("XYZ"),
        browser: RecordingBrowser::default(),
    }
}
