pub mod list;
pub mod login;

pub use list::ListCommand;
pub use login::{LoginCommand, LoginOutcome};

use crate::{
    aws::{FederationClient, IniProfileStore, StsRoleAssumer},
    browser::SystemBrowser,
    error::Result,
};

/// External collaborators the commands run against
#[derive(Debug)]
pub struct Services<P, R, F, B> {
    pub profiles: P,
    pub roles: R,
    pub federation: F,
    pub browser: B,
}

pub type SystemServices = Services<IniProfileStore, StsRoleAssumer, FederationClient, SystemBrowser>;

impl SystemServices {
    /// Collaborators talking to the AWS shared files, STS, the federation
    /// endpoint and the host browser
    pub fn system() -> Result<Self> {
        Ok(Services {
            profiles: IniProfileStore::load()?,
            roles: StsRoleAssumer,
            federation: FederationClient::new(),
            browser: SystemBrowser,
        })
    }
}
