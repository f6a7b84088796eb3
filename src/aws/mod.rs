use aws_smithy_types::DateTime;

pub mod console;
pub mod profile;
pub mod sts;

/// AWS temporary credentials structure
#[derive(Clone)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
    pub expiration: Option<DateTime>,
}

// Secrets stay out of debug output and logs
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .field("session_token", &"** redacted **")
            .field("expiration", &self.expiration)
            .finish()
    }
}

pub use console::{FederationClient, Partition, SigninTokenFetcher};
pub use profile::{IniProfileStore, ProfileStore, RoleProfile};
pub use sts::{AssumeRoleRequest, RoleAssumer, StsRoleAssumer};
