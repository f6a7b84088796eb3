use std::io;

use clap::{ArgAction, Parser, builder::NonEmptyStringValueParser};

use crate::{
    aws::{ProfileStore, RoleAssumer, SigninTokenFetcher},
    browser::BrowserLauncher,
    commands::{ListCommand, LoginCommand, Services},
    config::Settings,
    error::{Error, Result},
};

#[derive(Debug, Clone, Parser)]
#[command(
    name = "awsconsole",
    version,
    about = "Open the AWS Management Console as the role configured in an AWS profile",
    long_about = None
)]
pub struct Cli {
    #[arg(
        value_name = "PROFILE",
        required_unless_present = "list",
        value_parser = NonEmptyStringValueParser::new(),
        help = "AWS profile with role_arn and source_profile configured"
    )]
    pub profile: Option<String>,

    #[arg(short = 'i', long, help = "Open the console in a private browser window")]
    pub incognito: bool,

    #[arg(short = 'l', long, help = "List configured AWS profiles")]
    pub list: bool,

    #[arg(short = 'v', long, action = ArgAction::Count, help = "Increase verbosity (-v info, -vv debug, -vvv trace)")]
    pub verbose: u8,
}

/// Exit status for a clap parse error: help and version succeed only if they were printed
pub fn parse_error_succeeded(err: &clap::Error, printed: io::Result<()>) -> bool {
    printed.is_ok() && !err.use_stderr()
}

impl Cli {
    /// Run the selected command. `settings` is only resolved for a login.
    pub async fn execute<P, R, F, B>(
        self,
        settings: impl FnOnce() -> Result<Settings>,
        services: &Services<P, R, F, B>,
    ) -> Result<()>
    where
        P: ProfileStore,
        R: RoleAssumer,
        F: SigninTokenFetcher,
        B: BrowserLauncher,
    {
        if self.list {
            return ListCommand.execute(&services.profiles, &mut io::stdout().lock());
        }

        let profile = self
            .profile
            .ok_or_else(|| Error::Usage("a profile name is required".to_string()))?;
        let settings = settings()?;

        LoginCommand {
            profile,
            incognito: self.incognito,
        }
        .execute(&settings, services)
        .await
        .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MemoryProfileStore, fake_services};
    use clap::{CommandFactory, error::ErrorKind};

    #[test]
    fn test_command_structure_validation() {
        let cmd = Cli::command();
        cmd.debug_assert();
    }

    #[test]
    fn test_profile_positional() {
        let cli = Cli::try_parse_from(["awsconsole", "admin"]).unwrap();
        assert_eq!(cli.profile.as_deref(), Some("admin"));
        assert!(!cli.incognito);
        assert!(!cli.list);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_incognito_flag() {
        let cli = Cli::try_parse_from(["awsconsole", "-i", "admin"]).unwrap();
        assert!(cli.incognito);

        let cli = Cli::try_parse_from(["awsconsole", "admin", "--incognito"]).unwrap();
        assert!(cli.incognito);
    }

    #[test]
    fn test_list_without_profile() {
        let cli = Cli::try_parse_from(["awsconsole", "-l"]).unwrap();
        assert!(cli.list);
        assert_eq!(cli.profile, None);
    }

    #[test]
    fn test_verbose_flag_multiple() {
        let cli = Cli::try_parse_from(["awsconsole", "-vvv", "admin"]).unwrap();
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn test_help_flag_is_not_an_error() {
        let err = Cli::try_parse_from(["awsconsole", "-h"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        assert!(!err.use_stderr());
    }

    #[test]
    fn test_version_flag_is_not_an_error() {
        let err = Cli::try_parse_from(["awsconsole", "--version"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);
        assert!(!err.use_stderr());
    }

    #[test]
    fn test_unknown_flag_is_a_usage_error() {
        let err = Cli::try_parse_from(["awsconsole", "-z", "admin"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
        assert!(err.use_stderr());
        assert!(err.to_string().contains("Usage:"));
    }

    #[test]
    fn test_missing_profile_is_a_usage_error() {
        let err = Cli::try_parse_from(["awsconsole"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert!(err.use_stderr());

        let err = Cli::try_parse_from(["awsconsole", "-i"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_empty_profile_is_rejected() {
        let err = Cli::try_parse_from(["awsconsole", ""]).unwrap_err();
        assert!(err.use_stderr());
    }

    #[test]
    fn test_help_succeeds_only_when_printed() {
        let err = Cli::try_parse_from(["awsconsole", "--help"]).unwrap_err();
        assert!(parse_error_succeeded(&err, Ok(())));

        let broken = io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed");
        assert!(!parse_error_succeeded(&err, Err(broken)));
    }

    #[test]
    fn test_usage_error_never_succeeds() {
        let err = Cli::try_parse_from(["awsconsole", "-z"]).unwrap_err();
        assert!(!parse_error_succeeded(&err, Ok(())));
    }

    #[test]
    fn test_extra_positional_is_rejected() {
        let err = Cli::try_parse_from(["awsconsole", "admin", "other"]).unwrap_err();
        assert!(err.use_stderr());
    }

    #[tokio::test]
    async fn test_list_does_not_call_aws() {
        let services = fake_services(MemoryProfileStore::admin_profile());
        let cli = Cli::try_parse_from(["awsconsole", "-l"]).unwrap();

        cli.execute(|| Ok(Settings::default()), &services).await.unwrap();

        assert_eq!(services.profiles.list_calls.get(), 1);
        assert_eq!(services.roles.calls(), 0);
        assert_eq!(services.federation.calls(), 0);
        assert!(services.browser.opened.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_list_wins_over_profile() {
        let services = fake_services(MemoryProfileStore::admin_profile());
        let cli = Cli::try_parse_from(["awsconsole", "-l", "admin"]).unwrap();

        cli.execute(|| Ok(Settings::default()), &services).await.unwrap();

        assert_eq!(services.roles.calls(), 0);
    }

    #[tokio::test]
    async fn test_profile_runs_login() {
        let services = fake_services(MemoryProfileStore::admin_profile());
        let cli = Cli::try_parse_from(["awsconsole", "admin"]).unwrap();

        cli.execute(|| Ok(Settings::default()), &services).await.unwrap();

        assert_eq!(services.profiles.list_calls.get(), 0);
        assert_eq!(services.roles.calls(), 1);
        assert_eq!(services.federation.calls(), 1);
        assert_eq!(services.browser.opened.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_profile_without_parser_is_usage_error() {
        let services = fake_services(MemoryProfileStore::new());
        let cli = Cli {
            profile: None,
            incognito: false,
            list: false,
            verbose: 0,
        };

        let err = cli
            .execute(|| Ok(Settings::default()), &services)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Usage(_)));
        assert_eq!(services.roles.calls(), 0);
    }

    fn invalid_settings() -> Result<Settings> {
        Err(Error::Config("unsupported browser 'lynx'".to_string()))
    }

    #[tokio::test]
    async fn test_list_ignores_invalid_settings() {
        let services = fake_services(MemoryProfileStore::admin_profile());
        let cli = Cli::try_parse_from(["awsconsole", "-l"]).unwrap();

        cli.execute(invalid_settings, &services).await.unwrap();

        assert_eq!(services.profiles.list_calls.get(), 1);
    }

    #[tokio::test]
    async fn test_login_stops_on_invalid_settings() {
        let services = fake_services(MemoryProfileStore::admin_profile());
        let cli = Cli::try_parse_from(["awsconsole", "admin"]).unwrap();

        let err = cli.execute(invalid_settings, &services).await.unwrap_err();

        assert!(matches!(err, Error::Config(_)));
        assert_eq!(services.roles.calls(), 0);
        assert_eq!(services.federation.calls(), 0);
    }
}
