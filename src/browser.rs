use std::{
    fmt,
    process::{Command, Stdio},
    str::FromStr,
};

use tracing::{debug, info};
use url::Url;

use crate::error::{Error, Result};

/// Opens the console URL.
///
/// [`open`](Self::open) hands the URL to the system URL handler, which usually opens a
/// tab in the running default browser. Only the macOS private window is forced into a
/// new browser instance (`open -n`); elsewhere the browser decides.
pub trait BrowserLauncher {
    fn open(&self, url: &Url) -> Result<()>;

    fn open_incognito(&self, browser: IncognitoBrowser, url: &Url) -> Result<()>;
}

/// Browsers that can be started in a private window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IncognitoBrowser {
    #[default]
    Chrome,
    Chromium,
    Brave,
    Firefox,
    Edge,
}

impl IncognitoBrowser {
    pub const ALL: [IncognitoBrowser; 5] = [
        Self::Chrome,
        Self::Chromium,
        Self::Brave,
        Self::Firefox,
        Self::Edge,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Chrome => "chrome",
            Self::Chromium => "chromium",
            Self::Brave => "brave",
            Self::Firefox => "firefox",
            Self::Edge => "edge",
        }
    }

    pub fn private_flag(self) -> &'static str {
        match self {
            Self::Chrome | Self::Chromium | Self::Brave => "--incognito",
            Self::Firefox => "--private-window",
            Self::Edge => "--inprivate",
        }
    }

    fn macos_app(self) -> &'static str {
        match self {
            Self::Chrome => "Google Chrome",
            Self::Chromium => "Chromium",
            Self::Brave => "Brave Browser",
            Self::Firefox => "Firefox",
            Self::Edge => "Microsoft Edge",
        }
    }

    fn linux_binary(self) -> &'static str {
        match self {
            Self::Chrome => "google-chrome",
            Self::Chromium => "chromium",
            Self::Brave => "brave-browser",
            Self::Firefox => "firefox",
            Self::Edge => "microsoft-edge",
        }
    }

    fn windows_exe(self) -> &'static str {
        match self {
            Self::Chrome | Self::Chromium => "chrome",
            Self::Brave => "brave",
            Self::Firefox => "firefox",
            Self::Edge => "msedge",
        }
    }
}

impl fmt::Display for IncognitoBrowser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IncognitoBrowser {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        match wanted.as_str() {
            "google-chrome" => return Ok(Self::Chrome),
            "msedge" => return Ok(Self::Edge),
            _ => {}
        }

        Self::ALL
            .into_iter()
            .find(|b| b.name() == wanted)
            .ok_or_else(|| {
                let supported = Self::ALL.map(IncognitoBrowser::name).join(", ");
                Error::Config(format!(
                    "unsupported browser '{s}', expected one of: {supported}"
                ))
            })
    }
}

/// Host platforms with a known way to open URLs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Linux,
    Windows,
}

impl Platform {
    pub fn current() -> Option<Self> {
        if cfg!(target_os = "macos") {
            Some(Self::MacOs)
        } else if cfg!(target_os = "windows") {
            Some(Self::Windows)
        } else if cfg!(unix) {
            Some(Self::Linux)
        } else {
            None
        }
    }
}

/// A prepared launch; `wait` means the exit status is checked
#[derive(Debug)]
struct Launch {
    command: Command,
    wait: bool,
}

fn open_command(platform: Platform, url: &str) -> Launch {
    let command = match platform {
        Platform::MacOs => {
            let mut cmd = Command::new("open");
            cmd.arg(url);
            cmd
        }
        Platform::Linux => {
            let mut cmd = Command::new("xdg-open");
            cmd.arg(url);
            cmd
        }
        // `cmd /c start` would split the URL on `&`
        Platform::Windows => {
            let mut cmd = Command::new("rundll32");
            cmd.args(["url.dll,FileProtocolHandler", url]);
            cmd
        }
    };

    Launch {
        command,
        wait: true,
    }
}

fn incognito_command(platform: Platform, browser: IncognitoBrowser, url: &str) -> Launch {
    match platform {
        Platform::MacOs => {
            let mut cmd = Command::new("open");
            cmd.args(["-na", browser.macos_app(), "--args", browser.private_flag(), url]);
            Launch {
                command: cmd,
                wait: true,
            }
        }
        // The browser binary stays in the foreground, so it is not waited on
        Platform::Linux => {
            let mut cmd = Command::new(browser.linux_binary());
            cmd.args([browser.private_flag(), url]);
            Launch {
                command: cmd,
                wait: false,
            }
        }
        Platform::Windows => {
            let mut cmd = Command::new("powershell");
            cmd.args([
                "-NoProfile",
                "-Command",
                &format!(
                    "Start-Process {} -ArgumentList '{}','{}'",
                    browser.windows_exe(),
                    browser.private_flag(),
                    url
                ),
            ]);
            Launch {
                command: cmd,
                wait: true,
            }
        }
    }
}

fn run(launch: Launch) -> Result<()> {
    let Launch { mut command, wait } = launch;
    let program = command.get_program().to_string_lossy().into_owned();
    debug!("Launching browser with {}", program);

    command.stdout(Stdio::null()).stderr(Stdio::null());

    if !wait {
        return command
            .spawn()
            .map(|_| ())
            .map_err(|e| Error::browser_launch(format!("failed to execute {program}: {e}")));
    }

    let status = command
        .status()
        .map_err(|e| Error::browser_launch(format!("failed to execute {program}: {e}")))?;

    if !status.success() {
        return Err(Error::browser_launch(format!(
            "{program} exited with {status}"
        )));
    }

    Ok(())
}

/// [`BrowserLauncher`] using the host's URL opener and browser binaries
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

impl BrowserLauncher for SystemBrowser {
    fn open(&self, url: &Url) -> Result<()> {
        let platform = Platform::current()
            .ok_or_else(|| Error::browser_launch("unsupported operating system"))?;

        run(open_command(platform, url.as_str()))?;
        info!("Opened AWS Management Console in browser");
        Ok(())
    }

    fn open_incognito(&self, browser: IncognitoBrowser, url: &Url) -> Result<()> {
        let platform = Platform::current()
            .ok_or_else(|| Error::browser_launch("unsupported operating system"))?;

        run(incognito_command(platform, browser, url.as_str()))?;
        info!("Opened AWS Management Console in a private {} window", browser);
        Ok(())
    }
}
