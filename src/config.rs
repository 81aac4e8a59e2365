use clap::{Parser, Subcommand};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE", global = true)]
    pub config: Option<String>,

    /// Backend root URL (without the /api suffix)
    #[arg(long, env = "DOCECM_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Two-letter language code, or "auto"
    #[arg(long, env = "DOCECM_DEFAULT_LANGUAGE", global = true)]
    pub default_language: Option<String>,

    /// Where the session is persisted
    #[arg(long, env = "DOCECM_STATE_FILE", global = true)]
    pub state_file: Option<PathBuf>,

    /// Log output format (pretty or json)
    #[arg(long, env = "DOCECM_LOG_FORMAT", global = true)]
    pub log_format: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "DOCECM_TIMEOUT_SECS", global = true)]
    pub timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Log in and load the session data
    Login {
        #[arg(long, env = "DOCECM_USERNAME")]
        username: String,
        #[arg(long, env = "DOCECM_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Reload the persisted session from the backend
    Restore,
    /// Log out and clear the persisted session
    Logout,
    /// Show the persisted session
    Status,
    /// List the plugin descriptors
    Plugins,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub http: HttpConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub plugins: PluginsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub url: String,
    pub default_language: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

impl HttpConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    pub state_file: PathBuf,
    pub persist: bool,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct PluginsConfig {
    pub file: Option<PathBuf>,
}

impl ClientConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Self::from_cli(&cli)
    }

    /// Priority: CLI flag (or its env var) > `DOCECM_` env > config file > defaults.
    pub fn from_cli(cli: &Cli) -> Result<Self, config::ConfigError> {
        let mut builder = Config::builder()
            .set_default("api.url", "http://localhost:8080")?
            .set_default("api.default_language", crate::localization::AUTO)?
            .set_default("http.timeout_secs", 30)?
            .set_default("session.state_file", ".docecm/session.json")?
            .set_default("session.persist", true)?
            .set_default("logging.format", "pretty")?;

        // Explicit file must exist; ./docecm.{yaml,json,toml} is optional
        builder = match &cli.config {
            Some(path) => builder.add_source(File::with_name(path)),
            None => builder.add_source(File::with_name("docecm").required(false)),
        };

        // E.g. DOCECM_HTTP__TIMEOUT_SECS=5
        builder = builder.add_source(
            Environment::with_prefix("DOCECM")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        if let Some(url) = &cli.api_url {
            builder = builder.set_override("api.url", url.as_str())?;
        }
        if let Some(lang) = &cli.default_language {
            builder = builder.set_override("api.default_language", lang.as_str())?;
        }
        if let Some(path) = &cli.state_file {
            builder = builder.set_override("session.state_file", path.to_string_lossy().into_owned())?;
        }
        if let Some(format) = &cli.log_format {
            builder = builder.set_override("logging.format", format.as_str())?;
        }
        if let Some(secs) = cli.timeout_secs {
            builder = builder.set_override("http.timeout_secs", secs)?;
        }

        builder.build()?.try_deserialize()
    }
}
