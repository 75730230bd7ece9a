use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Config file picked up from the working directory when none is given.
const CWD_CONFIG_FILE: &str = "docchat.yaml";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Base URL of the document chat backend
    #[arg(long, env = "DOCCHAT_BASE_URL")]
    pub base_url: Option<String>,

    /// Request timeout in seconds (0 disables it)
    #[arg(long, env = "DOCCHAT_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Log output format: text or json
    #[arg(long, env = "DOCCHAT_LOG_FORMAT")]
    pub log_format: Option<LogFormat>,

    /// PDF to upload before the prompt opens
    #[arg(short, long)]
    pub upload: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub logging: LoggingConfig,
    /// Document to upload at startup. Only ever set from the command line.
    #[serde(default)]
    pub startup_upload: Option<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub base_url: String,
    pub upload_path: String,
    pub chat_path: String,
    /// Zero means requests never time out.
    pub request_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            upload_path: "/upload-pdf/".to_string(),
            chat_path: "/chat/".to_string(),
            request_timeout_secs: 0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Filter directives used when `RUST_LOG` is not set.
    pub filter: String,
}

impl AppConfig {
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

        let defaults = BackendConfig::default();
        let mut builder = Config::builder()
            .set_default("backend.base_url", defaults.base_url)?
            .set_default("backend.upload_path", defaults.upload_path)?
            .set_default("backend.chat_path", defaults.chat_path)?
            .set_default("backend.request_timeout_secs", defaults.request_timeout_secs)?
            .set_default("logging.format", LogFormat::default().as_str())?
            .set_default("logging.filter", "info")?;

        // Explicit file must exist; the working-directory fallback is optional.
        if let Some(path) = &cli.config {
            builder = builder.add_source(File::with_name(path).required(true));
        } else if Path::new(CWD_CONFIG_FILE).exists() {
            builder = builder.add_source(File::with_name(CWD_CONFIG_FILE).required(false));
        }

        // DOCCHAT_BACKEND__BASE_URL=http://host:8080
        builder = builder.add_source(
            Environment::with_prefix("DOCCHAT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // Flags (and their clap env vars) win over everything else.
        if let Some(url) = cli.base_url {
            builder = builder.set_override("backend.base_url", url)?;
        }
        if let Some(secs) = cli.timeout_secs {
            builder = builder.set_override("backend.request_timeout_secs", secs)?;
        }
        if let Some(format) = cli.log_format {
            builder = builder.set_override("logging.format", format.as_str())?;
        }
        if let Some(path) = cli.upload {
            builder = builder.set_override("startup_upload", path)?;
        }

        let cfg = builder.build()?;
        cfg.try_deserialize()
    }
}
