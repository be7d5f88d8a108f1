//! Application settings.

use crate::document::Format;
use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format as _, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::instrument;

const ENV_PREFIX: &str = "SIFT_";
const ENV_SEPARATOR: &str = "__";

/// HTTP source settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Whether `http(s)://` sources may be fetched at all.
    pub enabled: bool,
    pub timeout_seconds: u64,
    pub user_agent: String,
}
impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_seconds: 30,
            user_agent: concat!("sift/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Everything the front end needs to find definitions and read sources.
///
/// Loaded in layers, each overriding the one before:
///
/// 1. built-in defaults,
/// 2. `config.{toml,yaml,json}` in the platform configuration directory,
/// 3. an explicit file given by the caller,
/// 4. `SIFT_*` environment variables, with `__` between nested keys
///    (`SIFT_HTTP__TIMEOUT_SECONDS=10`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory of scraper definition documents.
    pub scrapers: PathBuf,
    /// Directory of media type documents.
    pub types: PathBuf,
    /// Base directory for relative local source references.
    pub root: Option<PathBuf>,
    /// Import images by default instead of linking them.
    pub import: bool,
    /// Let an operator choose between ambiguous matches by default.
    pub ask_user: bool,
    /// Copy inherited details from parent records by default.
    pub inherit: bool,
    pub http: HttpConfig,
}
impl Default for Config {
    fn default() -> Self {
        let base = config_dir().unwrap_or_default();
        Self {
            scrapers: base.join("scrapers"),
            types: base.join("types"),
            root: None,
            import: false,
            ask_user: false,
            inherit: false,
            http: HttpConfig::default(),
        }
    }
}
impl Config {
    /// Loads and validates the layered configuration.
    #[instrument(level = "debug")]
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config: Self = Self::figment(explicit)?
            .extract()
            .or_raise(|| ErrorKind::InvalidConfig("could not extract settings".to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// The layered provider stack, without extracting it.
    pub fn figment(explicit: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(dir) = config_dir() {
            tracing::debug!(dir = %dir.display(), "using platform configuration directory");
            figment = figment
                .merge(Toml::file(dir.join("config.toml")))
                .merge(Yaml::file(dir.join("config.yaml")))
                .merge(Json::file(dir.join("config.json")));
        }
        if let Some(path) = explicit {
            if !path.is_file() {
                exn::bail!(ErrorKind::InvalidConfig(format!("{} is not a file", path.display())));
            }
            figment = match Format::from_path(path) {
                Some(Format::Toml) => figment.merge(Toml::file(path)),
                Some(Format::Yaml) => figment.merge(Yaml::file(path)),
                Some(Format::Json) => figment.merge(Json::file(path)),
                None => exn::bail!(ErrorKind::InvalidConfig(format!(
                    "{} has an unsupported extension",
                    path.display()
                ))),
            };
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split(ENV_SEPARATOR)))
    }

    /// Rejects settings that can't work.
    pub fn validate(&self) -> Result<()> {
        if self.http.timeout_seconds == 0 {
            exn::bail!(ErrorKind::InvalidConfig("http.timeout_seconds must be greater than zero".to_string()));
        }
        let directories = [("scrapers", Some(&self.scrapers)), ("types", Some(&self.types)), ("root", self.root.as_ref())];
        for (key, path) in directories {
            if let Some(path) = path
                && !path.is_dir()
            {
                exn::bail!(ErrorKind::InvalidConfig(format!("{key}: {} is not a directory", path.display())));
            }
        }
        Ok(())
    }
}

fn config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "sift").map(|dirs| dirs.config_dir().to_path_buf())
}
