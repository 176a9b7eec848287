//! Environment configuration
//!
//! Resolves the base URI of the service under test from a key/value file.
//! The file carries one URL per environment under the keys `devUrl`,
//! `testUrl` and `prodUrl`; the environment token picks which one binds.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

use crate::error::{Error, Result};

/// Default location of the endpoint file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config/endpoints.toml";

/// Key holding the optional request timeout, in whole seconds
pub const REQUEST_TIMEOUT_KEY: &str = "requestTimeoutSecs";

/// Request timeout used when the config file does not set one
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Target environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Dev,
    #[default]
    Test,
    Prod,
}

impl Environment {
    /// Property key holding this environment's base URI
    pub fn url_key(&self) -> &'static str {
        match self {
            Environment::Dev => "devUrl",
            Environment::Test => "testUrl",
            Environment::Prod => "prodUrl",
        }
    }
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "test" => Ok(Environment::Test),
            "prod" => Ok(Environment::Prod),
            _ => Err(Error::UnknownEnvironment(s.to_string())),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Dev => write!(f, "dev"),
            Environment::Test => write!(f, "test"),
            Environment::Prod => write!(f, "prod"),
        }
    }
}

/// Contents of an endpoint file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointFile {
    pub dev_url: Option<String>,
    pub test_url: Option<String>,
    pub prod_url: Option<String>,
    /// Per-request timeout in whole seconds
    pub request_timeout_secs: Option<u64>,
}

impl EndpointFile {
    /// Load an endpoint file.
    ///
    /// Files ending in `.properties` are read as Java-style properties,
    /// anything else as TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        let is_properties = path
            .extension()
            .map(|ext| ext == "properties")
            .unwrap_or(false);

        let file = if is_properties {
            let mut props = Properties::from_properties_str(&content);
            debug!("Loaded {} propert(ies) from {}", props.len(), path.display());
            let file = Self::from_properties(&props);
            props.clear();
            file?
        } else {
            debug!("Loaded endpoint file {}", path.display());
            Self::from_toml_str(&content)?
        };
        Ok(file)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Pick the known keys out of a property set
    pub fn from_properties(props: &Properties) -> Result<Self> {
        let request_timeout_secs = props
            .get(REQUEST_TIMEOUT_KEY)
            .map(|raw| {
                raw.trim().parse::<u64>().map_err(|_| {
                    Error::InvalidConfig(format!(
                        "{} must be a whole number of seconds, got '{}'",
                        REQUEST_TIMEOUT_KEY, raw
                    ))
                })
            })
            .transpose()?;

        Ok(Self {
            dev_url: props.get(Environment::Dev.url_key()).map(str::to_string),
            test_url: props.get(Environment::Test.url_key()).map(str::to_string),
            prod_url: props.get(Environment::Prod.url_key()).map(str::to_string),
            request_timeout_secs,
        })
    }

    /// Base URI configured for `environment`, if any
    pub fn url(&self, environment: Environment) -> Option<&str> {
        match environment {
            Environment::Dev => self.dev_url.as_deref(),
            Environment::Test => self.test_url.as_deref(),
            Environment::Prod => self.prod_url.as_deref(),
        }
    }
}

/// Flat key/value property set read from a `.properties` file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: BTreeMap<String, String>,
}

impl Properties {
    /// Parse Java-style properties: `key=value` or `key: value`, one per
    /// line, `#` and `!` start a comment line.
    pub fn from_properties_str(content: &str) -> Self {
        let mut entries = BTreeMap::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }

            let (key, value) = split_property(line);
            if key.is_empty() {
                continue;
            }
            entries.insert(unescape(key), unescape(value));
        }

        Self { entries }
    }

    /// Look up a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Split at the first unescaped `=` or `:`
fn split_property(line: &str) -> (&str, &str) {
    let mut escaped = false;
    for (idx, ch) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '=' | ':' => return (line[..idx].trim_end(), line[idx + 1..].trim_start()),
            _ => {}
        }
    }
    (line, "")
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

/// Resolved configuration for one test run.
///
/// Built once before any group runs and handed to each group by reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentConfig {
    pub environment: Environment,
    pub base_uri: String,
    #[serde(with = "duration_secs")]
    pub request_timeout: Duration,
}

impl EnvironmentConfig {
    /// Select the base URI for `environment` from a loaded endpoint file
    pub fn resolve(environment: Environment, file: &EndpointFile) -> Result<Self> {
        let base_uri = file
            .url(environment)
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| Error::MissingUrl {
                environment: environment.to_string(),
                key: environment.url_key().to_string(),
            })?
            .to_string();

        let request_timeout = file
            .request_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        Ok(Self {
            environment,
            base_uri,
            request_timeout,
        })
    }

    /// Parse the environment token, load the file and resolve
    pub fn load(token: &str, path: &Path) -> Result<Self> {
        let environment = token.parse::<Environment>()?;
        let file = EndpointFile::load(path)?;
        Self::resolve(environment, &file)
    }

    /// Override the request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

mod duration_secs {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }
}
