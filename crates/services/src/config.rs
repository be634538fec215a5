use std::env;
use std::fmt;
use std::str::FromStr;

use outloud_core::model::{BlockId, IdentityError, UserId, Viewer};
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Path layout of the backend. The deployed variants agree on semantics but
/// not on every route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ApiFlavor {
    /// `/api/questions/{id}`, `/api/purchase`, `/api/view`.
    #[default]
    Standard,
    /// Like `Standard` with questions under `/api/blocks/{id}/questions`.
    Nested,
    /// `/api/blocks?user_id=`, `/api/questions?block_id=`,
    /// `/api/create_invoice`, `/api/log_view`.
    WebApp,
}

/// How purchases are submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseMode {
    /// `POST /api/purchase`; any 2xx counts as accepted.
    Direct,
    /// `POST /api/create_invoice`; accepted only when the reply has `ok: true`.
    Invoice,
}

impl ApiFlavor {
    /// Path of the question list for a block, relative to the api root.
    #[must_use]
    pub fn questions_path(self, block_id: BlockId) -> String {
        match self {
            ApiFlavor::Standard => format!("api/questions/{block_id}"),
            ApiFlavor::Nested => format!("api/blocks/{block_id}/questions"),
            ApiFlavor::WebApp => "api/questions".to_string(),
        }
    }

    /// Whether the block id travels as a `block_id` query parameter.
    #[must_use]
    pub fn questions_by_query(self) -> bool {
        matches!(self, ApiFlavor::WebApp)
    }

    /// Whether the catalog request carries the viewer's `user_id`.
    #[must_use]
    pub fn blocks_with_user(self) -> bool {
        matches!(self, ApiFlavor::WebApp)
    }

    #[must_use]
    pub fn view_path(self) -> &'static str {
        match self {
            ApiFlavor::Standard | ApiFlavor::Nested => "api/view",
            ApiFlavor::WebApp => "api/log_view",
        }
    }

    #[must_use]
    pub fn purchase_mode(self) -> PurchaseMode {
        match self {
            ApiFlavor::Standard | ApiFlavor::Nested => PurchaseMode::Direct,
            ApiFlavor::WebApp => PurchaseMode::Invoice,
        }
    }
}

impl fmt::Display for ApiFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ApiFlavor::Standard => "standard",
            ApiFlavor::Nested => "nested",
            ApiFlavor::WebApp => "webapp",
        };
        f.write_str(name)
    }
}

impl FromStr for ApiFlavor {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(ApiFlavor::Standard),
            "nested" => Ok(ApiFlavor::Nested),
            "webapp" | "web-app" => Ok(ApiFlavor::WebApp),
            _ => Err(ConfigError::UnknownFlavor(s.to_string())),
        }
    }
}

/// Connection and identity settings for the viewer.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_url: Url,
    pub flavor: ApiFlavor,
    pub user_id: Option<UserId>,
    pub init_data: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: parse_api_url(DEFAULT_API_URL).expect("default api url should be valid"),
            flavor: ApiFlavor::default(),
            user_id: None,
            init_data: None,
        }
    }
}

impl ClientConfig {
    /// Read `OUTLOUD_API_URL`, `OUTLOUD_API_FLAVOR`, `OUTLOUD_USER_ID` and
    /// `OUTLOUD_INIT_DATA`; unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Ok(raw) = env::var("OUTLOUD_API_URL") {
            config.api_url = parse_api_url(&raw)?;
        }
        if let Ok(raw) = env::var("OUTLOUD_API_FLAVOR") {
            config.flavor = raw.parse()?;
        }
        if let Ok(raw) = env::var("OUTLOUD_USER_ID") {
            config.user_id = Some(parse_user_id(&raw)?);
        }
        config.init_data = env::var("OUTLOUD_INIT_DATA")
            .ok()
            .filter(|raw| !raw.trim().is_empty());
        Ok(config)
    }

    /// Resolve the viewer from the explicit id or the host init data.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError` when no usable identity was supplied.
    pub fn viewer(&self) -> Result<Viewer, IdentityError> {
        Viewer::resolve(self.user_id, self.init_data.as_deref())
    }
}

/// Parse an api root, making sure relative joins keep any path prefix.
///
/// # Errors
///
/// Returns `ConfigError::InvalidApiUrl` if `raw` is not an absolute URL.
pub fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    Url::parse(&with_slash).map_err(|source| ConfigError::InvalidApiUrl {
        raw: raw.to_string(),
        source,
    })
}

/// # Errors
///
/// Returns `ConfigError::InvalidUserId` if `raw` is not a number.
pub fn parse_user_id(raw: &str) -> Result<UserId, ConfigError> {
    raw.parse()
        .map_err(|_| ConfigError::InvalidUserId(raw.to_string()))
}
