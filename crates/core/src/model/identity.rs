use serde::Deserialize;
use thiserror::Error;

use crate::model::ids::UserId;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IdentityError {
    #[error("host did not supply a user id")]
    Missing,

    #[error("init data has no `user` field")]
    NoUserField,

    #[error("init data `user` field is not valid JSON: {0}")]
    InvalidUser(#[from] serde_json::Error),
}

/// Viewer identity as supplied by the host application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    id: UserId,
    username: Option<String>,
    first_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InitDataUser {
    id: u64,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    first_name: Option<String>,
}

impl Viewer {
    #[must_use]
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            username: None,
            first_name: None,
        }
    }

    /// Parse a Telegram WebApp `initData` query string.
    ///
    /// Only the `user` field is read; the `hash` signature is not checked here.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::NoUserField` when `user` is absent and
    /// `IdentityError::InvalidUser` when it does not hold a user object.
    pub fn from_init_data(init_data: &str) -> Result<Self, IdentityError> {
        let raw_user = url::form_urlencoded::parse(init_data.trim().as_bytes())
            .find(|(key, _)| key == "user")
            .map(|(_, value)| value.into_owned())
            .ok_or(IdentityError::NoUserField)?;
        let user: InitDataUser = serde_json::from_str(&raw_user)?;
        Ok(Self {
            id: UserId::new(user.id),
            username: user.username,
            first_name: user.first_name,
        })
    }

    /// Resolve identity from an explicit id first, then from init data.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::Missing` when neither source is present, or the
    /// init-data parse error when only init data is given and it is malformed.
    pub fn resolve(
        explicit: Option<UserId>,
        init_data: Option<&str>,
    ) -> Result<Self, IdentityError> {
        if let Some(id) = explicit {
            return Ok(Self::new(id));
        }
        match init_data.map(str::trim).filter(|raw| !raw.is_empty()) {
            Some(raw) => Self::from_init_data(raw),
            None => Err(IdentityError::Missing),
        }
    }

    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Name to greet the viewer with, if the host shared one.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.first_name.as_deref().or(self.username.as_deref())
    }
}
