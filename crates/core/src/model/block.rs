use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::model::ids::BlockId;

/// Amount charged for a block, as reported by the backend.
///
/// The backend sends either an integer or a decimal; both are accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Price(f64);

impl Price {
    pub const FREE: Price = Price(0.0);

    /// Creates a price, clamping negative and non-finite amounts to zero.
    #[must_use]
    pub fn new(amount: f64) -> Self {
        if amount.is_finite() && amount > 0.0 {
            Self(amount)
        } else {
            Self::FREE
        }
    }

    #[must_use]
    pub fn amount(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{:.0}", self.0)
        } else {
            write!(f, "{:.2}", self.0)
        }
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = Option::<f64>::deserialize(deserializer)?;
        Ok(amount.map_or(Self::FREE, Price::new))
    }
}

/// A named, possibly paywalled group of questions.
///
/// Blocks are immutable once fetched; the catalog is replaced wholesale after
/// any purchase instead of being patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    id: BlockId,
    #[serde(alias = "title")]
    name: String,
    #[serde(default)]
    is_paid: bool,
    #[serde(default)]
    price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    accessible: Option<bool>,
}

impl Block {
    #[must_use]
    pub fn free(id: BlockId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_paid: false,
            price: Price::FREE,
            accessible: None,
        }
    }

    #[must_use]
    pub fn paid(id: BlockId, name: impl Into<String>, price: Price) -> Self {
        Self {
            id,
            name: name.into(),
            is_paid: true,
            price,
            accessible: None,
        }
    }

    /// Attach the accessibility flag the backend computes for a known viewer.
    #[must_use]
    pub fn with_accessible(mut self, accessible: bool) -> Self {
        self.accessible = Some(accessible);
        self
    }

    #[must_use]
    pub fn id(&self) -> BlockId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn is_paid(&self) -> bool {
        self.is_paid
    }

    #[must_use]
    pub fn price(&self) -> Price {
        self.price
    }

    /// Accessibility as reported by the backend, if it reported one.
    #[must_use]
    pub fn accessible(&self) -> Option<bool> {
        self.accessible
    }

    /// True when the viewer can open the block without any purchase step.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.is_paid || self.accessible == Some(true)
    }
}
