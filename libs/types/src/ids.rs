//! Vehicle identifiers
//!
//! A VIN is the identity key of a position log. Identifiers are normalized to
//! upper case on ingestion, so `the1vin` and `THE1VIN` name the same vehicle.

use crate::errors::VinError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Normalized vehicle identifier
///
/// Always non-empty and made of `[0-9A-Z]` only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Vin(String);

impl Vin {
    /// Normalize and validate a raw identifier
    pub fn parse(raw: &str) -> Result<Self, VinError> {
        if raw.is_empty() {
            return Err(VinError::Empty);
        }
        let s = raw.to_ascii_uppercase();
        if !s.bytes().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()) {
            return Err(VinError::Malformed(s));
        }
        Ok(Self(s))
    }

    /// Generate a random identifier in the `THE{10 digits}VIN` shape
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(format!("THE{:010}VIN", rng.gen_range(0..10_000_000_000u64)))
    }

    /// Get the identifier string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Vin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Vin {
    type Err = VinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Vin {
    type Error = VinError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Vin> for String {
    fn from(vin: Vin) -> Self {
        vin.0
    }
}
