//! Strongly-typed identifiers used across the domain.
//!
//! Identifiers are string-backed rather than raw UUIDs: freshly minted ids are
//! UUIDv7 strings (time-ordered), but any stable string is a valid id, which
//! lets seed fixtures carry short literals like `"p1"`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

/// Identifier of a committed sale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SaleId(String);

macro_rules! impl_string_id {
    ($t:ty) => {
        impl $t {
            /// Mint a fresh identifier.
            ///
            /// Uses UUIDv7 (time-ordered). Prefer passing ids explicitly in
            /// tests for determinism.
            pub fn new() -> Self {
                Self(Uuid::now_v7().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $t {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<String> for $t {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $t {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

impl_string_id!(ProductId);
impl_string_id!(SaleId);
