//! String field operators.
//!
//! - `hash(field, algorithm)`: hex digest of a string field
//! - `contains(field, needle)`: substring test
//! - `length(field)`: character count

use crate::config::HashSettings;
use crate::operator::catalog::OperatorGroup;
use crate::operator::field::{FieldOperation, FieldProcessor, StringField};
use crate::operator::Param;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha384, Sha512};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Digest algorithms understood by [`hash`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha256,
    Sha384,
    Sha512,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported hash algorithm: {0}")]
pub struct UnsupportedAlgorithm(pub String);

impl HashAlgorithm {
    /// Lowercase hex digest of `input`.
    pub fn hex_digest(self, input: &[u8]) -> String {
        match self {
            HashAlgorithm::Md5 => format!("{:x}", md5::compute(input)),
            HashAlgorithm::Sha1 => format!("{:x}", Sha1::digest(input)),
            HashAlgorithm::Sha256 => format!("{:x}", Sha256::digest(input)),
            HashAlgorithm::Sha384 => format!("{:x}", Sha384::digest(input)),
            HashAlgorithm::Sha512 => format!("{:x}", Sha512::digest(input)),
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = UnsupportedAlgorithm;

    /// Accepts `MD5`, `SHA-1`, `SHA-256`, `SHA-384`, `SHA-512`, in any case
    /// and with or without the dash.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_uppercase();
        match normalized.as_str() {
            "MD5" => Ok(HashAlgorithm::Md5),
            "SHA1" => Ok(HashAlgorithm::Sha1),
            "SHA256" => Ok(HashAlgorithm::Sha256),
            "SHA384" => Ok(HashAlgorithm::Sha384),
            "SHA512" => Ok(HashAlgorithm::Sha512),
            _ => Err(UnsupportedAlgorithm(s.to_string())),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HashAlgorithm::Md5 => "MD5",
            HashAlgorithm::Sha1 => "SHA-1",
            HashAlgorithm::Sha256 => "SHA-256",
            HashAlgorithm::Sha384 => "SHA-384",
            HashAlgorithm::Sha512 => "SHA-512",
        };
        write!(f, "{}", name)
    }
}

/// Hash a string field. The algorithm is resolved on each call, so an
/// unknown name fails per item (warning + `None`) rather than at build time.
pub struct Hash {
    algorithm: String,
}

impl FieldOperation for Hash {
    type Kind = StringField;
    type Output = String;

    fn name(&self) -> &str {
        "hash"
    }

    fn parameters(&self) -> Vec<Param> {
        vec![Param::value(self.algorithm.as_str())]
    }

    fn process(&self, value: &str) -> Option<String> {
        match self.algorithm.parse::<HashAlgorithm>() {
            Ok(algorithm) => Some(algorithm.hex_digest(value.as_bytes())),
            Err(e) => {
                tracing::warn!("Hash function failed: {}", e);
                None
            }
        }
    }
}

/// Substring test on a string field.
pub struct Contains {
    needle: String,
}

impl FieldOperation for Contains {
    type Kind = StringField;
    type Output = bool;

    fn name(&self) -> &str {
        "contains"
    }

    fn parameters(&self) -> Vec<Param> {
        vec![Param::value(self.needle.as_str())]
    }

    fn process(&self, value: &str) -> Option<bool> {
        Some(value.contains(self.needle.as_str()))
    }
}

/// Character count of a string field.
pub struct Length;

impl FieldOperation for Length {
    type Kind = StringField;
    type Output = i64;

    fn name(&self) -> &str {
        "length"
    }

    fn process(&self, value: &str) -> Option<i64> {
        Some(value.chars().count() as i64)
    }
}

pub fn hash(field: impl Into<String>, algorithm: impl Into<String>) -> FieldProcessor<Hash> {
    FieldProcessor::new(
        field,
        Hash {
            algorithm: algorithm.into(),
        },
    )
}

/// Hash with the configured default algorithm.
pub fn hash_default(settings: &HashSettings, field: impl Into<String>) -> FieldProcessor<Hash> {
    hash(field, settings.default_algorithm.clone())
}

pub fn contains(field: impl Into<String>, needle: impl Into<String>) -> FieldProcessor<Contains> {
    FieldProcessor::new(
        field,
        Contains {
            needle: needle.into(),
        },
    )
}

pub fn length(field: impl Into<String>) -> FieldProcessor<Length> {
    FieldProcessor::new(field, Length)
}

pub(crate) fn catalog_group() -> OperatorGroup {
    OperatorGroup::new(
        "StringOperators",
        module_path!(),
        "Operators over a string field of an item.",
    )
    .entry(
        "hash(field, algorithm)",
        "Item",
        "String",
        "Hex digest of the field. Unsupported algorithms yield no value.",
    )
    .entry(
        "hash_default(settings, field)",
        "Item",
        "String",
        "Hex digest using the configured default algorithm.",
    )
    .entry(
        "contains(field, needle)",
        "Item",
        "bool",
        "Whether the field contains the given substring.",
    )
    .entry("length(field)", "Item", "i64", "Number of characters in the field.")
}
