//! Stable per-video keys for persisted state.
//!
//! A [`VideoIdentity`] is derived from the video's storage location (a path
//! or URL). It has the shape `<slug>-<hash>`: the slug is a readable,
//! filesystem-safe rendering of the file stem, and the hash is the first 16
//! hex digits of SHA-256 over the full location. Uniqueness comes from the
//! hash; the slug only helps humans browsing the data directory.

use std::fmt;

use deunicode::deunicode;
use sha2::{Digest, Sha256};

/// Maximum length of the readable slug component.
const MAX_SLUG_LENGTH: usize = 40;

/// Hex digits of the location hash kept in the key.
const HASH_LENGTH: usize = 16;

/// Slug used when the location has no usable stem.
const FALLBACK_SLUG: &str = "video";

/// Errors parsing an already-derived identity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    #[error("Video identity is empty")]
    Empty,

    #[error("Video identity '{0}' contains characters outside [a-z0-9-]")]
    InvalidCharacters(String),
}

/// Opaque key namespacing everything persisted for one video.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VideoIdentity(String);

impl VideoIdentity {
    /// Derive the identity for a video stored at `location`.
    pub fn from_location(location: &str) -> Self {
        let location = location.trim();
        let slug = slugify(stem_of(location));

        let digest = Sha256::digest(location.as_bytes());
        let hash: String = digest
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<String>()
            .chars()
            .take(HASH_LENGTH)
            .collect();

        Self(format!("{}-{}", slug, hash))
    }

    /// Accept a key that was previously derived (e.g. typed on the CLI).
    pub fn parse(key: &str) -> Result<Self, IdentityError> {
        if key.is_empty() {
            return Err(IdentityError::Empty);
        }
        if !key
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(IdentityError::InvalidCharacters(key.to_string()));
        }
        Ok(Self(key.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Last path component of a path or URL, without query and extension.
fn stem_of(location: &str) -> &str {
    let without_query = location
        .split(['?', '#'])
        .next()
        .unwrap_or(location)
        .trim_end_matches(['/', '\\']);
    let file = without_query
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(without_query);
    match file.rfind('.') {
        Some(dot) if dot > 0 => &file[..dot],
        _ => file,
    }
}

/// Lower-case ASCII slug: transliterate, map runs of anything
/// non-alphanumeric to a single hyphen, trim hyphens, truncate.
fn slugify(input: &str) -> String {
    let ascii = deunicode(input);

    let mut result = String::with_capacity(ascii.len());
    let mut last_was_hyphen = true; // suppresses a leading hyphen
    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            result.push('-');
            last_was_hyphen = true;
        }
    }

    let mut slug: String = result.chars().take(MAX_SLUG_LENGTH).collect();
    while slug.ends_with('-') {
        slug.pop();
    }

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}
