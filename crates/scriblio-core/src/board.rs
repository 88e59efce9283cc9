//! Board identifiers and share links.
//!
//! Boards are identified by a short random base-36 string generated on the
//! client. The identifier carries no server-side meaning; it only names the
//! board in the URL so the link can be shared.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length of a generated board identifier.
const BOARD_ID_LEN: usize = 10;

const BASE36_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// A client-generated board identifier (lowercase base-36).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardId(String);

impl BoardId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        let mut value = Uuid::new_v4().as_u128();
        let mut chars = [0u8; BOARD_ID_LEN];
        for slot in chars.iter_mut() {
            *slot = BASE36_ALPHABET[(value % 36) as usize];
            value /= 36;
        }
        // The alphabet is ASCII, so the bytes are valid UTF-8
        Self(String::from_utf8_lossy(&chars).into_owned())
    }

    /// Parse an identifier from a URL path segment.
    ///
    /// Accepts lowercase base-36 of reasonable length; anything else is
    /// rejected so a mangled URL falls back to the landing view.
    pub fn parse(s: &str) -> Option<Self> {
        let valid = !s.is_empty()
            && s.len() <= 32
            && s.bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit());
        valid.then(|| Self(s.to_string()))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The URL path for this board.
    pub fn path(&self) -> String {
        format!("/board/{}", self.0)
    }
}

impl std::fmt::Display for BoardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
