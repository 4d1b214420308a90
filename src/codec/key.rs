//! Layout of the fixed-length key derived from an identifier.
//!
//! A key has 27 characters: `AAAAAAAAAAAAAA-BBBBBBBBFV-P`.
//!
//! | Part | Length | Meaning |
//! |------|--------|---------|
//! | `A`  | 14     | hash of the connectivity layers |
//! | `B`  | 8      | hash of the remaining layers |
//! | `F`  | 1      | `S` for a standard key, `N` otherwise |
//! | `V`  | 1      | key version, `A` = 1 |
//! | `P`  | 1      | protonation indicator, `N` = neutral |
//!
//! Parsing only checks the layout; the checksum is verified by the library
//! (see [`InchiEngine::validate_key`](crate::InchiEngine::validate_key)).

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Length of a key in characters.
pub const KEY_LEN: usize = 27;

const FIRST_BLOCK_LEN: usize = 14;
const SECOND_BLOCK_LEN: usize = 8;

/// Error returned when a string does not have the key layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseKeyError {
    #[error("key must be 27 characters, got {0}")]
    Length(usize),
    #[error("invalid character '{ch}' at position {pos}")]
    Character { pos: usize, ch: char },
    #[error("expected '-' at position {0}")]
    Separator(usize),
}

/// A key split into its blocks and flag characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InchiKey {
    key: String,
}

impl InchiKey {
    /// Checks the layout of `key`.
    ///
    /// # Errors
    ///
    /// [`ParseKeyError`] describing the first layout violation.
    pub fn parse(key: &str) -> Result<Self, ParseKeyError> {
        let len = key.chars().count();
        if len != KEY_LEN || key.len() != KEY_LEN {
            return Err(ParseKeyError::Length(len));
        }

        for (pos, ch) in key.char_indices() {
            let is_separator_pos = pos == FIRST_BLOCK_LEN || pos == KEY_LEN - 2;
            if is_separator_pos {
                if ch != '-' {
                    return Err(ParseKeyError::Separator(pos));
                }
            } else if !ch.is_ascii_uppercase() {
                return Err(ParseKeyError::Character { pos, ch });
            }
        }

        Ok(Self {
            key: key.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }

    /// Hash of the connectivity layers (14 characters).
    pub fn first_block(&self) -> &str {
        &self.key[..FIRST_BLOCK_LEN]
    }

    /// Hash of the remaining layers (8 characters).
    pub fn second_block(&self) -> &str {
        let start = FIRST_BLOCK_LEN + 1;
        &self.key[start..start + SECOND_BLOCK_LEN]
    }

    fn char_at(&self, pos: usize) -> char {
        self.key.as_bytes()[pos] as char
    }

    pub fn flag_char(&self) -> char {
        self.char_at(FIRST_BLOCK_LEN + 1 + SECOND_BLOCK_LEN)
    }

    pub fn version_char(&self) -> char {
        self.char_at(FIRST_BLOCK_LEN + 2 + SECOND_BLOCK_LEN)
    }

    pub fn protonation_char(&self) -> char {
        self.char_at(KEY_LEN - 1)
    }

    /// Whether the key was derived from a standard identifier.
    pub fn is_standard(&self) -> bool {
        self.flag_char() == 'S'
    }

    /// Key version number (`A` = 1, `B` = 2, ...).
    pub fn version(&self) -> u8 {
        self.version_char() as u8 - b'A' + 1
    }

    /// Net protons added (positive) or removed (negative) during normalisation.
    ///
    /// `N` is neutral, `O`..`Z` encode +1..+12 and `M`..`A` encode -1..-13.
    pub fn protonation(&self) -> i32 {
        i32::from(self.protonation_char() as u8) - i32::from(b'N')
    }
}

impl fmt::Display for InchiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

impl FromStr for InchiKey {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
