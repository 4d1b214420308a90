//! Status codes reported by the identifier library.
//!
//! These classify a call's result; they are carried alongside the output and
//! are not converted into [`Error`]. Only a code outside the published
//! enumeration is an error.

use std::fmt;

use crate::codec::Error;

/// Result classification of a generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RetStatus {
    /// Not used by the library API.
    Skip,
    /// No structural data was provided.
    Eof,
    Okay,
    /// Success with a warning in the message.
    Warning,
    /// Error, no identifier produced.
    Error,
    /// Severe error, no identifier produced.
    Fatal,
    /// Unknown program error.
    Unknown,
    /// Previous call has not returned yet.
    Busy,
}

impl RetStatus {
    pub fn from_code(code: i32) -> Result<Self, Error> {
        match code {
            -2 => Ok(RetStatus::Skip),
            -1 => Ok(RetStatus::Eof),
            0 => Ok(RetStatus::Okay),
            1 => Ok(RetStatus::Warning),
            2 => Ok(RetStatus::Error),
            3 => Ok(RetStatus::Fatal),
            4 => Ok(RetStatus::Unknown),
            5 => Ok(RetStatus::Busy),
            other => Err(Error::unknown_status("return", other)),
        }
    }

    pub fn code(self) -> i32 {
        match self {
            RetStatus::Skip => -2,
            RetStatus::Eof => -1,
            RetStatus::Okay => 0,
            RetStatus::Warning => 1,
            RetStatus::Error => 2,
            RetStatus::Fatal => 3,
            RetStatus::Unknown => 4,
            RetStatus::Busy => 5,
        }
    }

    /// Whether the call produced a usable result (`Okay` or `Warning`).
    #[inline]
    pub fn has_result(self) -> bool {
        matches!(self, RetStatus::Okay | RetStatus::Warning)
    }
}

impl fmt::Display for RetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RetStatus::Skip => "SKIP",
            RetStatus::Eof => "EOF",
            RetStatus::Okay => "OKAY",
            RetStatus::Warning => "WARNING",
            RetStatus::Error => "ERROR",
            RetStatus::Fatal => "FATAL",
            RetStatus::Unknown => "UNKNOWN",
            RetStatus::Busy => "BUSY",
        };
        f.write_str(name)
    }
}

/// Outcome of key derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyStatus {
    Ok,
    UnknownError,
    EmptyInput,
    NotInchiInput,
    NotEnoughMemory,
    ErrorInFlagChar,
    /// The identifier is prefixed but malformed.
    InvalidInchi,
    /// A standard key was requested for a non-standard identifier.
    InvalidStdInchi,
}

impl KeyStatus {
    pub fn from_code(code: i32) -> Result<Self, Error> {
        match code {
            0 => Ok(KeyStatus::Ok),
            1 => Ok(KeyStatus::UnknownError),
            2 => Ok(KeyStatus::EmptyInput),
            3 => Ok(KeyStatus::NotInchiInput),
            4 => Ok(KeyStatus::NotEnoughMemory),
            5 => Ok(KeyStatus::ErrorInFlagChar),
            20 => Ok(KeyStatus::InvalidInchi),
            21 => Ok(KeyStatus::InvalidStdInchi),
            other => Err(Error::unknown_status("key", other)),
        }
    }
}

impl fmt::Display for KeyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KeyStatus::Ok => "OK",
            KeyStatus::UnknownError => "UNKNOWN_ERROR",
            KeyStatus::EmptyInput => "EMPTY_INPUT",
            KeyStatus::NotInchiInput => "NOT_INCHI_INPUT",
            KeyStatus::NotEnoughMemory => "NOT_ENOUGH_MEMORY",
            KeyStatus::ErrorInFlagChar => "ERROR_IN_FLAG_CHAR",
            KeyStatus::InvalidInchi => "INVALID_INCHI",
            KeyStatus::InvalidStdInchi => "INVALID_STD_INCHI",
        };
        f.write_str(name)
    }
}

/// Outcome of key validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCheckStatus {
    Valid,
    InvalidLength,
    InvalidLayout,
    InvalidChecksum,
}

impl KeyCheckStatus {
    pub fn from_code(code: i32) -> Result<Self, Error> {
        match code {
            0 => Ok(KeyCheckStatus::Valid),
            1 => Ok(KeyCheckStatus::InvalidLength),
            2 => Ok(KeyCheckStatus::InvalidLayout),
            3 => Ok(KeyCheckStatus::InvalidChecksum),
            other => Err(Error::unknown_status("key check", other)),
        }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self == KeyCheckStatus::Valid
    }
}

impl fmt::Display for KeyCheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KeyCheckStatus::Valid => "VALID",
            KeyCheckStatus::InvalidLength => "INVALID_LENGTH",
            KeyCheckStatus::InvalidLayout => "INVALID_LAYOUT",
            KeyCheckStatus::InvalidChecksum => "INVALID_CHECKSUM",
        };
        f.write_str(name)
    }
}

/// Outcome of checking an identifier string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierStatus {
    ValidStandard,
    ValidNonStandard,
    InvalidPrefix,
    InvalidVersion,
    InvalidLayout,
    /// The identifier does not survive a round trip through the library.
    FailRoundTrip,
}

impl IdentifierStatus {
    pub fn from_code(code: i32) -> Result<Self, Error> {
        match code {
            0 => Ok(IdentifierStatus::ValidStandard),
            -1 => Ok(IdentifierStatus::ValidNonStandard),
            1 => Ok(IdentifierStatus::InvalidPrefix),
            2 => Ok(IdentifierStatus::InvalidVersion),
            3 => Ok(IdentifierStatus::InvalidLayout),
            4 => Ok(IdentifierStatus::FailRoundTrip),
            other => Err(Error::unknown_status("identifier check", other)),
        }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        matches!(
            self,
            IdentifierStatus::ValidStandard | IdentifierStatus::ValidNonStandard
        )
    }
}

impl fmt::Display for IdentifierStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IdentifierStatus::ValidStandard => "VALID_STANDARD",
            IdentifierStatus::ValidNonStandard => "VALID_NON_STANDARD",
            IdentifierStatus::InvalidPrefix => "INVALID_PREFIX",
            IdentifierStatus::InvalidVersion => "INVALID_VERSION",
            IdentifierStatus::InvalidLayout => "INVALID_LAYOUT",
            IdentifierStatus::FailRoundTrip => "FAIL_I2I",
        };
        f.write_str(name)
    }
}
