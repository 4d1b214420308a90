//! The call contract between the engine and the identifier library.
//!
//! A backend performs exactly one library call per method and returns owned
//! copies of everything the library produced, with raw status codes. Code
//! interpretation and record decoding happen in the engine.

use crate::codec::{Error, FlatRecord, OptionsBuffer};

/// Input for the calls that start from an existing identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierInput {
    pub identifier: String,
    pub options: OptionsBuffer,
}

impl IdentifierInput {
    /// # Errors
    ///
    /// [`Error::InvalidString`] if either string contains a nul byte.
    pub fn new(identifier: &str, options: &str) -> Result<Self, Error> {
        if let Some(pos) = identifier.find('\0') {
            return Err(Error::InvalidString(format!(
                "interior nul byte at position {} of identifier",
                pos
            )));
        }
        Ok(Self {
            identifier: identifier.to_string(),
            options: OptionsBuffer::new(options)?,
        })
    }
}

/// Strings returned by an identifier-producing call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOutput {
    pub code: i32,
    pub inchi: String,
    pub aux_info: String,
    pub message: String,
    pub log: String,
}

/// Flat structure returned by the identifier-to-structure call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawStructure {
    pub code: i32,
    pub record: FlatRecord,
    pub message: String,
    pub log: String,
    pub warning_flags: [[u64; 2]; 2],
}

/// Key and optional hash extensions returned by a key call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawKey {
    pub code: i32,
    pub key: String,
    pub extensions: Option<(String, String)>,
}

/// One implementation of the identifier library's entry points.
///
/// Implementations must be callable from several threads at once when they
/// are `Sync`; each method gets its own input and returns its own output.
pub trait InchiBackend {
    /// Generates an identifier from a flat structure.
    fn generate(&self, record: &FlatRecord, standard: bool) -> Result<RawOutput, Error>;

    /// Re-generates an identifier from an identifier, applying new options.
    fn generate_from_identifier(&self, input: &IdentifierInput) -> Result<RawOutput, Error>;

    /// Rebuilds a flat structure from an identifier.
    fn generate_structure(&self, input: &IdentifierInput) -> Result<RawStructure, Error>;

    /// Derives a key, with hash extensions when `extensions` is set.
    fn derive_key(&self, identifier: &str, extensions: bool) -> Result<RawKey, Error>;

    /// Derives a key through the standard-only entry point.
    fn derive_standard_key(&self, identifier: &str) -> Result<RawKey, Error>;

    /// Validates a key; returns the raw check code.
    fn check_key(&self, key: &str) -> Result<i32, Error>;

    /// Validates an identifier; returns the raw check code.
    fn check_identifier(&self, identifier: &str, strict: bool) -> Result<i32, Error>;
}

impl<B: InchiBackend + ?Sized> InchiBackend for &B {
    fn generate(&self, record: &FlatRecord, standard: bool) -> Result<RawOutput, Error> {
        (**self).generate(record, standard)
    }

    fn generate_from_identifier(&self, input: &IdentifierInput) -> Result<RawOutput, Error> {
        (**self).generate_from_identifier(input)
    }

    fn generate_structure(&self, input: &IdentifierInput) -> Result<RawStructure, Error> {
        (**self).generate_structure(input)
    }

    fn derive_key(&self, identifier: &str, extensions: bool) -> Result<RawKey, Error> {
        (**self).derive_key(identifier, extensions)
    }

    fn derive_standard_key(&self, identifier: &str) -> Result<RawKey, Error> {
        (**self).derive_standard_key(identifier)
    }

    fn check_key(&self, key: &str) -> Result<i32, Error> {
        (**self).check_key(key)
    }

    fn check_identifier(&self, identifier: &str, strict: bool) -> Result<i32, Error> {
        (**self).check_identifier(identifier, strict)
    }
}
