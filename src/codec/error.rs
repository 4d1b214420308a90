//! Error types for the structure codec and the call boundary.
//!
//! Validation and reference errors are raised before any external call is
//! made. Statuses reported by the library itself are not errors: they travel
//! with the output (see [`RetStatus`](crate::RetStatus)).

use std::fmt;
use thiserror::Error;

/// Which fixed limit a structure ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capacity {
    /// Total atom count.
    Atoms,
    /// Bonds recorded on the atom with this index.
    Bonds { atom: usize },
    /// Total 0D stereo descriptor count.
    Stereo,
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capacity::Atoms => write!(f, "atom count"),
            Capacity::Bonds { atom } => write!(f, "bond count of atom {}", atom),
            Capacity::Stereo => write!(f, "stereo descriptor count"),
        }
    }
}

/// The element holding a reference that failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Referrer {
    Bond(usize),
    Stereo(usize),
}

impl fmt::Display for Referrer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Referrer::Bond(i) => write!(f, "bond {}", i),
            Referrer::Stereo(i) => write!(f, "stereo descriptor {}", i),
        }
    }
}

/// Errors raised while converting structures or talking to the library.
#[derive(Debug, Error)]
pub enum Error {
    /// A fixed limit of the flat record format was exceeded.
    ///
    /// Detected before any buffer is allocated.
    #[error("capacity exceeded: {what} is {count}, maximum is {limit}")]
    CapacityExceeded {
        /// The limit that was hit.
        what: Capacity,
        /// The offending count.
        count: usize,
        /// The limit.
        limit: usize,
    },

    /// An element symbol cannot be stored in the fixed-size symbol buffer.
    #[error("invalid element name '{name}' on atom {atom}: {detail}")]
    InvalidElementName {
        /// Atom index.
        atom: usize,
        /// The rejected symbol.
        name: String,
        /// Description of the problem.
        detail: String,
    },

    /// A bond or stereo descriptor refers to an atom that is not part of the molecule.
    #[error("{referrer} refers to atom {index}, but the molecule has {atom_count} atoms")]
    InvalidReference {
        /// The bond or descriptor holding the reference.
        referrer: Referrer,
        /// The unresolved atom index.
        index: usize,
        /// Number of atoms in the molecule.
        atom_count: usize,
    },

    /// A bond joins an atom to itself.
    #[error("bond {bond} joins atom {atom} to itself")]
    SelfBond {
        /// Bond index.
        bond: usize,
        /// Atom index.
        atom: usize,
    },

    /// A record returned by the library violates the flat format contract.
    #[error("corrupt output record: {0}")]
    DataCorruption(String),

    /// An option token is not a recognised library switch.
    #[error("unrecognised InChI option '{0}'")]
    UnrecognisedOption(String),

    /// A string handed to the library cannot be represented as a C string.
    #[error("invalid string for the identifier library: {0}")]
    InvalidString(String),

    /// The library returned a status code outside its published enumeration.
    #[error("unknown {kind} status code {code}")]
    UnknownStatus {
        /// The status family.
        kind: &'static str,
        /// The raw code.
        code: i32,
    },

    /// The library could not be reached or returned no usable buffer.
    #[error("identifier library failure: {0}")]
    Backend(String),

    /// Engine configuration could not be parsed.
    #[error("failed to parse engine configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl From<std::ffi::NulError> for Error {
    fn from(e: std::ffi::NulError) -> Self {
        Error::InvalidString(format!("interior nul byte at position {}", e.nul_position()))
    }
}

impl Error {
    /// Creates a [`CapacityExceeded`](Error::CapacityExceeded) error.
    pub fn capacity(what: Capacity, count: usize, limit: usize) -> Self {
        Self::CapacityExceeded { what, count, limit }
    }

    /// Creates an [`InvalidElementName`](Error::InvalidElementName) error.
    ///
    /// # Arguments
    ///
    /// * `atom` — Atom index
    /// * `name` — The rejected symbol
    /// * `details` — Description of the problem
    ///
    /// # Returns
    ///
    /// An [`InvalidElementName`](Error::InvalidElementName) error variant.
    pub fn invalid_element_name(atom: usize, name: &str, details: impl Into<String>) -> Self {
        Self::InvalidElementName {
            atom,
            name: name.to_string(),
            detail: details.into(),
        }
    }

    /// Creates an [`InvalidReference`](Error::InvalidReference) error.
    ///
    /// # Arguments
    ///
    /// * `referrer` — The bond or descriptor holding the reference
    /// * `index` — The unresolved atom index
    /// * `atom_count` — Number of atoms in the molecule
    ///
    /// # Returns
    ///
    /// An [`InvalidReference`](Error::InvalidReference) error variant.
    pub fn invalid_reference(referrer: Referrer, index: usize, atom_count: usize) -> Self {
        Self::InvalidReference {
            referrer,
            index,
            atom_count,
        }
    }

    /// Creates a [`DataCorruption`](Error::DataCorruption) error.
    pub fn corruption(details: impl Into<String>) -> Self {
        Self::DataCorruption(details.into())
    }

    /// Creates an [`UnknownStatus`](Error::UnknownStatus) error.
    pub fn unknown_status(kind: &'static str, code: i32) -> Self {
        Self::UnknownStatus { kind, code }
    }
}
