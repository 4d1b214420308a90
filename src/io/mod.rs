//! Reading and writing structure files.
//!
//! - [`sdf`] reads and writes V2000 MDL molfile blocks as [`Molecule`](crate::Molecule)s.
//! - [`identifiers`] reads line-oriented identifier and key lists.

use std::fmt;

pub mod error;
pub mod identifiers;
pub mod sdf;

pub use error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Sdf,
    Inchi,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Sdf => write!(f, "SDF"),
            Format::Inchi => write!(f, "InChI"),
        }
    }
}
