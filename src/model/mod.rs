//! Graph data structures describing a molecule as callers see it.
//!
//! - [`atom`] – Atoms with element, coordinates, charge, radical, isotope and implicit hydrogens.
//! - [`types`] – Library-level enumerations (bond type and stereo, radical, stereo type, parity).
//! - [`molecule`] – Bonds, 0D stereo descriptors and the [`Molecule`] container.
//!
//! Atoms are addressed by their position in [`Molecule::atoms`]; bonds and stereo
//! descriptors refer to that index. The flat, fixed-capacity form consumed by the
//! identifier library is [`FlatRecord`](crate::FlatRecord), built by [`flatten`](crate::flatten).
//!
//! [`Molecule`]: molecule::Molecule
//! [`Molecule::atoms`]: molecule::Molecule::atoms

pub mod atom;
pub mod molecule;
pub mod types;
