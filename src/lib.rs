//! Typed bindings to the IUPAC InChI library: convert molecule graphs to and
//! from the library's flat, fixed-capacity records, generate identifiers and
//! keys, and rebuild structures from identifiers.
//!
//! # Features
//!
//! - **Structure codec** — [`flatten`] and [`unflatten`] translate between a
//!   [`Molecule`] graph and a [`FlatRecord`] with symmetric adjacency arrays,
//!   enforcing the library's capacity limits before anything is allocated
//! - **Call boundary** — [`InchiEngine`] drives any [`InchiBackend`]; with the
//!   `native` feature, [`LibInchi`] links against the system `libinchi`
//! - **Options and keys** — [`normalize_options`] canonicalises library
//!   switches and [`InchiKey`] decodes the key layout
//! - **File I/O** — V2000 SD files and identifier lists in [`io`]
//!
//! # Quick Start
//!
//! Flattening a molecule writes every bond onto both endpoints; unflattening
//! emits each bond once again:
//!
//! ```
//! use inchi_forge::{Atom, Bond, BondType, Molecule};
//! use inchi_forge::{flatten, unflatten, Error};
//!
//! // Formaldehyde carbonyl, hydrogens left to the library.
//! let mut molecule = Molecule::with_options("-FixedH")?;
//! let c = molecule.add_atom(Atom::new("C", [0.000, 0.000, 0.000]));
//! let o = molecule.add_atom(Atom::new("O", [1.210, 0.000, 0.000]));
//! molecule.add_bond(Bond::plain(c, o, BondType::Double));
//!
//! let record = flatten(&molecule)?;
//! assert_eq!(record.atoms[c].neighbor[0], o as i16);
//! assert_eq!(record.atoms[o].neighbor[0], c as i16);
//! assert_eq!(record.options.as_str(), format!("{}FixedH ", inchi_forge::FLAG_CHAR));
//!
//! let restored = unflatten(&record)?;
//! assert_eq!(restored.atoms, molecule.atoms);
//! assert_eq!(restored.bond_count(), 1);
//! # Ok::<(), Error>(())
//! ```
//!
//! With the `native` feature the same molecule goes through the library:
//!
//! ```ignore
//! use inchi_forge::{InchiEngine, LibInchi};
//!
//! let engine = InchiEngine::new(LibInchi::new());
//! let output = engine.generate(&molecule)?;
//! let key = engine.generate_key(&output.inchi)?;
//! ```
//!
//! # Module Organization
//!
//! - [`io`] — SD file and identifier list reading and writing
//! - [`InchiEngine`] — Identifier, structure and key operations
//! - [`EngineConfig`] — Default options and entry-point selection
//!
//! # Data Types
//!
//! ## Graph
//!
//! - [`Molecule`] — Atoms, bonds, 0D stereo descriptors and an options string
//! - [`Atom`] — Element symbol, coordinates, isotope, radical, charge and implicit hydrogens
//! - [`Bond`] — Bond between two atoms with type and wedge stereo
//! - [`Stereo0D`] — Tetrahedral, double-bond or allene stereo descriptor
//!
//! ## Flat Records
//!
//! - [`FlatRecord`] — Owned flat form of a whole structure
//! - [`FlatAtom`] / [`FlatStereo`] — Layout-compatible with the library's structs
//!
//! ## Results
//!
//! - [`InchiOutput`], [`StructureOutput`], [`KeyOutput`] — Owned call results
//! - [`RetStatus`], [`KeyStatus`], [`KeyCheckStatus`], [`IdentifierStatus`] — Library statuses

mod codec;
mod engine;
mod model;
mod utils;

pub mod io;

pub use model::atom::{Atom, ISOTOPIC_SHIFT_FLAG, ISOTOPIC_SHIFT_MAX, ImplicitHydrogens};
pub use model::molecule::{Bond, Molecule, Stereo0D};
pub use model::types::{BondStereo, BondType, Parity, Radical, StereoType};

pub use codec::{
    ATOM_EL_LEN, Capacity, Error, FLAG_CHAR, FlatAtom, FlatRecord, FlatStereo, InchiKey,
    InchiOption, KEY_BUFFER_LEN, KEY_EXTENSION_BUFFER_LEN, KEY_LEN, MAX_ATOMS,
    MAX_ELEMENT_NAME_LEN, MAX_STEREO0D, MAXVAL, NO_ATOM, OptionsBuffer, ParseKeyError, Referrer,
    flatten, format_options, normalize_options, parse_options, unflatten, validate,
};

pub use engine::{
    EngineConfig, IdentifierInput, IdentifierStatus, InchiBackend, InchiEngine, InchiOutput,
    KeyCheckStatus, KeyOutput, KeyStatus, RawKey, RawOutput, RawStructure, RetStatus,
    StructureOutput, WarningFlags,
};

#[cfg(feature = "native")]
pub use engine::LibInchi;
