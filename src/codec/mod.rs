//! Conversion between [`Molecule`](crate::Molecule) graphs and the flat records
//! the identifier library reads and writes.
//!
//! - [`validate`] checks the fixed capacity limits before anything is allocated.
//! - [`flatten`] resolves atom references and duplicates every bond onto both endpoints.
//! - [`unflatten`] inverts that, emitting each bond once and mapping the
//!   "no atom" sentinel back to `None`.
//! - [`normalize_options`] and [`OptionsBuffer`] cover the option string, [`InchiKey`]
//!   the key layout.

mod error;
mod flatten;
mod key;
mod limits;
mod options;
mod record;
mod unflatten;
mod validate;

pub use error::{Capacity, Error, Referrer};
pub use flatten::flatten;
pub use key::{InchiKey, KEY_LEN, ParseKeyError};
pub use limits::{
    ATOM_EL_LEN, KEY_BUFFER_LEN, KEY_EXTENSION_BUFFER_LEN, MAX_ATOMS, MAX_ELEMENT_NAME_LEN,
    MAX_STEREO0D, MAXVAL, NO_ATOM,
};
pub use options::{
    FLAG_CHAR, InchiOption, OptionsBuffer, format_options, normalize_options, parse_options,
};
pub use record::{FlatAtom, FlatRecord, FlatStereo};
pub use unflatten::unflatten;
pub use validate::validate;
