//! Fixed limits of the library's flat record format.
//!
//! These mirror the values the library is compiled with and cannot be
//! changed per call.

/// Maximum number of atoms in one structure.
pub const MAX_ATOMS: usize = 1024;

/// Maximum number of bonds recorded on a single atom.
pub const MAXVAL: usize = 20;

/// Size of the element-symbol buffer, terminator included.
pub const ATOM_EL_LEN: usize = 6;

/// Longest element symbol that fits [`ATOM_EL_LEN`] with its terminator.
pub const MAX_ELEMENT_NAME_LEN: usize = ATOM_EL_LEN - 1;

/// Maximum number of 0D stereo descriptors; bounded by the width of the count field.
pub const MAX_STEREO0D: usize = i16::MAX as usize;

/// Flat-record sentinel for an absent atom reference.
pub const NO_ATOM: i16 = -1;

/// Size of the buffer the library writes a key into, terminator included.
pub const KEY_BUFFER_LEN: usize = 28;

/// Size of each hash-extension buffer, terminator included.
pub const KEY_EXTENSION_BUFFER_LEN: usize = 65;
