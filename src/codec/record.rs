//! Flat, fixed-capacity records exchanged with the identifier library.
//!
//! [`FlatAtom`] and [`FlatStereo`] are laid out exactly like the library's
//! `inchi_Atom` and `inchi_Stereo0D`, so a slice of them can be handed across
//! the call boundary without another copy.

use super::limits::{ATOM_EL_LEN, MAXVAL, NO_ATOM};
use super::options::OptionsBuffer;

/// One atom in flat form, with its own adjacency arrays.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatAtom {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub neighbor: [i16; MAXVAL],
    pub bond_type: [i8; MAXVAL],
    pub bond_stereo: [i8; MAXVAL],
    pub elname: [u8; ATOM_EL_LEN],
    pub num_bonds: i16,
    pub num_iso_h: [i8; 4],
    pub isotopic_mass: i16,
    pub radical: i8,
    pub charge: i8,
}

impl Default for FlatAtom {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            neighbor: [0; MAXVAL],
            bond_type: [0; MAXVAL],
            bond_stereo: [0; MAXVAL],
            elname: [0; ATOM_EL_LEN],
            num_bonds: 0,
            num_iso_h: [0; 4],
            isotopic_mass: 0,
            radical: 0,
            charge: 0,
        }
    }
}

impl FlatAtom {
    /// Element symbol bytes up to the first terminator.
    pub fn element_bytes(&self) -> &[u8] {
        let end = self
            .elname
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(ATOM_EL_LEN);
        &self.elname[..end]
    }

    /// Adjacency entries as `(neighbor, bond_type, bond_stereo)` triples.
    ///
    /// Yields nothing when `num_bonds` is outside `0..=MAXVAL`; callers that
    /// must detect that case check [`num_bonds`](Self::num_bonds) first.
    pub fn adjacency(&self) -> impl Iterator<Item = (i16, i8, i8)> + '_ {
        let n = usize::try_from(self.num_bonds)
            .ok()
            .filter(|&n| n <= MAXVAL)
            .unwrap_or(0);
        (0..n).map(|k| (self.neighbor[k], self.bond_type[k], self.bond_stereo[k]))
    }

    /// Whether an adjacency entry points at `atom`.
    pub fn has_neighbor(&self, atom: i16) -> bool {
        self.adjacency().any(|(n, _, _)| n == atom)
    }
}

/// One 0D stereo descriptor in flat form.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatStereo {
    pub neighbor: [i16; 4],
    pub central_atom: i16,
    pub stereo_type: i8,
    pub parity: i8,
}

impl Default for FlatStereo {
    fn default() -> Self {
        Self {
            neighbor: [0; 4],
            central_atom: NO_ATOM,
            stereo_type: 0,
            parity: 0,
        }
    }
}

// Byte layout of `inchi_Atom` and `inchi_Stereo0D`.
const _: () = {
    use std::mem::{offset_of, size_of};

    assert!(size_of::<FlatAtom>() == 120);
    assert!(offset_of!(FlatAtom, neighbor) == 24);
    assert!(offset_of!(FlatAtom, bond_type) == 64);
    assert!(offset_of!(FlatAtom, bond_stereo) == 84);
    assert!(offset_of!(FlatAtom, elname) == 104);
    assert!(offset_of!(FlatAtom, num_bonds) == 110);
    assert!(offset_of!(FlatAtom, num_iso_h) == 112);
    assert!(offset_of!(FlatAtom, isotopic_mass) == 116);
    assert!(offset_of!(FlatAtom, radical) == 118);
    assert!(offset_of!(FlatAtom, charge) == 119);

    assert!(size_of::<FlatStereo>() == 12);
    assert!(offset_of!(FlatStereo, central_atom) == 8);
    assert!(offset_of!(FlatStereo, stereo_type) == 10);
    assert!(offset_of!(FlatStereo, parity) == 11);
};

/// Flat form of a whole structure, owned by exactly one library call.
///
/// Every buffer lives in a Rust-owned container and is released when the
/// record is dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatRecord {
    pub atoms: Vec<FlatAtom>,
    pub stereo: Vec<FlatStereo>,
    pub options: OptionsBuffer,
}

impl FlatRecord {
    #[inline]
    pub fn num_atoms(&self) -> usize {
        self.atoms.len()
    }

    #[inline]
    pub fn num_stereo(&self) -> usize {
        self.stereo.len()
    }
}
