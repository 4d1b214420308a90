use tracing::{debug, trace};

use super::error::{Capacity, Error, Referrer};
use super::limits::{MAXVAL, NO_ATOM};
use super::options::OptionsBuffer;
use super::record::{FlatAtom, FlatRecord, FlatStereo};
use super::validate::validate;
use crate::model::atom::Atom;
use crate::model::molecule::{Bond, Molecule};

/// Converts a molecule into the flat record consumed by the identifier library.
///
/// The molecule is validated and every atom reference resolved before any
/// flat buffer is allocated, so a failure leaves nothing behind. Each bond is
/// written into the adjacency arrays of *both* endpoints with the same type and
/// stereo value.
///
/// # Errors
///
/// * [`Error::CapacityExceeded`] / [`Error::InvalidElementName`] from [`validate`]
/// * [`Error::InvalidReference`] when a bond or stereo descriptor points outside the atom list
/// * [`Error::SelfBond`] when a bond joins an atom to itself
/// * [`Error::InvalidString`] when the options contain a nul byte
pub fn flatten(molecule: &Molecule) -> Result<FlatRecord, Error> {
    validate(molecule)?;
    resolve_references(molecule)?;

    let options = OptionsBuffer::new(&molecule.options)?;

    let mut atoms: Vec<FlatAtom> = molecule.atoms.iter().map(flat_atom).collect();

    for bond in &molecule.bonds {
        push_neighbor(&mut atoms, bond.origin, bond.target, bond)?;
        push_neighbor(&mut atoms, bond.target, bond.origin, bond)?;
        trace!(
            origin = bond.origin,
            target = bond.target,
            bond_type = %bond.bond_type,
            stereo = %bond.stereo,
            "flattened bond"
        );
    }

    let stereo = molecule
        .stereo
        .iter()
        .map(|s| FlatStereo {
            neighbor: s.neighbors.map(flat_index),
            central_atom: s.central_atom.map_or(NO_ATOM, flat_index),
            stereo_type: s.stereo_type.value(),
            parity: s.parity.value(),
        })
        .collect();

    debug!(
        atoms = atoms.len(),
        bonds = molecule.bond_count(),
        stereo = molecule.stereo_count(),
        "flattened molecule"
    );

    Ok(FlatRecord {
        atoms,
        stereo,
        options,
    })
}

fn resolve_references(molecule: &Molecule) -> Result<(), Error> {
    let n_atoms = molecule.atom_count();

    for (i, bond) in molecule.bonds.iter().enumerate() {
        for idx in [bond.origin, bond.target] {
            if idx >= n_atoms {
                return Err(Error::invalid_reference(Referrer::Bond(i), idx, n_atoms));
            }
        }
        if bond.origin == bond.target {
            return Err(Error::SelfBond {
                bond: i,
                atom: bond.origin,
            });
        }
    }

    for (i, stereo) in molecule.stereo.iter().enumerate() {
        if let Some(idx) = stereo.references().find(|&idx| idx >= n_atoms) {
            return Err(Error::invalid_reference(Referrer::Stereo(i), idx, n_atoms));
        }
    }

    Ok(())
}

fn flat_atom(atom: &Atom) -> FlatAtom {
    let mut flat = FlatAtom {
        x: atom.position[0],
        y: atom.position[1],
        z: atom.position[2],
        num_iso_h: atom.implicit_h.to_array(),
        isotopic_mass: atom.isotopic_mass,
        radical: atom.radical.value(),
        charge: atom.charge,
        ..FlatAtom::default()
    };
    let name = atom.element.as_bytes();
    flat.elname[..name.len()].copy_from_slice(name);
    flat
}

fn push_neighbor(
    atoms: &mut [FlatAtom],
    owner: usize,
    neighbor: usize,
    bond: &Bond,
) -> Result<(), Error> {
    let atom = &mut atoms[owner];
    let k = atom.num_bonds as usize;
    if k >= MAXVAL {
        return Err(Error::capacity(Capacity::Bonds { atom: owner }, k + 1, MAXVAL));
    }
    atom.neighbor[k] = flat_index(neighbor);
    atom.bond_type[k] = bond.bond_type.value();
    atom.bond_stereo[k] = bond.stereo.value();
    atom.num_bonds += 1;
    Ok(())
}

// Indices are bounded by MAX_ATOMS once validated.
#[inline]
fn flat_index(idx: usize) -> i16 {
    idx as i16
}
