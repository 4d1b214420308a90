use tracing::{debug, trace};

use super::error::Error;
use super::limits::{MAXVAL, NO_ATOM};
use super::record::{FlatAtom, FlatRecord, FlatStereo};
use crate::model::atom::{Atom, ImplicitHydrogens};
use crate::model::molecule::{Bond, Molecule, Stereo0D};
use crate::model::types::{BondStereo, BondType, Parity, Radical, StereoType};

/// Rebuilds a molecule from a flat record returned by the identifier library.
///
/// The library records every bond on both endpoints. Each bond is emitted once,
/// from the atom with the higher index (the entry whose neighbor index is lower
/// than the owning atom's). An entry with no counterpart on the other endpoint
/// is reported rather than dropped. The options string is not carried over.
///
/// # Errors
///
/// [`Error::DataCorruption`] when the record breaks the flat format contract:
/// an index out of range, a bond count outside `0..=MAXVAL`, an unknown
/// enumeration code, a non-UTF-8 element symbol, or one-sided adjacency.
pub fn unflatten(record: &FlatRecord) -> Result<Molecule, Error> {
    let n_atoms = record.num_atoms();

    let atoms = record
        .atoms
        .iter()
        .enumerate()
        .map(|(i, flat)| graph_atom(i, flat))
        .collect::<Result<Vec<_>, _>>()?;

    let mut bonds = Vec::new();
    for (i, flat) in record.atoms.iter().enumerate() {
        let n_bonds = usize::try_from(flat.num_bonds)
            .ok()
            .filter(|&n| n <= MAXVAL)
            .ok_or_else(|| {
                Error::corruption(format!(
                    "atom {} reports {} bonds (maximum {})",
                    i, flat.num_bonds, MAXVAL
                ))
            })?;

        for k in 0..n_bonds {
            let j = resolve(flat.neighbor[k], n_atoms)
                .ok_or_else(|| corrupt_index("bond neighbor of atom", i, flat.neighbor[k]))?;
            if j == i {
                return Err(Error::corruption(format!("atom {} is bonded to itself", i)));
            }
            if !record.atoms[j].has_neighbor(i as i16) {
                return Err(Error::corruption(format!(
                    "bond {}-{} is recorded on atom {} only",
                    i, j, i
                )));
            }
            if j < i {
                let bond_type = BondType::from_value(flat.bond_type[k]).ok_or_else(|| {
                    Error::corruption(format!(
                        "unknown bond type {} on atom {}",
                        flat.bond_type[k], i
                    ))
                })?;
                let stereo = BondStereo::from_value(flat.bond_stereo[k]).ok_or_else(|| {
                    Error::corruption(format!(
                        "unknown bond stereo {} on atom {}",
                        flat.bond_stereo[k], i
                    ))
                })?;
                trace!(origin = i, target = j, %bond_type, "restored bond");
                bonds.push(Bond::new(i, j, bond_type, stereo));
            }
        }
    }

    let stereo = record
        .stereo
        .iter()
        .enumerate()
        .map(|(s, flat)| graph_stereo(s, flat, n_atoms))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        atoms = atoms.len(),
        bonds = bonds.len(),
        stereo = stereo.len(),
        "rebuilt molecule"
    );

    Ok(Molecule {
        atoms,
        bonds,
        stereo,
        options: String::new(),
    })
}

fn graph_atom(i: usize, flat: &FlatAtom) -> Result<Atom, Error> {
    let element = std::str::from_utf8(flat.element_bytes())
        .map_err(|_| Error::corruption(format!("element symbol of atom {} is not UTF-8", i)))?;
    let radical = Radical::from_value(flat.radical).ok_or_else(|| {
        Error::corruption(format!("unknown radical code {} on atom {}", flat.radical, i))
    })?;

    Ok(Atom {
        element: element.to_string(),
        position: [flat.x, flat.y, flat.z],
        isotopic_mass: flat.isotopic_mass,
        radical,
        charge: flat.charge,
        implicit_h: ImplicitHydrogens::from_array(flat.num_iso_h),
    })
}

fn graph_stereo(s: usize, flat: &FlatStereo, n_atoms: usize) -> Result<Stereo0D, Error> {
    let central_atom = match flat.central_atom {
        NO_ATOM => None,
        raw => Some(
            resolve(raw, n_atoms)
                .ok_or_else(|| corrupt_index("central atom of stereo", s, raw))?,
        ),
    };

    let mut neighbors = [0usize; 4];
    for (slot, &raw) in neighbors.iter_mut().zip(flat.neighbor.iter()) {
        *slot = resolve(raw, n_atoms).ok_or_else(|| corrupt_index("neighbor of stereo", s, raw))?;
    }

    let stereo_type = StereoType::from_value(flat.stereo_type).ok_or_else(|| {
        Error::corruption(format!(
            "unknown stereo type {} on stereo {}",
            flat.stereo_type, s
        ))
    })?;
    // Only the low bits carry the parity; the library may mark others.
    let parity = Parity::from_value(flat.parity & 0x07).ok_or_else(|| {
        Error::corruption(format!("unknown parity {} on stereo {}", flat.parity, s))
    })?;

    Ok(Stereo0D {
        central_atom,
        neighbors,
        stereo_type,
        parity,
    })
}

#[inline]
fn resolve(raw: i16, n_atoms: usize) -> Option<usize> {
    usize::try_from(raw).ok().filter(|&idx| idx < n_atoms)
}

fn corrupt_index(what: &str, owner: usize, raw: i16) -> Error {
    Error::corruption(format!("{} {} is out of range: {}", what, owner, raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::flatten::flatten;
    use crate::model::types::BondStereo;
    use std::collections::HashSet;

    fn make_carbonyl() -> Molecule {
        let mut mol = Molecule::new();
        let c = mol.add_atom(Atom::new("C", [0.0, 0.0, 0.0]));
        let o = mol.add_atom(Atom::new("O", [1.2, 0.0, 0.0]));
        mol.add_bond(Bond::plain(c, o, BondType::Double));
        mol
    }

    fn make_chain(n: usize) -> Molecule {
        let mut mol = Molecule::new();
        for k in 0..n {
            mol.add_atom(Atom::new("C", [k as f64 * 1.5, 0.0, 0.0]));
        }
        for k in 1..n {
            let bond_type = if k % 2 == 0 {
                BondType::Double
            } else {
                BondType::Single
            };
            mol.add_bond(Bond::plain(k - 1, k, bond_type));
        }
        mol
    }

    fn bond_set(mol: &Molecule) -> HashSet<((usize, usize), BondType, BondStereo)> {
        mol.bonds
            .iter()
            .map(|b| (b.endpoints(), b.bond_type, b.stereo))
            .collect()
    }

    #[test]
    fn carbonyl_restores_exactly_one_bond() {
        let record = flatten(&make_carbonyl()).unwrap();
        let mol = unflatten(&record).unwrap();
        assert_eq!(mol.bond_count(), 1);
        assert_eq!(mol.bonds[0].endpoints(), (0, 1));
        assert_eq!(mol.bonds[0].bond_type, BondType::Double);
    }

    #[test]
    fn round_trip_preserves_atoms_and_bond_set() {
        let mut mol = make_chain(8);
        mol.add_bond(Bond::new(7, 0, BondType::Single, BondStereo::Single2Down));
        mol.atoms[3] = Atom::new("N", [4.5, 0.0, 0.0])
            .with_charge(1)
            .with_isotopic_mass(15)
            .with_implicit_h(ImplicitHydrogens::new(2));
        mol.atoms[5].radical = Radical::Triplet;

        let back = unflatten(&flatten(&mol).unwrap()).unwrap();

        assert_eq!(back.atoms, mol.atoms);
        assert_eq!(back.bond_count(), mol.bond_count());
        assert_eq!(bond_set(&back), bond_set(&mol));
    }

    #[test]
    fn round_trip_restores_stereo_sentinel_as_none() {
        let mut mol = make_chain(4);
        mol.add_stereo(Stereo0D::double_bond([0, 1, 2, 3], Parity::Odd));
        mol.add_stereo(Stereo0D::tetrahedral(1, [0, 2, 3, 0], Parity::Unknown));

        let back = unflatten(&flatten(&mol).unwrap()).unwrap();
        assert_eq!(back.stereo, mol.stereo);
        assert_eq!(back.stereo[0].central_atom, None);
        assert_eq!(back.stereo[1].central_atom, Some(1));
    }

    #[test]
    fn options_are_not_round_tripped() {
        let mut mol = make_carbonyl();
        mol.options = "-SNon ".to_string();
        let back = unflatten(&flatten(&mol).unwrap()).unwrap();
        assert!(back.options.is_empty());
    }

    #[test]
    fn one_sided_adjacency_is_corruption() {
        let mut record = flatten(&make_carbonyl()).unwrap();
        record.atoms[1].num_bonds = 0;
        let err = unflatten(&record).unwrap_err();
        assert!(matches!(err, Error::DataCorruption(ref m) if m.contains("only")));
    }

    #[test]
    fn out_of_range_neighbor_is_corruption() {
        let mut record = flatten(&make_carbonyl()).unwrap();
        record.atoms[1].neighbor[0] = 5;
        assert!(matches!(unflatten(&record), Err(Error::DataCorruption(_))));

        record.atoms[1].neighbor[0] = -3;
        assert!(matches!(unflatten(&record), Err(Error::DataCorruption(_))));
    }

    #[test]
    fn bond_count_beyond_maxval_is_corruption() {
        let mut record = flatten(&make_carbonyl()).unwrap();
        record.atoms[0].num_bonds = (MAXVAL + 1) as i16;
        assert!(matches!(unflatten(&record), Err(Error::DataCorruption(_))));
    }

    #[test]
    fn unknown_bond_type_is_corruption() {
        let mut record = flatten(&make_carbonyl()).unwrap();
        record.atoms[1].bond_type[0] = 9;
        assert!(matches!(unflatten(&record), Err(Error::DataCorruption(_))));
    }

    #[test]
    fn stereo_neighbor_out_of_range_is_corruption() {
        let mut mol = make_chain(4);
        mol.add_stereo(Stereo0D::double_bond([0, 1, 2, 3], Parity::Even));
        let mut record = flatten(&mol).unwrap();
        record.stereo[0].neighbor[3] = 4;
        assert!(matches!(unflatten(&record), Err(Error::DataCorruption(_))));

        record.stereo[0].neighbor[3] = 3;
        record.stereo[0].central_atom = 10;
        assert!(matches!(unflatten(&record), Err(Error::DataCorruption(_))));
    }

    #[test]
    fn empty_record_gives_empty_molecule() {
        let mol = unflatten(&FlatRecord::default()).unwrap();
        assert_eq!(mol, Molecule::new());
    }
}
