use crate::io::{Format, error::Error};
use crate::model::atom::Atom;
use crate::model::molecule::Molecule;
use crate::model::types::{BondStereo, BondType, Radical};
use std::io::Write;

// Atom and bond counts share a three-character field.
const MAX_BLOCK_COUNT: usize = 999;
// Entries per M  CHG / M  ISO / M  RAD line.
const PROPERTY_CHUNK: usize = 8;
const MASS_DIFF_RANGE: std::ops::RangeInclusive<i16> = -3..=4;

/// Writes `molecule` as one V2000 molfile block terminated by `$$$$`.
///
/// Charges, radicals and absolute isotope masses go into the property block;
/// mass shifts are written inline and must fit the mass-difference column.
/// Wedges whose narrow end is on the second atom are written with the atoms
/// swapped.
pub fn write<W: Write>(mut writer: W, molecule: &Molecule) -> Result<(), Error> {
    let atom_count = molecule.atom_count();
    let bond_count = molecule.bond_count();
    if atom_count > MAX_BLOCK_COUNT || bond_count > MAX_BLOCK_COUNT {
        return Err(Error::unwritable(
            Format::Sdf,
            format!("V2000 blocks hold at most {MAX_BLOCK_COUNT} atoms and bonds"),
        ));
    }

    if let Some((index, shift)) = unrepresentable_shift(molecule) {
        return Err(Error::unwritable(
            Format::Sdf,
            format!(
                "atom {} has isotopic mass shift {shift}; the mass-difference column holds {}..={}",
                index + 1,
                MASS_DIFF_RANGE.start(),
                MASS_DIFF_RANGE.end()
            ),
        ));
    }

    writeln!(writer, "SDF Export")?;
    writeln!(writer, "inchi-forge")?;
    writeln!(writer)?;
    writeln!(
        writer,
        "{:>3}{:>3}  0  0  0  0  0  0  0  0999 V2000",
        atom_count, bond_count
    )?;

    for atom in &molecule.atoms {
        writeln!(
            writer,
            "{:>10.4}{:>10.4}{:>10.4} {:<3}{:>2}  0  0  0  0  0  0  0  0  0  0  0",
            atom.position[0],
            atom.position[1],
            atom.position[2],
            atom.element,
            inline_mass_diff(atom)
        )?;
    }

    for bond in &molecule.bonds {
        let (first, second, stereo) = match bond.stereo {
            BondStereo::Single2Up => (bond.target, bond.origin, BondStereo::Single1Up),
            BondStereo::Single2Either => (bond.target, bond.origin, BondStereo::Single1Either),
            BondStereo::Single2Down => (bond.target, bond.origin, BondStereo::Single1Down),
            other => (bond.origin, bond.target, other),
        };
        writeln!(
            writer,
            "{:>3}{:>3}{:>3}{:>3}  0  0  0",
            first + 1,
            second + 1,
            bond_type_to_ctfile(bond.bond_type),
            bond_stereo_to_ctfile(stereo)
        )?;
    }

    let charges: Vec<(usize, i32)> = indexed(molecule, |a| (a.charge != 0).then_some(a.charge.into()));
    let radicals: Vec<(usize, i32)> = indexed(molecule, |a| {
        (a.radical != Radical::None).then_some(a.radical.value().into())
    });
    let isotopes: Vec<(usize, i32)> = indexed(molecule, |a| {
        (a.is_isotopic() && a.isotopic_mass_shift().is_none()).then_some(a.isotopic_mass.into())
    });

    write_property(&mut writer, "CHG", &charges)?;
    write_property(&mut writer, "RAD", &radicals)?;
    write_property(&mut writer, "ISO", &isotopes)?;

    writeln!(writer, "M  END")?;
    writeln!(writer, "$$$$")?;
    Ok(())
}

fn inline_mass_diff(atom: &Atom) -> i16 {
    atom.isotopic_mass_shift().unwrap_or(0)
}

// Shift-encoded masses have no absolute value to put into M  ISO.
fn unrepresentable_shift(molecule: &Molecule) -> Option<(usize, i16)> {
    molecule
        .atoms
        .iter()
        .enumerate()
        .find_map(|(i, a)| {
            a.isotopic_mass_shift()
                .filter(|shift| !MASS_DIFF_RANGE.contains(shift))
                .map(|shift| (i, shift))
        })
}

fn indexed(molecule: &Molecule, value: impl Fn(&Atom) -> Option<i32>) -> Vec<(usize, i32)> {
    molecule
        .atoms
        .iter()
        .enumerate()
        .filter_map(|(i, a)| value(a).map(|v| (i + 1, v)))
        .collect()
}

fn write_property<W: Write>(
    writer: &mut W,
    kind: &str,
    entries: &[(usize, i32)],
) -> Result<(), Error> {
    for chunk in entries.chunks(PROPERTY_CHUNK) {
        write!(writer, "M  {}{:>3}", kind, chunk.len())?;
        for (atom, value) in chunk {
            write!(writer, " {:>3} {:>3}", atom, value)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

fn bond_type_to_ctfile(bond_type: BondType) -> i32 {
    match bond_type {
        BondType::None => 8,
        BondType::Single => 1,
        BondType::Double => 2,
        BondType::Triple => 3,
        BondType::Altern => 4,
    }
}

fn bond_stereo_to_ctfile(stereo: BondStereo) -> i32 {
    match stereo {
        BondStereo::Single1Up => 1,
        BondStereo::Single1Either => 4,
        BondStereo::Single1Down => 6,
        BondStereo::DoubleEither => 3,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::sdf::read;
    use crate::model::atom::ImplicitHydrogens;
    use crate::model::molecule::Bond;
    use std::io::Cursor;

    fn make_labelled_acetate() -> Molecule {
        let mut mol = Molecule::new();
        let auto = ImplicitHydrogens::new(ImplicitHydrogens::AUTO);
        mol.add_atom(Atom::new("C", [0.0, 0.0, 0.0]).with_implicit_h(auto));
        let mut carboxyl = Atom::new("C", [1.5, 0.0, 0.0]).with_implicit_h(auto);
        carboxyl.set_isotopic_mass_shift(1);
        mol.add_atom(carboxyl);
        mol.add_atom(Atom::new("O", [2.2, 1.2, 0.0]).with_implicit_h(auto));
        mol.add_atom(
            Atom::new("O", [2.2, -1.2, 0.0])
                .with_charge(-1)
                .with_isotopic_mass(18)
                .with_implicit_h(auto),
        );
        mol.add_bond(Bond::plain(0, 1, BondType::Single));
        mol.add_bond(Bond::plain(1, 2, BondType::Double));
        mol.add_bond(Bond::plain(1, 3, BondType::Single));
        mol
    }

    #[test]
    fn writes_and_reads_roundtrip() {
        let mol = make_labelled_acetate();

        let mut buf = Vec::new();
        write(&mut buf, &mol).expect("write sdf");
        let parsed = read(Cursor::new(buf)).expect("read sdf");

        assert_eq!(parsed.atom_count(), mol.atom_count());
        for (a, b) in mol.atoms.iter().zip(parsed.atoms.iter()) {
            assert_eq!(a.element, b.element);
            assert_eq!(a.charge, b.charge);
            assert_eq!(a.isotopic_mass, b.isotopic_mass);
            for k in 0..3 {
                assert!((a.position[k] - b.position[k]).abs() < 1e-4);
            }
        }
        assert_eq!(parsed.bonds, mol.bonds);
    }

    #[test]
    fn second_atom_wedges_are_written_swapped() {
        let mut mol = Molecule::new();
        mol.add_atom(Atom::new("C", [0.0; 3]));
        mol.add_atom(Atom::new("F", [1.0, 0.0, 0.0]));
        mol.add_bond(Bond::new(0, 1, BondType::Single, BondStereo::Single2Down));

        let mut buf = Vec::new();
        write(&mut buf, &mol).unwrap();
        let parsed = read(Cursor::new(buf)).unwrap();
        assert_eq!(
            parsed.bonds[0],
            Bond::new(1, 0, BondType::Single, BondStereo::Single1Down)
        );
    }

    #[test]
    fn writes_property_lines() {
        let mut mol = Molecule::new();
        mol.add_atom(Atom::new("N", [0.0; 3]).with_charge(1));
        mol.add_atom(Atom::new("C", [1.0, 0.0, 0.0]).with_radical(Radical::Doublet));

        let mut buf = Vec::new();
        write(&mut buf, &mol).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("M  CHG  1   1   1\n"));
        assert!(text.contains("M  RAD  1   2   2\n"));
        assert!(!text.contains("M  ISO"));
        assert!(text.ends_with("M  END\n$$$$\n"));
    }

    #[test]
    fn mass_shifts_within_column_round_trip() {
        let mut mol = Molecule::new();
        let mut carbon = Atom::new("C", [0.0; 3]);
        carbon.set_isotopic_mass_shift(4);
        mol.add_atom(carbon);
        let mut oxygen = Atom::new("O", [1.2, 0.0, 0.0]);
        oxygen.set_isotopic_mass_shift(-3);
        mol.add_atom(oxygen);

        let mut buf = Vec::new();
        write(&mut buf, &mol).unwrap();
        let parsed = read(Cursor::new(buf)).unwrap();
        assert_eq!(parsed.atoms[0].isotopic_mass_shift(), Some(4));
        assert_eq!(parsed.atoms[1].isotopic_mass_shift(), Some(-3));
    }

    #[test]
    fn refuses_mass_shift_outside_column() {
        let mut mol = Molecule::new();
        mol.add_atom(Atom::new("C", [0.0; 3]));
        let mut labelled = Atom::new("C", [1.5, 0.0, 0.0]);
        labelled.set_isotopic_mass_shift(5);
        mol.add_atom(labelled);

        let mut buf = Vec::new();
        let err = write(&mut buf, &mol).unwrap_err();
        assert!(matches!(err, Error::Unwritable { .. }));
        assert!(err.to_string().contains("atom 2"));
        assert!(buf.is_empty());
    }

    #[test]
    fn refuses_blocks_beyond_v2000_counts() {
        let mut mol = Molecule::new();
        for _ in 0..=MAX_BLOCK_COUNT {
            mol.add_atom(Atom::new("C", [0.0; 3]));
        }
        assert!(matches!(
            write(Vec::new(), &mol),
            Err(Error::Unwritable { .. })
        ));
    }
}
