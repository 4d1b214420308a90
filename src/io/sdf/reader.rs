use crate::io::{Format, error::Error};
use crate::model::atom::{Atom, ImplicitHydrogens};
use crate::model::molecule::{Bond, Molecule};
use crate::model::types::{BondStereo, BondType, Radical};
use std::io::BufRead;

/// Reads the first molfile block of an SD file.
///
/// Charges and radicals come from the atom block unless `M  CHG` or `M  RAD`
/// lines are present, which replace them for the whole molecule. Atoms get
/// [`ImplicitHydrogens::AUTO`] so the library adds hydrogens by valence.
pub fn read<R: BufRead>(reader: R) -> Result<Molecule, Error> {
    let lines = collect_first_block(reader)?;
    if lines.len() < 4 {
        return Err(Error::parse(
            Format::Sdf,
            1,
            "SDF block must contain at least a header and counts line",
        ));
    }

    let counts_line_no = lines[3].0;
    let counts_line = &lines[3].1;
    if counts_line.contains("V3000") {
        return Err(Error::parse(
            Format::Sdf,
            counts_line_no,
            "V3000 is not supported",
        ));
    }

    let (atom_count, bond_count) = parse_counts(counts_line, counts_line_no)?;
    let atom_start = 4;
    let bond_start = atom_start + atom_count;
    let props_start = bond_start + bond_count;

    if lines.len() < props_start {
        return Err(Error::parse(
            Format::Sdf,
            lines.last().map(|(ln, _)| *ln).unwrap_or(counts_line_no),
            "SDF block ended before atoms/bonds were fully specified",
        ));
    }

    let mut molecule = Molecule::new();
    molecule.atoms = parse_atoms(&lines[atom_start..bond_start])?;
    molecule.bonds = parse_bonds(&lines[bond_start..props_start], atom_count)?;
    apply_properties(&lines[props_start..], &mut molecule.atoms)?;

    Ok(molecule)
}

fn collect_first_block<R: BufRead>(reader: R) -> Result<Vec<(usize, String)>, Error> {
    let mut lines = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let content = line.map_err(|e| Error::Io { source: e })?;
        let ln = i + 1;
        if content.trim() == "$$$$" && !lines.is_empty() {
            break;
        }
        lines.push((ln, content));
    }
    Ok(lines)
}

fn parse_counts(line: &str, line_no: usize) -> Result<(usize, usize), Error> {
    let padded = format!("{line:<6}");
    let atoms = field(&padded, 0, 3)
        .parse::<usize>()
        .map_err(|_| Error::parse(Format::Sdf, line_no, "invalid atom count"))?;
    let bonds = field(&padded, 3, 6)
        .parse::<usize>()
        .map_err(|_| Error::parse(Format::Sdf, line_no, "invalid bond count"))?;
    Ok((atoms, bonds))
}

fn parse_atoms(lines: &[(usize, String)]) -> Result<Vec<Atom>, Error> {
    let mut atoms = Vec::with_capacity(lines.len());
    for (ln, raw) in lines {
        let padded = format!("{raw:<39}");
        let coord = |start: usize, axis: &str| {
            field(&padded, start, start + 10).parse::<f64>().map_err(|_| {
                Error::parse(
                    Format::Sdf,
                    *ln,
                    format!("invalid {axis} coordinate in atom line"),
                )
            })
        };
        let position = [coord(0, "x")?, coord(10, "y")?, coord(20, "z")?];

        let element = field(&padded, 31, 34);
        if element.is_empty() {
            return Err(Error::parse(Format::Sdf, *ln, "missing element symbol"));
        }

        let mut atom = Atom::new(element, position)
            .with_implicit_h(ImplicitHydrogens::new(ImplicitHydrogens::AUTO));

        let mass_diff = optional_int(field(&padded, 34, 36), *ln, "mass difference")?;
        if mass_diff != 0 {
            atom.set_isotopic_mass_shift(mass_diff as i16);
        }

        let charge_code = optional_int(field(&padded, 36, 39), *ln, "charge code")?;
        match charge_code {
            0 => {}
            1..=3 => atom.charge = (4 - charge_code) as i8,
            4 => atom.radical = Radical::Doublet,
            5..=7 => atom.charge = (4 - charge_code) as i8,
            other => {
                return Err(Error::parse(
                    Format::Sdf,
                    *ln,
                    format!("unsupported charge code {other}"),
                ));
            }
        }

        atoms.push(atom);
    }
    Ok(atoms)
}

fn parse_bonds(lines: &[(usize, String)], atom_count: usize) -> Result<Vec<Bond>, Error> {
    let mut bonds = Vec::with_capacity(lines.len());
    for (ln, raw) in lines {
        let padded = format!("{raw:<12}");

        let a1 = field(&padded, 0, 3)
            .parse::<usize>()
            .map_err(|_| Error::parse(Format::Sdf, *ln, "invalid first atom index"))?;
        let a2 = field(&padded, 3, 6)
            .parse::<usize>()
            .map_err(|_| Error::parse(Format::Sdf, *ln, "invalid second atom index"))?;
        let type_val = field(&padded, 6, 9)
            .parse::<i32>()
            .map_err(|_| Error::parse(Format::Sdf, *ln, "invalid bond type value"))?;
        let stereo_val = optional_int(field(&padded, 9, 12), *ln, "bond stereo value")?;

        if a1 == 0 || a2 == 0 || a1 > atom_count || a2 > atom_count {
            return Err(Error::parse(
                Format::Sdf,
                *ln,
                "bond references atom outside declared range",
            ));
        }

        let bond_type = bond_type_from_ctfile(type_val)
            .ok_or_else(|| Error::parse(Format::Sdf, *ln, "unsupported bond type in bond line"))?;
        let stereo = bond_stereo_from_ctfile(stereo_val, bond_type).ok_or_else(|| {
            Error::parse(
                Format::Sdf,
                *ln,
                format!("unsupported stereo value {stereo_val} for a {bond_type} bond"),
            )
        })?;

        bonds.push(Bond::new(a1 - 1, a2 - 1, bond_type, stereo));
    }
    Ok(bonds)
}

fn apply_properties(lines: &[(usize, String)], atoms: &mut [Atom]) -> Result<(), Error> {
    let mut charges_reset = false;
    let mut radicals_reset = false;

    for (ln, raw) in lines {
        if raw.starts_with("M  END") {
            break;
        }
        let Some(kind) = raw.get(3..6) else {
            continue;
        };
        if !raw.starts_with("M  ") || !matches!(kind, "CHG" | "ISO" | "RAD") {
            continue;
        }

        let entries = property_entries(raw, *ln)?;
        match kind {
            "CHG" => {
                if !charges_reset {
                    atoms.iter_mut().for_each(|a| a.charge = 0);
                    charges_reset = true;
                }
                for (atom, value) in entries {
                    let charge = i8::try_from(value)
                        .map_err(|_| Error::parse(Format::Sdf, *ln, "charge out of range"))?;
                    atom_at(atoms, atom, *ln)?.charge = charge;
                }
            }
            "ISO" => {
                for (atom, value) in entries {
                    let mass = i16::try_from(value)
                        .ok()
                        .filter(|&m| m > 0)
                        .ok_or_else(|| Error::parse(Format::Sdf, *ln, "isotope mass out of range"))?;
                    atom_at(atoms, atom, *ln)?.isotopic_mass = mass;
                }
            }
            _ => {
                if !radicals_reset {
                    atoms.iter_mut().for_each(|a| a.radical = Radical::None);
                    radicals_reset = true;
                }
                for (atom, value) in entries {
                    let radical = i8::try_from(value)
                        .ok()
                        .and_then(Radical::from_value)
                        .ok_or_else(|| {
                            Error::parse(Format::Sdf, *ln, format!("invalid radical value {value}"))
                        })?;
                    atom_at(atoms, atom, *ln)?.radical = radical;
                }
            }
        }
    }
    Ok(())
}

fn property_entries(raw: &str, ln: usize) -> Result<Vec<(usize, i32)>, Error> {
    let tokens: Vec<_> = raw[6..].split_whitespace().collect();
    let count = tokens
        .first()
        .and_then(|t| t.parse::<usize>().ok())
        .ok_or_else(|| Error::parse(Format::Sdf, ln, "missing entry count in property line"))?;
    if tokens.len() < 1 + 2 * count {
        return Err(Error::parse(
            Format::Sdf,
            ln,
            "property line has fewer entries than declared",
        ));
    }

    (0..count)
        .map(|k| {
            let atom = tokens[1 + 2 * k]
                .parse::<usize>()
                .map_err(|_| Error::parse(Format::Sdf, ln, "invalid atom index in property line"))?;
            let value = tokens[2 + 2 * k]
                .parse::<i32>()
                .map_err(|_| Error::parse(Format::Sdf, ln, "invalid value in property line"))?;
            Ok((atom, value))
        })
        .collect()
}

fn atom_at(atoms: &mut [Atom], number: usize, ln: usize) -> Result<&mut Atom, Error> {
    let count = atoms.len();
    number
        .checked_sub(1)
        .and_then(|idx| atoms.get_mut(idx))
        .ok_or_else(|| {
            Error::parse(
                Format::Sdf,
                ln,
                format!("property refers to atom {number}, but the block has {count} atoms"),
            )
        })
}

fn field(padded: &str, start: usize, end: usize) -> &str {
    padded.get(start..end).map(str::trim).unwrap_or("")
}

fn optional_int(token: &str, ln: usize, what: &str) -> Result<i32, Error> {
    if token.is_empty() {
        return Ok(0);
    }
    token
        .parse::<i32>()
        .map_err(|_| Error::parse(Format::Sdf, ln, format!("invalid {what}")))
}

fn bond_type_from_ctfile(value: i32) -> Option<BondType> {
    match value {
        1 => Some(BondType::Single),
        2 => Some(BondType::Double),
        3 => Some(BondType::Triple),
        4 => Some(BondType::Altern),
        _ => None,
    }
}

fn bond_stereo_from_ctfile(value: i32, bond_type: BondType) -> Option<BondStereo> {
    match (value, bond_type) {
        (0, _) => Some(BondStereo::None),
        (1, BondType::Single) => Some(BondStereo::Single1Up),
        (4, BondType::Single) => Some(BondStereo::Single1Either),
        (6, BondType::Single) => Some(BondStereo::Single1Down),
        (3, BondType::Double) => Some(BondStereo::DoubleEither),
        _ => None,
    }
}
