use std::collections::BTreeMap;
use std::io::{self, Write};

use inchi_forge::Molecule;

use crate::util::text::truncate;

const INDENT: &str = "      ";

const BOX_INNER_WIDTH: usize = 62;
const SAFE_TABLE_WIDTH: usize = BOX_INNER_WIDTH - INDENT.len();

pub fn print_structure_info(molecule: &Molecule) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let net_charge: i32 = molecule.atoms.iter().map(|a| i32::from(a.charge)).sum();
    let isotopic = molecule.atoms.iter().filter(|a| a.is_isotopic()).count();

    let rows = vec![
        ("Total Atoms", molecule.atom_count().to_string()),
        ("Total Bonds", molecule.bond_count().to_string()),
        ("Stereo (0D)", molecule.stereo_count().to_string()),
        ("Composition", composition(molecule)),
        ("Net Charge", format!("{:+}", net_charge)),
        ("Isotopic Atoms", isotopic.to_string()),
    ];

    print_kv_table(&mut out, "Structure Summary", &rows);
}

pub fn print_batch_summary(title: &str, total: usize, passed: usize) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let rows = vec![
        ("Entries", total.to_string()),
        ("Succeeded", passed.to_string()),
        ("Failed", (total - passed).to_string()),
    ];

    print_kv_table(&mut out, title, &rows);
}

// Hill order: with carbon present, C then H lead and the rest follow alphabetically.
// Without carbon every element, hydrogen included, is alphabetical.
fn composition(molecule: &Molecule) -> String {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for atom in &molecule.atoms {
        *counts.entry(atom.element.as_str()).or_insert(0) += 1;
    }

    let mut parts = Vec::new();
    if counts.contains_key("C") {
        for first in ["C", "H"] {
            if let Some(n) = counts.remove(first) {
                parts.push(element_count(first, n));
            }
        }
    }
    parts.extend(counts.into_iter().map(|(e, n)| element_count(e, n)));
    parts.concat()
}

fn element_count(element: &str, n: usize) -> String {
    if n == 1 {
        element.to_string()
    } else {
        format!("{}{}", element, n)
    }
}

fn print_kv_table(out: &mut impl Write, title: &str, rows: &[(&str, String)]) {
    let key_w = 16usize;
    let sep_overhead = 6;
    let val_w = SAFE_TABLE_WIDTH.saturating_sub(key_w + sep_overhead);

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{}┌─ {} ─┐",
        INDENT,
        truncate(title, SAFE_TABLE_WIDTH - 6)
    );
    let _ = writeln!(
        out,
        "{}┌{k_line}┬{v_line}┐",
        INDENT,
        k_line = "─".repeat(key_w + 2),
        v_line = "─".repeat(val_w + 2)
    );
    let _ = writeln!(
        out,
        "{}│ {:<key_w$} │ {:>val_w$} │",
        INDENT,
        "Metric",
        "Value",
        key_w = key_w,
        val_w = val_w
    );
    let _ = writeln!(
        out,
        "{}├{k_line}┼{v_line}┤",
        INDENT,
        k_line = "─".repeat(key_w + 2),
        v_line = "─".repeat(val_w + 2)
    );

    for (key, val) in rows {
        let _ = writeln!(
            out,
            "{}│ {:<key_w$} │ {:>val_w$} │",
            INDENT,
            truncate(key, key_w),
            truncate(val, val_w),
            key_w = key_w,
            val_w = val_w
        );
    }

    let _ = writeln!(
        out,
        "{}└{k_line}┴{v_line}┘",
        INDENT,
        k_line = "─".repeat(key_w + 2),
        v_line = "─".repeat(val_w + 2)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use inchi_forge::Atom;

    #[test]
    fn composition_uses_hill_order() {
        let mut mol = Molecule::new();
        for element in ["O", "C", "H", "C", "Br", "H", "H"] {
            mol.add_atom(Atom::new(element, [0.0; 3]));
        }
        assert_eq!(composition(&mol), "C2H3BrO");
    }

    #[test]
    fn composition_without_carbon_is_alphabetical() {
        let mut mol = Molecule::new();
        for element in ["Cl", "Na"] {
            mol.add_atom(Atom::new(element, [0.0; 3]));
        }
        assert_eq!(composition(&mol), "ClNa");
    }

    #[test]
    fn hydrogen_sorts_alphabetically_without_carbon() {
        let mut mol = Molecule::new();
        for element in ["H", "Cl"] {
            mol.add_atom(Atom::new(element, [0.0; 3]));
        }
        assert_eq!(composition(&mol), "ClH");

        let mut water = Molecule::new();
        for element in ["O", "H", "H"] {
            water.add_atom(Atom::new(element, [0.0; 3]));
        }
        assert_eq!(composition(&water), "H2O");
    }

    #[test]
    fn kv_table_rows_share_one_width() {
        let mut buf = Vec::new();
        print_kv_table(
            &mut buf,
            "Structure Summary",
            &[("Total Atoms", "3".to_string()), ("Composition", "C2H6O".to_string())],
        );
        let text = String::from_utf8(buf).unwrap();
        let widths: Vec<usize> = text
            .lines()
            .filter(|l| l.contains('│'))
            .map(|l| l.chars().count())
            .collect();
        assert_eq!(widths.len(), 3);
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
    }
}
