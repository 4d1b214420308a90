//! Line-oriented lists of identifiers or keys.
//!
//! One entry per line; blank lines and lines starting with `#` are skipped.

use crate::io::{Format, error::Error};
use std::io::{BufRead, Write};

const IDENTIFIER_PREFIX: &str = "InChI=";

/// Reads every entry of a list, trimmed, without checking its form.
pub fn read_lines<R: BufRead>(reader: R) -> Result<Vec<String>, Error> {
    let mut entries = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let entry = line.trim();
        if entry.is_empty() || entry.starts_with('#') {
            continue;
        }
        entries.push(entry.to_string());
    }
    Ok(entries)
}

/// Reads a list of identifiers, each of which must carry the `InChI=` prefix.
pub fn read_identifiers<R: BufRead>(reader: R) -> Result<Vec<String>, Error> {
    let mut identifiers = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let entry = line.trim();
        if entry.is_empty() || entry.starts_with('#') {
            continue;
        }
        if !entry.starts_with(IDENTIFIER_PREFIX) {
            return Err(Error::parse(
                Format::Inchi,
                i + 1,
                format!("expected an identifier starting with '{IDENTIFIER_PREFIX}'"),
            ));
        }
        identifiers.push(entry.to_string());
    }
    Ok(identifiers)
}

/// Writes one entry per line.
pub fn write_lines<W: Write, S: AsRef<str>>(mut writer: W, entries: &[S]) -> Result<(), Error> {
    for entry in entries {
        writeln!(writer, "{}", entry.as_ref())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn skips_blank_and_comment_lines() {
        let text = "# ligands\nInChI=1/Cl\n\n  InChI=1/C2H4/c1-2/h1-2H2  \n";
        let ids = read_identifiers(Cursor::new(text)).unwrap();
        assert_eq!(ids, vec!["InChI=1/Cl", "InChI=1/C2H4/c1-2/h1-2H2"]);
    }

    #[test]
    fn rejects_entries_without_prefix() {
        let err = read_identifiers(Cursor::new("InChI=1/Cl\nCCO\n")).unwrap_err();
        assert!(matches!(
            err,
            Error::Parse {
                format: Format::Inchi,
                line: 2,
                ..
            }
        ));
    }

    #[test]
    fn read_lines_accepts_any_entry() {
        let keys = read_lines(Cursor::new("LFQSCWFLJHTTHZ-UHFFFAOYSA-N\nbogus\n")).unwrap();
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn writes_one_entry_per_line() {
        let mut buf = Vec::new();
        write_lines(&mut buf, &["a", "b"]).unwrap();
        assert_eq!(buf, b"a\nb\n");
    }
}
