use std::io::{self, Write};

use anyhow::Error;

use crate::util::text::wrap;

#[rustfmt::skip]
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ╔══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(stderr, "   ║  ✗ Error                                                     ║");
    let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");

    for line in wrap(&err.to_string(), 59) {
        let _ = writeln!(stderr, "   ║  {:<59} ║", line);
    }

    let mut source = err.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Caused by:                                                  ║");
        for line in wrap(&cause.to_string(), 59) {
            let _ = writeln!(stderr, "   ║    {:<57} ║", line);
        }
        source = cause.source();
    }

    let hints = HintCollector::collect(err);
    if !hints.is_empty() {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Hints:                                                      ║");
        for hint in hints {
            let wrapped = wrap(&hint, 55);
            if let Some((first, rest)) = wrapped.split_first() {
                let _ = writeln!(stderr, "   ║    • {:<55} ║", first);
                for line in rest {
                    let _ = writeln!(stderr, "   ║      {:<55} ║", line);
                }
            }
        }
    }

    let _ = writeln!(stderr, "   ╚══════════════════════════════════════════════════════════════╝");
    let _ = writeln!(stderr);
}

#[derive(Default)]
struct HintCollector {
    hints: Vec<String>,
    has_typed_hints: bool,
}

impl HintCollector {
    fn collect(err: &Error) -> Vec<String> {
        let mut collector = Self::default();

        collector.collect_io_hints(err);
        collector.collect_codec_hints(err);

        if !collector.has_typed_hints {
            collector.collect_fallback_hints(err);
        }

        collector.hints
    }

    fn add(&mut self, hint: impl Into<String>) {
        self.hints.push(hint.into());
    }

    fn collect_io_hints(&mut self, err: &Error) {
        use inchi_forge::io::{Error as IoError, Format};

        let Some(io_err) = err.downcast_ref::<IoError>() else {
            if let Some(source) = err.downcast_ref::<std::io::Error>() {
                self.has_typed_hints = true;
                self.collect_std_io_hints(source);
            }
            return;
        };

        self.has_typed_hints = true;

        match io_err {
            IoError::Io { source } => self.collect_std_io_hints(source),

            IoError::Parse { format, line, .. } => {
                self.add(format!(
                    "Parser encountered an issue near line {} in {} data",
                    line, format
                ));
                self.add("Inspect the input around that line for malformed entries");
                match format {
                    Format::Sdf => {
                        self.add("Only V2000 connection tables are read; V3000 is not supported");
                        self.add("Atom and bond lines use fixed columns, check their alignment");
                    }
                    Format::Inchi => {
                        self.add("Each non-blank line must start with 'InChI='");
                        self.add("Lines starting with '#' are treated as comments");
                    }
                }
            }

            IoError::Unwritable { format, .. } => {
                self.add(format!("The structure does not fit into {} output", format));
                self.add("V2000 blocks are limited to 999 atoms and 999 bonds");
            }
        }
    }

    fn collect_std_io_hints(&mut self, source: &std::io::Error) {
        use std::io::ErrorKind;

        match source.kind() {
            ErrorKind::NotFound => {
                self.add("File or directory not found");
                self.add("Check the path spelling and ensure the file exists");
            }

            ErrorKind::PermissionDenied => {
                self.add("Permission denied accessing the file");
                self.add("Check file permissions with `ls -la`");
            }

            ErrorKind::InvalidData => {
                self.add("Input is not valid UTF-8 text");
                self.add("Verify the file is not truncated or binary");
            }

            ErrorKind::UnexpectedEof => {
                self.add("Unexpected end of file encountered");
                self.add("The file may be truncated or incomplete");
            }

            ErrorKind::BrokenPipe => {
                self.add("Output consumer terminated early");
                self.add("This may occur when piping to commands like `head`");
            }

            _ => {
                self.add("I/O operation failed");
                self.add("Check file path, permissions, and disk space");
            }
        }
    }

    fn collect_codec_hints(&mut self, err: &Error) {
        use inchi_forge::{Capacity, Error as CodecError, MAX_ATOMS, MAXVAL};

        let Some(codec_err) = err.downcast_ref::<CodecError>() else {
            return;
        };

        self.has_typed_hints = true;

        match codec_err {
            CodecError::CapacityExceeded { what, .. } => match what {
                Capacity::Atoms => {
                    self.add(format!("The library accepts at most {} atoms", MAX_ATOMS));
                    self.add("Split disconnected components into separate records");
                }
                Capacity::Bonds { .. } => {
                    self.add(format!("An atom may carry at most {} bonds", MAXVAL));
                    self.add("Check the input for duplicated bond lines");
                }
                Capacity::Stereo => {
                    self.add("Too many 0D stereo descriptors for one structure");
                }
            },

            CodecError::InvalidElementName { .. } => {
                self.add("Element symbols are limited to five characters");
                self.add("Query atoms such as 'A', 'Q' or lists are not accepted");
            }

            CodecError::InvalidReference { .. } | CodecError::SelfBond { .. } => {
                self.add("A bond or stereo descriptor points at a missing atom");
                self.add("Check atom numbering in the bond block");
            }

            CodecError::DataCorruption(_) => {
                self.add("The library returned an inconsistent structure");
                self.add("Try again with --serialize if the library is older than 1.04");
            }

            CodecError::UnrecognisedOption(_) => {
                self.add("Options are library switches such as 'FixedH' or 'SNon'");
                self.add("Either '-' or '/' may prefix a switch");
            }

            CodecError::InvalidString(_) => {
                self.add("Identifiers and options must not contain nul bytes");
            }

            CodecError::UnknownStatus { .. } => {
                self.add("The installed libinchi returned an unexpected status");
                self.add("Check that the library version is 1.03 or newer");
            }

            CodecError::Backend(_) => {
                self.add("The identifier library did not return a result buffer");
                self.add("Check that libinchi is installed and on the library path");
            }

            CodecError::ConfigParse(_) => {
                self.add("Check the --config file against the documented keys");
                self.add("Known keys: options, standard, key_extensions, strict_check");
            }
        }
    }

    fn collect_fallback_hints(&mut self, err: &Error) {
        let msg = error_chain_text(err);

        if msg.contains("terminal") || msg.contains("stdin") {
            self.add("Input appears to be from a terminal");
            self.add("Provide input via -i/--input or pipe data to stdin");
            return;
        }

        if msg.contains("no such file") || msg.contains("not found") {
            self.add("Check that the file path is correct");
            return;
        }

        if msg.contains("empty") {
            self.add("Input appears to be empty");
            self.add("Verify the input contains a structure or identifiers");
        }
    }
}

fn error_chain_text(err: &Error) -> String {
    err.chain()
        .map(|cause| cause.to_string())
        .collect::<Vec<_>>()
        .join("\n")
        .to_lowercase()
}
