use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, IsTerminal, Read, Stdin, StdoutLock, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};

const STD_STREAM: &str = "-";

pub fn stderr_is_tty() -> bool {
    io::stderr().is_terminal()
}

pub fn stdin_is_tty() -> bool {
    io::stdin().is_terminal()
}

// `None` and `-` both select the standard stream.
fn file_path(path: Option<&Path>) -> Option<&Path> {
    path.filter(|p| p.as_os_str() != STD_STREAM)
}

pub enum Input {
    File(BufReader<File>),
    Stdin(BufReader<Stdin>),
}

impl Input {
    fn inner(&mut self) -> &mut dyn BufRead {
        match self {
            Input::File(r) => r,
            Input::Stdin(r) => r,
        }
    }
}

impl Read for Input {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner().read(buf)
    }
}

impl BufRead for Input {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner().fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.inner().consume(amt)
    }
}

/// Opens the input file, or stdin for `None` and `-`.
///
/// An interactive stdin is refused.
pub fn open_input(path: Option<&Path>) -> Result<Input> {
    if let Some(p) = file_path(path) {
        let file =
            File::open(p).with_context(|| format!("Failed to open input file: {}", p.display()))?;
        return Ok(Input::File(BufReader::new(file)));
    }

    if stdin_is_tty() {
        bail!("No input provided: stdin is a terminal. Use -i or pipe data to stdin.");
    }
    Ok(Input::Stdin(BufReader::new(io::stdin())))
}

pub enum Output {
    File(BufWriter<File>),
    Stdout(BufWriter<StdoutLock<'static>>),
}

impl Output {
    fn inner(&mut self) -> &mut dyn Write {
        match self {
            Output::File(w) => w,
            Output::Stdout(w) => w,
        }
    }
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner().flush()
    }
}

/// Creates the output file, or writes to stdout for `None` and `-`.
pub fn create_output(path: Option<&Path>) -> Result<Output> {
    match file_path(path) {
        Some(p) => {
            let file = File::create(p)
                .with_context(|| format!("Failed to create output file: {}", p.display()))?;
            Ok(Output::File(BufWriter::new(file)))
        }
        None => Ok(Output::Stdout(BufWriter::new(io::stdout().lock()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn dash_selects_the_standard_stream() {
        assert_eq!(file_path(Some(Path::new("-"))), None);
        assert_eq!(file_path(None), None);
    }

    #[test]
    fn other_paths_are_files() {
        let path = PathBuf::from("ligands.sdf");
        assert_eq!(file_path(Some(&path)), Some(path.as_path()));
    }

    #[test]
    fn file_output_is_readable_as_input() {
        let path = std::env::temp_dir().join(format!("iforge-io-{}.txt", std::process::id()));

        let mut out = create_output(Some(&path)).unwrap();
        writeln!(out, "InChI=1S/Cl").unwrap();
        drop(out);

        let mut line = String::new();
        open_input(Some(&path)).unwrap().read_line(&mut line).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(line, "InChI=1S/Cl\n");
    }

    #[test]
    fn missing_input_names_the_path() {
        let err = match open_input(Some(Path::new("/nonexistent/in.sdf"))) {
            Err(e) => e,
            Ok(_) => panic!("expected an error"),
        };
        assert!(err.to_string().contains("/nonexistent/in.sdf"));
    }
}
