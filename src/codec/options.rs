//! Library switches and the owned buffer they travel in.
//!
//! Options reach the library as a single nul-terminated string such as
//! `"-Compress -SNon "`. [`normalize_options`] checks and canonicalises free-form
//! input; [`OptionsBuffer`] owns the copy handed to exactly one call.

use std::ffi::{CStr, CString};
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use super::error::Error;

/// Switch character the library expects in front of each option.
#[cfg(windows)]
pub const FLAG_CHAR: char = '/';
/// Switch character the library expects in front of each option.
#[cfg(not(windows))]
pub const FLAG_CHAR: char = '-';

/// A recognised library switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum InchiOption {
    /// Use the chiral flag from the input to decide between absolute and relative stereo.
    Sucf,
    ChiralFlagOn,
    ChiralFlagOff,
    /// Exclude stereo.
    SNon,
    SAbs,
    SRel,
    SRac,
    /// Include omitted unknown/undefined stereo.
    Suu,
    /// Narrow end of a wedge points to the stereo centre.
    NewPs,
    /// Include reconnected metal results.
    RecMet,
    /// Include the fixed-H layer.
    FixedH,
    /// Omit auxiliary information.
    AuxNone,
    /// Disable aggressive deprotonation.
    NoAdp,
    Compress,
    /// Do not add implicit hydrogens to atoms with `h == -1`.
    DoNotAddH,
    /// Timeout in seconds; the library reads the number from the switch itself.
    Wnumber,
    OutputSdf,
    WarnOnEmptyStructure,
    FixSp3Bug,
    /// Treat coordinates as 3D when perceiving stereo.
    SpXyz,
}

impl InchiOption {
    pub const ALL: [InchiOption; 20] = [
        InchiOption::Sucf,
        InchiOption::ChiralFlagOn,
        InchiOption::ChiralFlagOff,
        InchiOption::SNon,
        InchiOption::SAbs,
        InchiOption::SRel,
        InchiOption::SRac,
        InchiOption::Suu,
        InchiOption::NewPs,
        InchiOption::RecMet,
        InchiOption::FixedH,
        InchiOption::AuxNone,
        InchiOption::NoAdp,
        InchiOption::Compress,
        InchiOption::DoNotAddH,
        InchiOption::Wnumber,
        InchiOption::OutputSdf,
        InchiOption::WarnOnEmptyStructure,
        InchiOption::FixSp3Bug,
        InchiOption::SpXyz,
    ];

    /// Canonical spelling as the library expects it.
    pub fn name(self) -> &'static str {
        match self {
            InchiOption::Sucf => "SUCF",
            InchiOption::ChiralFlagOn => "ChiralFlagON",
            InchiOption::ChiralFlagOff => "ChiralFlagOFF",
            InchiOption::SNon => "SNon",
            InchiOption::SAbs => "SAbs",
            InchiOption::SRel => "SRel",
            InchiOption::SRac => "SRac",
            InchiOption::Suu => "SUU",
            InchiOption::NewPs => "NEWPS",
            InchiOption::RecMet => "RecMet",
            InchiOption::FixedH => "FixedH",
            InchiOption::AuxNone => "AuxNone",
            InchiOption::NoAdp => "NoADP",
            InchiOption::Compress => "Compress",
            InchiOption::DoNotAddH => "DoNotAddH",
            InchiOption::Wnumber => "Wnumber",
            InchiOption::OutputSdf => "OutputSDF",
            InchiOption::WarnOnEmptyStructure => "WarnOnEmptyStructure",
            InchiOption::FixSp3Bug => "FixSp3Bug",
            InchiOption::SpXyz => "SPXYZ",
        }
    }
}

impl fmt::Display for InchiOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InchiOption {
    type Err = Error;

    /// Parses one switch, ignoring case and a single leading `-` or `/`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bare = s
            .strip_prefix('-')
            .or_else(|| s.strip_prefix('/'))
            .unwrap_or(s);
        if bare.eq_ignore_ascii_case("SAsXYZ") {
            return Ok(InchiOption::SpXyz);
        }
        InchiOption::ALL
            .into_iter()
            .find(|op| op.name().eq_ignore_ascii_case(bare))
            .ok_or_else(|| Error::UnrecognisedOption(s.to_string()))
    }
}

impl TryFrom<String> for InchiOption {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Renders switches in the form the library expects: `FLAG_CHAR + name + ' '` each.
pub fn format_options(options: &[InchiOption]) -> String {
    let mut out = String::new();
    for op in options {
        out.push(FLAG_CHAR);
        out.push_str(op.name());
        out.push(' ');
    }
    out
}

/// Checks a whitespace-separated option string and canonicalises every token.
///
/// # Errors
///
/// [`Error::UnrecognisedOption`] for the first token that is not a known switch.
///
/// # Examples
///
/// ```
/// use inchi_forge::{normalize_options, FLAG_CHAR};
///
/// let ops = normalize_options("compress /snon")?;
/// assert_eq!(ops, format!("{FLAG_CHAR}Compress {FLAG_CHAR}SNon "));
/// # Ok::<(), inchi_forge::Error>(())
/// ```
pub fn normalize_options(options: &str) -> Result<String, Error> {
    let parsed = parse_options(options)?;
    Ok(format_options(&parsed))
}

/// Parses a whitespace-separated option string into typed switches.
pub fn parse_options(options: &str) -> Result<Vec<InchiOption>, Error> {
    options.split_whitespace().map(str::parse).collect()
}

/// Owned, nul-terminated copy of an options string, scoped to one library call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionsBuffer(CString);

impl OptionsBuffer {
    /// Copies `options` into a fresh buffer.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidString`] if `options` contains a nul byte.
    pub fn new(options: &str) -> Result<Self, Error> {
        Ok(Self(CString::new(options)?))
    }

    pub fn empty() -> Self {
        Self(CString::default())
    }

    pub fn as_c_str(&self) -> &CStr {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        // Built from a `&str`, so always valid UTF-8.
        self.0.to_str().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.as_bytes().is_empty()
    }
}

impl Default for OptionsBuffer {
    fn default() -> Self {
        Self::empty()
    }
}
