//! Owned results of engine calls.
//!
//! Every string here is a copy of library-owned memory; the library buffer is
//! released before the value is handed out.

use super::status::{KeyStatus, RetStatus};
use crate::codec::{InchiKey, ParseKeyError};
use crate::model::molecule::Molecule;

/// Result of generating an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InchiOutput {
    pub status: RetStatus,
    /// The identifier, empty unless [`RetStatus::has_result`].
    pub inchi: String,
    /// Auxiliary information (atom numbering, coordinates).
    pub aux_info: String,
    /// Error or warning message.
    pub message: String,
    /// Log output.
    pub log: String,
}

impl InchiOutput {
    /// The identifier, if the call produced one.
    pub fn identifier(&self) -> Option<&str> {
        (self.status.has_result() && !self.inchi.is_empty()).then_some(self.inchi.as_str())
    }
}

/// Warning bits set while rebuilding a structure from an identifier.
///
/// Indexed as `[layer][word]`, where layer 0 is the main layer and layer 1
/// the fixed-H layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WarningFlags(pub [[u64; 2]; 2]);

impl WarningFlags {
    pub fn any(&self) -> bool {
        self.0.iter().flatten().any(|&w| w != 0)
    }

    pub fn get(&self, layer: usize, word: usize) -> u64 {
        self.0[layer][word]
    }
}

/// Result of rebuilding a structure from an identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureOutput {
    pub status: RetStatus,
    /// The rebuilt molecule; empty when the call failed.
    pub molecule: Molecule,
    pub message: String,
    pub log: String,
    pub warning_flags: WarningFlags,
}

/// Result of deriving a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyOutput {
    pub status: KeyStatus,
    pub key: String,
    /// The two hash extensions, present only when requested and produced.
    pub extensions: Option<(String, String)>,
}

impl KeyOutput {
    /// Parses the key into its blocks.
    ///
    /// Returns `None` when the derivation did not succeed.
    pub fn parsed(&self) -> Option<Result<InchiKey, ParseKeyError>> {
        (self.status == KeyStatus::Ok).then(|| InchiKey::parse(&self.key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_requires_result_status() {
        let mut out = InchiOutput {
            status: RetStatus::Warning,
            inchi: "InChI=1/Cl".to_string(),
            aux_info: String::new(),
            message: "Accepted unusual valence".to_string(),
            log: String::new(),
        };
        assert_eq!(out.identifier(), Some("InChI=1/Cl"));

        out.status = RetStatus::Error;
        assert_eq!(out.identifier(), None);
    }

    #[test]
    fn warning_flags_any() {
        assert!(!WarningFlags::default().any());
        let flags = WarningFlags([[0, 0], [0, 4]]);
        assert!(flags.any());
        assert_eq!(flags.get(1, 1), 4);
    }

    #[test]
    fn key_output_parses_only_on_success() {
        let ok = KeyOutput {
            status: KeyStatus::Ok,
            key: "LFQSCWFLJHTTHZ-UHFFFAOYSA-N".to_string(),
            extensions: None,
        };
        assert!(ok.parsed().unwrap().unwrap().is_standard());

        let failed = KeyOutput {
            status: KeyStatus::NotInchiInput,
            key: String::new(),
            extensions: None,
        };
        assert!(failed.parsed().is_none());
    }
}
