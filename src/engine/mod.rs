//! Calls into the identifier library.
//!
//! [`InchiEngine`] owns a backend and an [`EngineConfig`]. Every call flattens
//! or builds its own input, makes one backend call, interprets the raw status
//! code and copies the result into an owned output value. The engine keeps no
//! state between calls, so one engine can serve many threads when its backend
//! is `Sync`.

mod backend;
mod config;
#[cfg(feature = "native")]
mod native;
mod output;
mod status;

pub use backend::{IdentifierInput, InchiBackend, RawKey, RawOutput, RawStructure};
pub use config::EngineConfig;
#[cfg(feature = "native")]
pub use native::LibInchi;
pub use output::{InchiOutput, KeyOutput, StructureOutput, WarningFlags};
pub use status::{IdentifierStatus, KeyCheckStatus, KeyStatus, RetStatus};

use tracing::{debug, warn};

use crate::codec::{Error, OptionsBuffer, flatten, unflatten};
use crate::model::molecule::Molecule;
use crate::utils::parallel::*;

/// Front end for identifier generation, structure recovery and key handling.
#[derive(Debug, Clone, Default)]
pub struct InchiEngine<B> {
    backend: B,
    config: EngineConfig,
}

impl<B: InchiBackend> InchiEngine<B> {
    /// Creates an engine with the default configuration.
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, EngineConfig::default())
    }

    pub fn with_config(backend: B, config: EngineConfig) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Generates an identifier for `molecule`.
    ///
    /// The molecule's own options are combined with the configured defaults.
    /// A library failure is reported through [`InchiOutput::status`], not as an
    /// `Err`.
    ///
    /// # Errors
    ///
    /// Any [`flatten`] error (raised before the library is called),
    /// [`Error::UnknownStatus`] or a backend failure.
    pub fn generate(&self, molecule: &Molecule) -> Result<InchiOutput, Error> {
        let mut record = flatten(molecule)?;
        if !self.config.options.is_empty() {
            record.options = OptionsBuffer::new(&self.config.merge_options(&molecule.options))?;
        }

        debug!(
            atoms = record.num_atoms(),
            stereo = record.num_stereo(),
            options = record.options.as_str(),
            standard = self.config.standard,
            "generating identifier"
        );
        let raw = self.backend.generate(&record, self.config.standard)?;
        let status = RetStatus::from_code(raw.code)?;
        report(status, &raw.message);

        Ok(InchiOutput {
            status,
            inchi: raw.inchi,
            aux_info: raw.aux_info,
            message: raw.message,
            log: raw.log,
        })
    }

    /// Re-generates an identifier from an existing one with `options` applied.
    pub fn inchi_from_inchi(&self, identifier: &str, options: &str) -> Result<InchiOutput, Error> {
        let input = IdentifierInput::new(identifier, &self.config.merge_options(options))?;
        debug!(
            identifier,
            options = input.options.as_str(),
            "converting identifier"
        );
        let raw = self.backend.generate_from_identifier(&input)?;
        let status = RetStatus::from_code(raw.code)?;
        report(status, &raw.message);

        Ok(InchiOutput {
            status,
            inchi: raw.inchi,
            aux_info: raw.aux_info,
            message: raw.message,
            log: raw.log,
        })
    }

    /// Rebuilds a structure (connection table and 0D stereo) from an identifier.
    ///
    /// # Errors
    ///
    /// [`Error::DataCorruption`] if the returned record is malformed, plus the
    /// errors of [`generate`](Self::generate) that apply.
    pub fn structure_from_inchi(
        &self,
        identifier: &str,
        options: &str,
    ) -> Result<StructureOutput, Error> {
        let input = IdentifierInput::new(identifier, &self.config.merge_options(options))?;
        debug!(identifier, "rebuilding structure");
        let raw = self.backend.generate_structure(&input)?;
        let status = RetStatus::from_code(raw.code)?;
        report(status, &raw.message);

        let molecule = unflatten(&raw.record)?;
        debug!(
            %status,
            atoms = molecule.atom_count(),
            bonds = molecule.bond_count(),
            "rebuilt structure"
        );

        Ok(StructureOutput {
            status,
            molecule,
            message: raw.message,
            log: raw.log,
            warning_flags: WarningFlags(raw.warning_flags),
        })
    }

    /// Derives the key of `identifier`.
    ///
    /// Uses the standard-only entry point when the engine is configured for
    /// standard identifiers; otherwise requests hash extensions according to
    /// [`EngineConfig::key_extensions`].
    pub fn generate_key(&self, identifier: &str) -> Result<KeyOutput, Error> {
        let raw = if self.config.standard {
            self.backend.derive_standard_key(identifier)?
        } else {
            self.backend
                .derive_key(identifier, self.config.key_extensions)?
        };
        let status = KeyStatus::from_code(raw.code)?;
        debug!(identifier, %status, key = raw.key.as_str(), "derived key");

        Ok(KeyOutput {
            status,
            key: raw.key,
            extensions: raw.extensions,
        })
    }

    /// Checks a key's length, layout and checksum.
    pub fn validate_key(&self, key: &str) -> Result<KeyCheckStatus, Error> {
        let status = KeyCheckStatus::from_code(self.backend.check_key(key)?)?;
        debug!(key, %status, "checked key");
        Ok(status)
    }

    /// Checks whether `identifier` is a well-formed identifier.
    pub fn check_identifier(&self, identifier: &str) -> Result<IdentifierStatus, Error> {
        let code = self
            .backend
            .check_identifier(identifier, self.config.strict_check)?;
        let status = IdentifierStatus::from_code(code)?;
        debug!(identifier, %status, strict = self.config.strict_check, "checked identifier");
        Ok(status)
    }
}

impl<B: InchiBackend + Sync> InchiEngine<B> {
    /// Derives keys for many identifiers, in input order.
    ///
    /// Runs in parallel with the `parallel` feature.
    pub fn keys_for(&self, identifiers: &[String]) -> Vec<Result<KeyOutput, Error>> {
        identifiers
            .par_iter()
            .map(|identifier| self.generate_key(identifier))
            .collect()
    }
}

fn report(status: RetStatus, message: &str) {
    match status {
        RetStatus::Okay => debug!(%status, "library call finished"),
        RetStatus::Warning => warn!(%status, message, "library call finished with a warning"),
        _ => debug!(%status, message, "library call produced no result"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{FLAG_CHAR, FlatRecord, InchiKey, InchiOption};
    use crate::model::atom::Atom;
    use crate::model::molecule::{Bond, Stereo0D};
    use crate::model::types::{BondType, Parity};
    use std::sync::Mutex;

    /// In-memory library stand-in.
    ///
    /// Identifiers are `"InChI=1/"` followed by the element symbols joined with
    /// `.`; rebuilt structures are chains of those atoms. Codes can be forced
    /// to exercise status handling.
    #[derive(Default)]
    struct ScriptedBackend {
        ret_code: i32,
        key_code: i32,
        received_options: Mutex<Vec<String>>,
    }

    impl ScriptedBackend {
        fn with_codes(ret_code: i32, key_code: i32) -> Self {
            Self {
                ret_code,
                key_code,
                ..Default::default()
            }
        }

        fn record_options(&self, options: &OptionsBuffer) {
            self.received_options
                .lock()
                .unwrap()
                .push(options.as_str().to_string());
        }

        fn fake_key(identifier: &str) -> String {
            let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
            for b in identifier.bytes() {
                hash ^= u64::from(b);
                hash = hash.wrapping_mul(0x0100_0000_01b3);
            }
            let mut letters = String::new();
            for _ in 0..22 {
                letters.push((b'A' + (hash % 26) as u8) as char);
                hash = hash.rotate_left(5) ^ 0x9e37_79b9_7f4a_7c15;
            }
            let flag = if identifier.starts_with("InChI=1S/") {
                'S'
            } else {
                'N'
            };
            format!("{}-{}{}A-N", &letters[..14], &letters[14..], flag)
        }
    }

    impl InchiBackend for ScriptedBackend {
        fn generate(&self, record: &FlatRecord, standard: bool) -> Result<RawOutput, Error> {
            self.record_options(&record.options);
            let symbols: Vec<String> = record
                .atoms
                .iter()
                .map(|a| String::from_utf8_lossy(a.element_bytes()).into_owned())
                .collect();
            let prefix = if standard { "InChI=1S/" } else { "InChI=1/" };
            let has_result = self.ret_code == 0 || self.ret_code == 1;
            Ok(RawOutput {
                code: self.ret_code,
                inchi: if has_result {
                    format!("{}{}", prefix, symbols.join("."))
                } else {
                    String::new()
                },
                aux_info: String::new(),
                message: if self.ret_code == 1 {
                    "Omitted undefined stereo".to_string()
                } else {
                    String::new()
                },
                log: String::new(),
            })
        }

        fn generate_from_identifier(&self, input: &IdentifierInput) -> Result<RawOutput, Error> {
            self.record_options(&input.options);
            Ok(RawOutput {
                code: self.ret_code,
                inchi: input.identifier.clone(),
                ..Default::default()
            })
        }

        fn generate_structure(&self, input: &IdentifierInput) -> Result<RawStructure, Error> {
            let body = input
                .identifier
                .split_once('/')
                .map(|(_, rest)| rest)
                .ok_or_else(|| Error::Backend("not an identifier".to_string()))?;
            let mut mol = Molecule::new();
            for (k, symbol) in body.split('.').enumerate() {
                let idx = mol.add_atom(Atom::new(symbol, [k as f64, 0.0, 0.0]));
                if idx > 0 {
                    mol.add_bond(Bond::plain(idx - 1, idx, BondType::Single));
                }
            }
            if mol.atom_count() >= 4 {
                mol.add_stereo(Stereo0D::double_bond([0, 1, 2, 3], Parity::Even));
            }
            Ok(RawStructure {
                code: self.ret_code,
                record: flatten(&mol)?,
                message: String::new(),
                log: String::new(),
                warning_flags: [[0, 0], [2, 0]],
            })
        }

        fn derive_key(&self, identifier: &str, extensions: bool) -> Result<RawKey, Error> {
            if !identifier.starts_with("InChI=") {
                return Ok(RawKey {
                    code: 3,
                    ..Default::default()
                });
            }
            Ok(RawKey {
                code: self.key_code,
                key: Self::fake_key(identifier),
                extensions: extensions.then(|| ("A".repeat(64), "B".repeat(64))),
            })
        }

        fn derive_standard_key(&self, identifier: &str) -> Result<RawKey, Error> {
            self.derive_key(identifier, false)
        }

        fn check_key(&self, key: &str) -> Result<i32, Error> {
            Ok(match InchiKey::parse(key) {
                Ok(_) => 0,
                Err(crate::codec::ParseKeyError::Length(_)) => 1,
                Err(_) => 2,
            })
        }

        fn check_identifier(&self, identifier: &str, strict: bool) -> Result<i32, Error> {
            Ok(if identifier.starts_with("InChI=1S/") {
                0
            } else if identifier.starts_with("InChI=1/") {
                if strict { 4 } else { -1 }
            } else if identifier.starts_with("InChI=") {
                2
            } else {
                1
            })
        }
    }

    fn make_carbonyl() -> Molecule {
        let mut mol = Molecule::new();
        let c = mol.add_atom(Atom::new("C", [0.0, 0.0, 0.0]));
        let o = mol.add_atom(Atom::new("O", [1.2, 0.0, 0.0]));
        mol.add_bond(Bond::plain(c, o, BondType::Double));
        mol
    }

    #[test]
    fn generate_returns_identifier_and_status() {
        let engine = InchiEngine::new(ScriptedBackend::default());
        let out = engine.generate(&make_carbonyl()).unwrap();
        assert_eq!(out.status, RetStatus::Okay);
        assert_eq!(out.identifier(), Some("InChI=1/C.O"));
    }

    #[test]
    fn generate_uses_standard_entry_point_when_configured() {
        let config = EngineConfig {
            standard: true,
            ..Default::default()
        };
        let engine = InchiEngine::with_config(ScriptedBackend::default(), config);
        let out = engine.generate(&make_carbonyl()).unwrap();
        assert_eq!(out.inchi, "InChI=1S/C.O");
    }

    #[test]
    fn generate_merges_configured_options() {
        let config = EngineConfig {
            options: vec![InchiOption::FixedH],
            ..Default::default()
        };
        let engine = InchiEngine::with_config(ScriptedBackend::default(), config);
        let mut mol = make_carbonyl();
        mol.options = "-SNon ".to_string();
        engine.generate(&mol).unwrap();

        let received = engine.backend().received_options.lock().unwrap();
        assert_eq!(received[0], format!("-SNon {FLAG_CHAR}FixedH "));
    }

    #[test]
    fn generate_passes_molecule_options_unchanged_without_config() {
        let engine = InchiEngine::new(ScriptedBackend::default());
        let mut mol = make_carbonyl();
        mol.options = "-Compress ".to_string();
        engine.generate(&mol).unwrap();
        let received = engine.backend().received_options.lock().unwrap();
        assert_eq!(received[0], "-Compress ");
    }

    #[test]
    fn library_failure_is_a_status_not_an_error() {
        let engine = InchiEngine::new(ScriptedBackend::with_codes(2, 0));
        let out = engine.generate(&make_carbonyl()).unwrap();
        assert_eq!(out.status, RetStatus::Error);
        assert_eq!(out.identifier(), None);
    }

    #[test]
    fn warning_status_keeps_identifier_and_message() {
        let engine = InchiEngine::new(ScriptedBackend::with_codes(1, 0));
        let out = engine.generate(&make_carbonyl()).unwrap();
        assert_eq!(out.status, RetStatus::Warning);
        assert_eq!(out.identifier(), Some("InChI=1/C.O"));
        assert_eq!(out.message, "Omitted undefined stereo");
    }

    #[test]
    fn unknown_return_code_is_an_error() {
        let engine = InchiEngine::new(ScriptedBackend::with_codes(17, 0));
        assert!(matches!(
            engine.generate(&make_carbonyl()),
            Err(Error::UnknownStatus { code: 17, .. })
        ));
    }

    #[test]
    fn invalid_molecule_fails_before_the_library_is_called() {
        let engine = InchiEngine::new(ScriptedBackend::default());
        let mut mol = make_carbonyl();
        mol.add_bond(Bond::plain(0, 5, BondType::Single));
        assert!(matches!(
            engine.generate(&mol),
            Err(Error::InvalidReference { .. })
        ));
        assert!(engine.backend().received_options.lock().unwrap().is_empty());
    }

    #[test]
    fn inchi_from_inchi_forwards_options() {
        let engine = InchiEngine::new(ScriptedBackend::default());
        let out = engine
            .inchi_from_inchi("InChI=1/C.O", "-FixedH ")
            .unwrap();
        assert_eq!(out.inchi, "InChI=1/C.O");
        let received = engine.backend().received_options.lock().unwrap();
        assert_eq!(received[0], "-FixedH ");
    }

    #[test]
    fn structure_from_inchi_rebuilds_molecule() {
        let engine = InchiEngine::new(ScriptedBackend::default());
        let out = engine.structure_from_inchi("InChI=1/C.C.C.C", "").unwrap();
        assert_eq!(out.status, RetStatus::Okay);
        assert_eq!(out.molecule.atom_count(), 4);
        assert_eq!(out.molecule.bond_count(), 3);
        assert_eq!(out.molecule.stereo_count(), 1);
        assert_eq!(out.molecule.stereo[0].central_atom, None);
        assert!(out.warning_flags.any());
        assert_eq!(out.warning_flags.get(1, 0), 2);
    }

    #[test]
    fn structure_from_inchi_reports_corrupt_records() {
        struct Corrupt;
        impl InchiBackend for Corrupt {
            fn generate(&self, _: &FlatRecord, _: bool) -> Result<RawOutput, Error> {
                unreachable!()
            }
            fn generate_from_identifier(&self, _: &IdentifierInput) -> Result<RawOutput, Error> {
                unreachable!()
            }
            fn generate_structure(&self, _: &IdentifierInput) -> Result<RawStructure, Error> {
                let mut record = flatten(&make_carbonyl())?;
                record.atoms[1].num_bonds = 0;
                Ok(RawStructure {
                    record,
                    ..Default::default()
                })
            }
            fn derive_key(&self, _: &str, _: bool) -> Result<RawKey, Error> {
                unreachable!()
            }
            fn derive_standard_key(&self, _: &str) -> Result<RawKey, Error> {
                unreachable!()
            }
            fn check_key(&self, _: &str) -> Result<i32, Error> {
                unreachable!()
            }
            fn check_identifier(&self, _: &str, _: bool) -> Result<i32, Error> {
                unreachable!()
            }
        }

        let engine = InchiEngine::new(Corrupt);
        assert!(matches!(
            engine.structure_from_inchi("InChI=1/C.O", ""),
            Err(Error::DataCorruption(_))
        ));
    }

    #[test]
    fn generated_keys_validate() {
        let engine = InchiEngine::new(ScriptedBackend::default());
        for identifier in ["InChI=1/Cl", "InChI=1/C2H4/c1-2/h1-2H2", "InChI=1S/CH4/h1H4"] {
            let out = engine.generate_key(identifier).unwrap();
            assert_eq!(out.status, KeyStatus::Ok);
            assert_eq!(engine.validate_key(&out.key).unwrap(), KeyCheckStatus::Valid);
            assert!(out.parsed().unwrap().is_ok());
        }
    }

    #[test]
    fn key_extensions_follow_config() {
        let plain = InchiEngine::new(ScriptedBackend::default());
        assert!(plain.generate_key("InChI=1/Cl").unwrap().extensions.is_none());

        let config = EngineConfig {
            key_extensions: true,
            ..Default::default()
        };
        let extended = InchiEngine::with_config(ScriptedBackend::default(), config);
        let (first, second) = extended
            .generate_key("InChI=1/Cl")
            .unwrap()
            .extensions
            .unwrap();
        assert_eq!(first.len(), 64);
        assert_eq!(second.len(), 64);
    }

    #[test]
    fn key_failure_statuses() {
        let engine = InchiEngine::new(ScriptedBackend::default());
        let out = engine.generate_key("not an identifier").unwrap();
        assert_eq!(out.status, KeyStatus::NotInchiInput);
        assert!(out.parsed().is_none());

        let broken = InchiEngine::new(ScriptedBackend::with_codes(0, 9));
        assert!(matches!(
            broken.generate_key("InChI=1/Cl"),
            Err(Error::UnknownStatus { kind: "key", code: 9 })
        ));
    }

    #[test]
    fn malformed_identifier_keeps_batch_going() {
        let engine = InchiEngine::new(ScriptedBackend::with_codes(0, 20));
        let identifiers = vec!["InChI=1/C2H6O/c1-2-3/h3H,2H2,1H3/x".to_string()];
        let keys = engine.keys_for(&identifiers);
        let key = keys[0].as_ref().unwrap();
        assert_eq!(key.status, KeyStatus::InvalidInchi);
        assert!(key.parsed().is_none());
    }

    #[test]
    fn validate_key_reports_layout_problems() {
        let engine = InchiEngine::new(ScriptedBackend::default());
        assert_eq!(
            engine.validate_key("LFQSCWFLJHTTHZ").unwrap(),
            KeyCheckStatus::InvalidLength
        );
        assert_eq!(
            engine.validate_key("LFQSCWFLJHTTHZUUHFFFAOYSA-N").unwrap(),
            KeyCheckStatus::InvalidLayout
        );
    }

    #[test]
    fn check_identifier_honours_strict_mode() {
        let lenient = InchiEngine::new(ScriptedBackend::default());
        assert_eq!(
            lenient.check_identifier("InChI=1/Cl").unwrap(),
            IdentifierStatus::ValidNonStandard
        );
        assert_eq!(
            lenient.check_identifier("InChI=1S/Cl").unwrap(),
            IdentifierStatus::ValidStandard
        );
        assert_eq!(
            lenient.check_identifier("Cl").unwrap(),
            IdentifierStatus::InvalidPrefix
        );

        let strict = InchiEngine::with_config(
            ScriptedBackend::default(),
            EngineConfig {
                strict_check: true,
                ..Default::default()
            },
        );
        assert_eq!(
            strict.check_identifier("InChI=1/Cl").unwrap(),
            IdentifierStatus::FailRoundTrip
        );
    }

    #[test]
    fn keys_for_preserves_input_order() {
        let engine = InchiEngine::new(ScriptedBackend::default());
        let identifiers: Vec<String> = (0..32).map(|k| format!("InChI=1/C{}", k)).collect();
        let keys = engine.keys_for(&identifiers);
        assert_eq!(keys.len(), identifiers.len());
        for (identifier, key) in identifiers.iter().zip(&keys) {
            let key = key.as_ref().unwrap();
            assert_eq!(key.key, ScriptedBackend::fake_key(identifier));
        }
    }

    #[test]
    fn concurrent_calls_do_not_interfere() {
        let engine = InchiEngine::new(ScriptedBackend::default());
        let elements = ["C", "N", "O", "S", "P", "F", "Cl", "Br"];

        std::thread::scope(|scope| {
            for (t, element) in elements.iter().enumerate() {
                let engine = &engine;
                scope.spawn(move || {
                    for round in 0..50 {
                        let mut mol = Molecule::new();
                        for k in 0..=(t + round % 3) {
                            mol.add_atom(Atom::new(*element, [k as f64, 0.0, 0.0]));
                        }
                        let n = mol.atom_count();
                        let out = engine.generate(&mol).unwrap();
                        let expected = vec![*element; n].join(".");
                        assert_eq!(out.inchi, format!("InChI=1/{}", expected));
                    }
                });
            }
        });
    }
}
