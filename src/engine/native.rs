//! Backend that calls a system-installed `libinchi`.
//!
//! Input structs point into call-local copies of the flat record. Output
//! structs are owned by the library until the matching free function runs;
//! `OutputGuard` and `StructGuard` run it on drop, after the contents have
//! been copied into Rust values.

use std::ffi::{CStr, CString, c_char, c_int, c_ulong};
use std::ptr;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::trace;

use super::backend::{IdentifierInput, InchiBackend, RawKey, RawOutput, RawStructure};
use crate::codec::{
    Capacity, Error, FlatAtom, FlatRecord, FlatStereo, KEY_BUFFER_LEN, KEY_EXTENSION_BUFFER_LEN,
    MAX_ATOMS, MAX_STEREO0D, OptionsBuffer,
};

#[repr(C)]
struct InchiInput {
    atom: *mut FlatAtom,
    stereo0d: *mut FlatStereo,
    options: *mut c_char,
    num_atoms: i16,
    num_stereo0d: i16,
}

#[repr(C)]
struct InchiOutput {
    inchi: *mut c_char,
    aux_info: *mut c_char,
    message: *mut c_char,
    log: *mut c_char,
}

#[repr(C)]
struct InchiInputInchi {
    inchi: *mut c_char,
    options: *mut c_char,
}

#[repr(C)]
struct InchiOutputStruct {
    atom: *mut FlatAtom,
    stereo0d: *mut FlatStereo,
    num_atoms: i16,
    num_stereo0d: i16,
    message: *mut c_char,
    log: *mut c_char,
    warning_flags: [[c_ulong; 2]; 2],
}

// Field offsets of the `inchi_api.h` structs on the current target.
const _: () = {
    use std::mem::{offset_of, size_of};
    const PTR: usize = size_of::<*mut c_char>();

    assert!(offset_of!(InchiInput, num_atoms) == 3 * PTR);
    assert!(offset_of!(InchiInput, num_stereo0d) == 3 * PTR + 2);
    assert!(size_of::<InchiInput>() == 4 * PTR);

    assert!(size_of::<InchiOutput>() == 4 * PTR);
    assert!(size_of::<InchiInputInchi>() == 2 * PTR);

    assert!(offset_of!(InchiOutputStruct, num_atoms) == 2 * PTR);
    assert!(offset_of!(InchiOutputStruct, message) == 3 * PTR);
    assert!(offset_of!(InchiOutputStruct, warning_flags) == 5 * PTR);
    assert!(size_of::<InchiOutputStruct>() == 5 * PTR + 4 * size_of::<c_ulong>());
};

#[link(name = "inchi")]
unsafe extern "C" {
    fn GetINCHI(input: *mut InchiInput, output: *mut InchiOutput) -> c_int;
    fn FreeINCHI(output: *mut InchiOutput);
    fn GetStdINCHI(input: *mut InchiInput, output: *mut InchiOutput) -> c_int;
    fn FreeStdINCHI(output: *mut InchiOutput);
    fn GetINCHIfromINCHI(input: *mut InchiInputInchi, output: *mut InchiOutput) -> c_int;
    fn GetStructFromINCHI(input: *mut InchiInputInchi, output: *mut InchiOutputStruct) -> c_int;
    fn FreeStructFromINCHI(output: *mut InchiOutputStruct);
    fn GetINCHIKeyFromINCHI(
        source: *const c_char,
        xtra1: c_int,
        xtra2: c_int,
        key: *mut c_char,
        extension1: *mut c_char,
        extension2: *mut c_char,
    ) -> c_int;
    fn GetStdINCHIKeyFromStdINCHI(source: *const c_char, key: *mut c_char) -> c_int;
    fn CheckINCHIKey(key: *const c_char) -> c_int;
    fn CheckINCHI(inchi: *const c_char, strict: c_int) -> c_int;
}

// Held around every library call when the backend is serialized.
static LIBRARY_LOCK: Mutex<()> = Mutex::new(());

/// [`InchiBackend`] linked against the system `libinchi`.
///
/// Library builds older than 1.04 keep global state; use
/// [`LibInchi::serialized`] with those so only one call runs at a time.
#[derive(Debug, Clone, Copy, Default)]
pub struct LibInchi {
    serialize: bool,
}

impl LibInchi {
    /// Calls the library directly from every thread.
    pub fn new() -> Self {
        Self { serialize: false }
    }

    /// Funnels all calls from all `LibInchi` values through one process-wide lock.
    pub fn serialized() -> Self {
        Self { serialize: true }
    }

    fn enter(&self) -> Option<MutexGuard<'static, ()>> {
        self.serialize
            .then(|| LIBRARY_LOCK.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

struct OutputGuard {
    raw: InchiOutput,
    free: unsafe extern "C" fn(*mut InchiOutput),
}

impl OutputGuard {
    fn new(free: unsafe extern "C" fn(*mut InchiOutput)) -> Self {
        Self {
            raw: InchiOutput {
                inchi: ptr::null_mut(),
                aux_info: ptr::null_mut(),
                message: ptr::null_mut(),
                log: ptr::null_mut(),
            },
            free,
        }
    }

    /// # Safety
    ///
    /// The output must have been filled by the library (or left null).
    unsafe fn copy(&self, code: c_int) -> RawOutput {
        unsafe {
            RawOutput {
                code,
                inchi: owned_string(self.raw.inchi),
                aux_info: owned_string(self.raw.aux_info),
                message: owned_string(self.raw.message),
                log: owned_string(self.raw.log),
            }
        }
    }
}

impl Drop for OutputGuard {
    fn drop(&mut self) {
        unsafe { (self.free)(&mut self.raw) }
    }
}

struct StructGuard {
    raw: InchiOutputStruct,
}

impl StructGuard {
    fn new() -> Self {
        Self {
            raw: InchiOutputStruct {
                atom: ptr::null_mut(),
                stereo0d: ptr::null_mut(),
                num_atoms: 0,
                num_stereo0d: 0,
                message: ptr::null_mut(),
                log: ptr::null_mut(),
                warning_flags: [[0; 2]; 2],
            },
        }
    }

    /// # Safety
    ///
    /// The output must have been filled by the library (or left zeroed).
    unsafe fn copy(&self, code: c_int) -> Result<RawStructure, Error> {
        let atoms = unsafe { copy_array(self.raw.atom, self.raw.num_atoms, "atom")? };
        let stereo = unsafe { copy_array(self.raw.stereo0d, self.raw.num_stereo0d, "stereo")? };
        let flags = self.raw.warning_flags;

        Ok(RawStructure {
            code,
            record: FlatRecord {
                atoms,
                stereo,
                options: OptionsBuffer::empty(),
            },
            message: unsafe { owned_string(self.raw.message) },
            log: unsafe { owned_string(self.raw.log) },
            warning_flags: [
                [u64::from(flags[0][0]), u64::from(flags[0][1])],
                [u64::from(flags[1][0]), u64::from(flags[1][1])],
            ],
        })
    }
}

impl Drop for StructGuard {
    fn drop(&mut self) {
        unsafe { FreeStructFromINCHI(&mut self.raw) }
    }
}

/// # Safety
///
/// `ptr` must be null or point to a nul-terminated string.
unsafe fn owned_string(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
}

/// # Safety
///
/// `ptr` must be null or point to at least `len` initialised values.
unsafe fn copy_array<T: Copy>(ptr: *const T, len: i16, what: &str) -> Result<Vec<T>, Error> {
    let len = usize::try_from(len)
        .map_err(|_| Error::corruption(format!("negative {} count {}", what, len)))?;
    if len == 0 {
        return Ok(Vec::new());
    }
    if ptr.is_null() {
        return Err(Error::corruption(format!(
            "{} {} entries reported but no array returned",
            len, what
        )));
    }
    Ok(unsafe { std::slice::from_raw_parts(ptr, len) }.to_vec())
}

fn buffer_string(buf: &[u8]) -> String {
    match CStr::from_bytes_until_nul(buf) {
        Ok(s) => s.to_string_lossy().into_owned(),
        Err(_) => String::from_utf8_lossy(buf).into_owned(),
    }
}

fn c_string(s: &str) -> Result<CString, Error> {
    Ok(CString::new(s)?)
}

fn count(len: usize, limit: usize, what: Capacity) -> Result<i16, Error> {
    i16::try_from(len).map_err(|_| Error::capacity(what, len, limit))
}

impl InchiBackend for LibInchi {
    fn generate(&self, record: &FlatRecord, standard: bool) -> Result<RawOutput, Error> {
        let num_atoms = count(record.num_atoms(), MAX_ATOMS, Capacity::Atoms)?;
        let num_stereo = count(record.num_stereo(), MAX_STEREO0D, Capacity::Stereo)?;

        let mut atoms = record.atoms.clone();
        let mut stereo = record.stereo.clone();
        let mut options = record.options.as_c_str().to_bytes_with_nul().to_vec();
        let mut input = InchiInput {
            atom: atoms.as_mut_ptr(),
            stereo0d: stereo.as_mut_ptr(),
            options: options.as_mut_ptr().cast(),
            num_atoms,
            num_stereo0d: num_stereo,
        };

        let _serial = self.enter();
        let (call, free): (
            unsafe extern "C" fn(*mut InchiInput, *mut InchiOutput) -> c_int,
            unsafe extern "C" fn(*mut InchiOutput),
        ) = if standard {
            (GetStdINCHI, FreeStdINCHI)
        } else {
            (GetINCHI, FreeINCHI)
        };
        let mut guard = OutputGuard::new(free);
        let code = unsafe { call(&mut input, &mut guard.raw) };
        trace!(code, standard, "GetINCHI returned");
        Ok(unsafe { guard.copy(code) })
    }

    fn generate_from_identifier(&self, input: &IdentifierInput) -> Result<RawOutput, Error> {
        let identifier = c_string(&input.identifier)?;
        let mut identifier = identifier.into_bytes_with_nul();
        let mut options = input.options.as_c_str().to_bytes_with_nul().to_vec();
        let mut raw_input = InchiInputInchi {
            inchi: identifier.as_mut_ptr().cast(),
            options: options.as_mut_ptr().cast(),
        };

        let _serial = self.enter();
        let mut guard = OutputGuard::new(FreeINCHI);
        let code = unsafe { GetINCHIfromINCHI(&mut raw_input, &mut guard.raw) };
        trace!(code, "GetINCHIfromINCHI returned");
        Ok(unsafe { guard.copy(code) })
    }

    fn generate_structure(&self, input: &IdentifierInput) -> Result<RawStructure, Error> {
        let identifier = c_string(&input.identifier)?;
        let mut identifier = identifier.into_bytes_with_nul();
        let mut options = input.options.as_c_str().to_bytes_with_nul().to_vec();
        let mut raw_input = InchiInputInchi {
            inchi: identifier.as_mut_ptr().cast(),
            options: options.as_mut_ptr().cast(),
        };

        let _serial = self.enter();
        let mut guard = StructGuard::new();
        let code = unsafe { GetStructFromINCHI(&mut raw_input, &mut guard.raw) };
        trace!(code, "GetStructFromINCHI returned");
        unsafe { guard.copy(code) }
    }

    fn derive_key(&self, identifier: &str, extensions: bool) -> Result<RawKey, Error> {
        let source = c_string(identifier)?;
        let mut key = [0u8; KEY_BUFFER_LEN];
        let mut extension1 = [0u8; KEY_EXTENSION_BUFFER_LEN];
        let mut extension2 = [0u8; KEY_EXTENSION_BUFFER_LEN];
        let xtra = c_int::from(extensions);

        let _serial = self.enter();
        let code = unsafe {
            GetINCHIKeyFromINCHI(
                source.as_ptr(),
                xtra,
                xtra,
                key.as_mut_ptr().cast(),
                extension1.as_mut_ptr().cast(),
                extension2.as_mut_ptr().cast(),
            )
        };
        trace!(code, extensions, "GetINCHIKeyFromINCHI returned");

        Ok(RawKey {
            code,
            key: buffer_string(&key),
            extensions: (extensions && code == 0)
                .then(|| (buffer_string(&extension1), buffer_string(&extension2))),
        })
    }

    fn derive_standard_key(&self, identifier: &str) -> Result<RawKey, Error> {
        let source = c_string(identifier)?;
        let mut key = [0u8; KEY_BUFFER_LEN];

        let _serial = self.enter();
        let code = unsafe { GetStdINCHIKeyFromStdINCHI(source.as_ptr(), key.as_mut_ptr().cast()) };
        trace!(code, "GetStdINCHIKeyFromStdINCHI returned");

        Ok(RawKey {
            code,
            key: buffer_string(&key),
            extensions: None,
        })
    }

    fn check_key(&self, key: &str) -> Result<i32, Error> {
        let key = c_string(key)?;
        let _serial = self.enter();
        Ok(unsafe { CheckINCHIKey(key.as_ptr()) })
    }

    fn check_identifier(&self, identifier: &str, strict: bool) -> Result<i32, Error> {
        let identifier = c_string(identifier)?;
        let _serial = self.enter();
        Ok(unsafe { CheckINCHI(identifier.as_ptr(), c_int::from(strict)) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::flatten;
    use crate::model::atom::{Atom, ImplicitHydrogens};
    use crate::model::molecule::{Bond, Molecule};
    use crate::model::types::BondType;

    const ETHANOL: &str = "InChI=1S/C2H6O/c1-2-3/h3H,2H2,1H3";
    const ETHANOL_KEY: &str = "LFQSCWFLJHTTHZ-UHFFFAOYSA-N";

    #[test]
    fn buffer_string_stops_at_terminator() {
        assert_eq!(buffer_string(b"ABC\0DEF"), "ABC");
        assert_eq!(buffer_string(b"ABC"), "ABC");
        assert_eq!(buffer_string(&[0u8; 4]), "");
    }

    #[test]
    fn copy_array_rejects_missing_buffer() {
        let ptr: *const FlatAtom = ptr::null();
        assert!(unsafe { copy_array(ptr, 0, "atom") }.unwrap().is_empty());
        assert!(matches!(
            unsafe { copy_array(ptr, 2, "atom") },
            Err(Error::DataCorruption(_))
        ));
        assert!(matches!(
            unsafe { copy_array(ptr, -1, "atom") },
            Err(Error::DataCorruption(_))
        ));
    }

    fn make_ethanol() -> FlatRecord {
        let auto = ImplicitHydrogens::new(ImplicitHydrogens::AUTO);
        let mut molecule = Molecule::new();
        let c1 = molecule.add_atom(Atom::new("C", [0.000, 0.000, 0.000]).with_implicit_h(auto));
        let c2 = molecule.add_atom(Atom::new("C", [1.512, 0.000, 0.000]).with_implicit_h(auto));
        let o = molecule.add_atom(Atom::new("O", [2.016, 1.347, 0.000]).with_implicit_h(auto));
        molecule.add_bond(Bond::plain(c1, c2, BondType::Single));
        molecule.add_bond(Bond::plain(c2, o, BondType::Single));
        flatten(&molecule).unwrap()
    }

    #[test]
    fn generates_standard_identifier_for_ethanol() {
        let raw = LibInchi::new().generate(&make_ethanol(), true).unwrap();
        assert_eq!(raw.code, 0, "message: {}", raw.message);
        assert_eq!(raw.inchi, ETHANOL);
        assert!(raw.aux_info.starts_with("AuxInfo="));
    }

    #[test]
    fn general_entry_point_without_options_gives_standard_identifier() {
        let raw = LibInchi::serialized()
            .generate(&make_ethanol(), false)
            .unwrap();
        assert_eq!(raw.code, 0, "message: {}", raw.message);
        assert_eq!(raw.inchi, ETHANOL);
    }

    #[test]
    fn derives_standard_key_for_ethanol() {
        let raw = LibInchi::new().derive_standard_key(ETHANOL).unwrap();
        assert_eq!(raw.code, 0);
        assert_eq!(raw.key, ETHANOL_KEY);
    }

    #[test]
    fn checks_known_key() {
        assert_eq!(LibInchi::serialized().check_key(ETHANOL_KEY).unwrap(), 0);
        assert_ne!(LibInchi::new().check_key("LFQSCWFLJHTTHZ").unwrap(), 0);
    }

    #[test]
    fn rebuilds_ethylene_structure() {
        let input = IdentifierInput::new("InChI=1S/C2H4/c1-2/h1-2H2", "").unwrap();
        let raw = LibInchi::new().generate_structure(&input).unwrap();
        assert_eq!(raw.code, 0);
        let carbons = raw
            .record
            .atoms
            .iter()
            .filter(|a| a.element_bytes() == b"C")
            .count();
        assert_eq!(carbons, 2);
    }
}
