use super::error::{Capacity, Error};
use super::limits::{MAX_ATOMS, MAX_ELEMENT_NAME_LEN, MAX_STEREO0D, MAXVAL};
use crate::model::molecule::Molecule;

/// Checks a molecule against the fixed limits of the flat record format.
///
/// Checks run in order and stop at the first violation: atom count, stereo
/// descriptor count, per-atom bond count, then element symbols. Nothing is
/// allocated for the flat record until this succeeds.
///
/// # Errors
///
/// * [`Error::CapacityExceeded`] for too many atoms, stereo descriptors, or
///   bonds on one atom
/// * [`Error::InvalidElementName`] for an empty symbol, a symbol with a nul
///   byte, or one longer than [`MAX_ELEMENT_NAME_LEN`] bytes
pub fn validate(molecule: &Molecule) -> Result<(), Error> {
    let n_atoms = molecule.atom_count();
    if n_atoms > MAX_ATOMS {
        return Err(Error::capacity(Capacity::Atoms, n_atoms, MAX_ATOMS));
    }

    let n_stereo = molecule.stereo_count();
    if n_stereo > MAX_STEREO0D {
        return Err(Error::capacity(Capacity::Stereo, n_stereo, MAX_STEREO0D));
    }

    for (atom, degree) in molecule.degrees().into_iter().enumerate() {
        if degree > MAXVAL {
            return Err(Error::capacity(Capacity::Bonds { atom }, degree, MAXVAL));
        }
    }

    for (idx, atom) in molecule.atoms.iter().enumerate() {
        check_element_name(idx, &atom.element)?;
    }

    Ok(())
}

fn check_element_name(atom: usize, name: &str) -> Result<(), Error> {
    if name.is_empty() {
        return Err(Error::invalid_element_name(atom, name, "symbol is empty"));
    }
    if name.len() > MAX_ELEMENT_NAME_LEN {
        return Err(Error::invalid_element_name(
            atom,
            name,
            format!(
                "symbol is {} bytes, maximum is {}",
                name.len(),
                MAX_ELEMENT_NAME_LEN
            ),
        ));
    }
    if name.bytes().any(|b| b == 0) {
        return Err(Error::invalid_element_name(atom, name, "symbol contains a nul byte"));
    }
    Ok(())
}
