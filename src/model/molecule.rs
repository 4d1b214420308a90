use super::atom::Atom;
use super::types::{BondStereo, BondType, Parity, StereoType};

/// A bond between two atoms, addressed by their index in [`Molecule::atoms`].
///
/// Bonds are undirected, but the origin/target order is kept because
/// [`BondStereo`] designations are relative to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    pub origin: usize,
    pub target: usize,
    pub bond_type: BondType,
    pub stereo: BondStereo,
}

impl Bond {
    pub fn new(origin: usize, target: usize, bond_type: BondType, stereo: BondStereo) -> Self {
        Self {
            origin,
            target,
            bond_type,
            stereo,
        }
    }

    pub fn plain(origin: usize, target: usize, bond_type: BondType) -> Self {
        Self::new(origin, target, bond_type, BondStereo::None)
    }

    /// Endpoints with the lower index first.
    #[inline]
    pub fn endpoints(&self) -> (usize, usize) {
        if self.origin <= self.target {
            (self.origin, self.target)
        } else {
            (self.target, self.origin)
        }
    }
}

/// A 0D stereo descriptor.
///
/// `central_atom` is `None` for descriptors that do not pivot on an atom,
/// such as double-bond stereo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Stereo0D {
    pub central_atom: Option<usize>,
    pub neighbors: [usize; 4],
    pub stereo_type: StereoType,
    pub parity: Parity,
}

impl Stereo0D {
    pub fn new(
        central_atom: Option<usize>,
        neighbors: [usize; 4],
        stereo_type: StereoType,
        parity: Parity,
    ) -> Self {
        Self {
            central_atom,
            neighbors,
            stereo_type,
            parity,
        }
    }

    pub fn tetrahedral(central_atom: usize, neighbors: [usize; 4], parity: Parity) -> Self {
        Self::new(
            Some(central_atom),
            neighbors,
            StereoType::Tetrahedral,
            parity,
        )
    }

    pub fn double_bond(neighbors: [usize; 4], parity: Parity) -> Self {
        Self::new(None, neighbors, StereoType::DoubleBond, parity)
    }

    pub fn allene(central_atom: usize, neighbors: [usize; 4], parity: Parity) -> Self {
        Self::new(Some(central_atom), neighbors, StereoType::Allene, parity)
    }

    /// All atom indices this descriptor refers to, central atom first when present.
    pub fn references(&self) -> impl Iterator<Item = usize> + '_ {
        self.central_atom.into_iter().chain(self.neighbors)
    }
}

/// Graph representation of a molecule.
///
/// Atoms are addressed by position; bonds and stereo descriptors refer to
/// atoms by that index. `options` carries library switches for structure
/// calls (see [`normalize_options`](crate::normalize_options)).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Molecule {
    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
    pub stereo: Vec<Stereo0D>,
    pub options: String,
}

impl Molecule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty molecule whose options are checked and canonicalised.
    pub fn with_options(options: &str) -> Result<Self, crate::Error> {
        Ok(Self {
            options: crate::normalize_options(options)?,
            ..Self::default()
        })
    }

    /// Appends an atom and returns its index.
    pub fn add_atom(&mut self, atom: Atom) -> usize {
        self.atoms.push(atom);
        self.atoms.len() - 1
    }

    pub fn add_bond(&mut self, bond: Bond) {
        self.bonds.push(bond);
    }

    pub fn add_stereo(&mut self, stereo: Stereo0D) {
        self.stereo.push(stereo);
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    #[inline]
    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    #[inline]
    pub fn stereo_count(&self) -> usize {
        self.stereo.len()
    }

    /// Number of bonds incident to each atom.
    ///
    /// Endpoints outside the atom list are ignored.
    pub fn degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0usize; self.atoms.len()];
        for bond in &self.bonds {
            for idx in [bond.origin, bond.target] {
                if let Some(d) = degrees.get_mut(idx) {
                    *d += 1;
                }
            }
        }
        degrees
    }
}
