use super::types::Radical;

/// Offset added to a mass shift so the library can tell it apart from an absolute mass.
pub const ISOTOPIC_SHIFT_FLAG: i16 = 10000;

/// Largest mass shift (in either direction) the library accepts.
pub const ISOTOPIC_SHIFT_MAX: i16 = 100;

/// Implicit hydrogen counts attached to an atom.
///
/// `h` may be `-1`, which asks the library to add implicit hydrogens itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ImplicitHydrogens {
    pub h: i8,
    pub protium: i8,
    pub deuterium: i8,
    pub tritium: i8,
}

impl ImplicitHydrogens {
    /// Sentinel for [`h`](Self::h) that defers hydrogen perception to the library.
    pub const AUTO: i8 = -1;

    pub fn new(h: i8) -> Self {
        Self {
            h,
            ..Self::default()
        }
    }

    #[inline]
    pub fn to_array(self) -> [i8; 4] {
        [self.h, self.protium, self.deuterium, self.tritium]
    }

    #[inline]
    pub fn from_array(counts: [i8; 4]) -> Self {
        Self {
            h: counts[0],
            protium: counts[1],
            deuterium: counts[2],
            tritium: counts[3],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub element: String,
    pub position: [f64; 3],
    pub isotopic_mass: i16,
    pub radical: Radical,
    pub charge: i8,
    pub implicit_h: ImplicitHydrogens,
}

impl Atom {
    pub fn new(element: impl Into<String>, position: [f64; 3]) -> Self {
        Self {
            element: element.into(),
            position,
            isotopic_mass: 0,
            radical: Radical::None,
            charge: 0,
            implicit_h: ImplicitHydrogens::default(),
        }
    }

    pub fn with_charge(mut self, charge: i8) -> Self {
        self.charge = charge;
        self
    }

    pub fn with_radical(mut self, radical: Radical) -> Self {
        self.radical = radical;
        self
    }

    pub fn with_isotopic_mass(mut self, mass: i16) -> Self {
        self.isotopic_mass = mass;
        self
    }

    pub fn with_implicit_h(mut self, implicit_h: ImplicitHydrogens) -> Self {
        self.implicit_h = implicit_h;
        self
    }

    /// Records a mass shift relative to the most abundant isotope.
    pub fn set_isotopic_mass_shift(&mut self, shift: i16) {
        self.isotopic_mass = ISOTOPIC_SHIFT_FLAG.saturating_add(shift);
    }

    /// Returns the mass shift if [`isotopic_mass`](Self::isotopic_mass) uses the shift encoding.
    pub fn isotopic_mass_shift(&self) -> Option<i16> {
        let shift = i32::from(self.isotopic_mass) - i32::from(ISOTOPIC_SHIFT_FLAG);
        let max = i32::from(ISOTOPIC_SHIFT_MAX);
        (-max..=max).contains(&shift).then_some(shift as i16)
    }

    #[inline]
    pub fn is_isotopic(&self) -> bool {
        self.isotopic_mass != 0
    }
}
