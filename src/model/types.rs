use std::fmt;

/// Radical state of an atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i8)]
pub enum Radical {
    #[default]
    None = 0,
    Singlet = 1,
    Doublet = 2,
    Triplet = 3,
}

impl Radical {
    pub fn value(self) -> i8 {
        self as i8
    }

    pub fn from_value(value: i8) -> Option<Self> {
        match value {
            0 => Some(Radical::None),
            1 => Some(Radical::Singlet),
            2 => Some(Radical::Doublet),
            3 => Some(Radical::Triplet),
            _ => None,
        }
    }
}

impl fmt::Display for Radical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Radical::None => write!(f, "None"),
            Radical::Singlet => write!(f, "Singlet"),
            Radical::Doublet => write!(f, "Doublet"),
            Radical::Triplet => write!(f, "Triplet"),
        }
    }
}


/// Bond order as understood by the identifier library.
///
/// `Altern` marks alternating (aromatic) bonds. `None` is only meaningful
/// for records produced by the library itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i8)]
pub enum BondType {
    None = 0,
    #[default]
    Single = 1,
    Double = 2,
    Triple = 3,
    Altern = 4,
}

impl BondType {
    pub fn value(self) -> i8 {
        self as i8
    }

    pub fn from_value(value: i8) -> Option<Self> {
        match value {
            0 => Some(BondType::None),
            1 => Some(BondType::Single),
            2 => Some(BondType::Double),
            3 => Some(BondType::Triple),
            4 => Some(BondType::Altern),
            _ => None,
        }
    }
}

impl fmt::Display for BondType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BondType::None => write!(f, "None"),
            BondType::Single => write!(f, "Single"),
            BondType::Double => write!(f, "Double"),
            BondType::Triple => write!(f, "Triple"),
            BondType::Altern => write!(f, "Alternating"),
        }
    }
}


/// Wedge/hash designation of a bond.
///
/// The `Single1*` variants place the stereo centre on the bond's origin,
/// the `Single2*` variants on its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i8)]
pub enum BondStereo {
    #[default]
    None = 0,
    Single1Up = 1,
    Single1Either = 4,
    Single1Down = 6,
    Single2Up = -1,
    Single2Either = -4,
    Single2Down = -6,
    DoubleEither = 3,
}

impl BondStereo {
    pub fn value(self) -> i8 {
        self as i8
    }

    pub fn from_value(value: i8) -> Option<Self> {
        match value {
            0 => Some(BondStereo::None),
            1 => Some(BondStereo::Single1Up),
            4 => Some(BondStereo::Single1Either),
            6 => Some(BondStereo::Single1Down),
            -1 => Some(BondStereo::Single2Up),
            -4 => Some(BondStereo::Single2Either),
            -6 => Some(BondStereo::Single2Down),
            3 => Some(BondStereo::DoubleEither),
            _ => None,
        }
    }
}

impl fmt::Display for BondStereo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BondStereo::None => "None",
            BondStereo::Single1Up => "Single1Up",
            BondStereo::Single1Either => "Single1Either",
            BondStereo::Single1Down => "Single1Down",
            BondStereo::Single2Up => "Single2Up",
            BondStereo::Single2Either => "Single2Either",
            BondStereo::Single2Down => "Single2Down",
            BondStereo::DoubleEither => "DoubleEither",
        };
        f.write_str(name)
    }
}


/// Geometry class of a 0D stereo descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i8)]
pub enum StereoType {
    #[default]
    None = 0,
    DoubleBond = 1,
    Tetrahedral = 2,
    Allene = 3,
}

impl StereoType {
    pub fn value(self) -> i8 {
        self as i8
    }

    pub fn from_value(value: i8) -> Option<Self> {
        match value {
            0 => Some(StereoType::None),
            1 => Some(StereoType::DoubleBond),
            2 => Some(StereoType::Tetrahedral),
            3 => Some(StereoType::Allene),
            _ => None,
        }
    }

    /// Whether descriptors of this type pivot on a central atom.
    #[inline]
    pub fn has_central_atom(self) -> bool {
        matches!(self, StereoType::Tetrahedral | StereoType::Allene)
    }
}

impl fmt::Display for StereoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StereoType::None => write!(f, "None"),
            StereoType::DoubleBond => write!(f, "DoubleBond"),
            StereoType::Tetrahedral => write!(f, "Tetrahedral"),
            StereoType::Allene => write!(f, "Allene"),
        }
    }
}


/// Parity of a 0D stereo descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i8)]
pub enum Parity {
    #[default]
    None = 0,
    Odd = 1,
    Even = 2,
    Unknown = 3,
    Undefined = 4,
}

impl Parity {
    pub fn value(self) -> i8 {
        self as i8
    }

    pub fn from_value(value: i8) -> Option<Self> {
        match value {
            0 => Some(Parity::None),
            1 => Some(Parity::Odd),
            2 => Some(Parity::Even),
            3 => Some(Parity::Unknown),
            4 => Some(Parity::Undefined),
            _ => None,
        }
    }
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parity::None => write!(f, "None"),
            Parity::Odd => write!(f, "Odd"),
            Parity::Even => write!(f, "Even"),
            Parity::Unknown => write!(f, "Unknown"),
            Parity::Undefined => write!(f, "Undefined"),
        }
    }
}
