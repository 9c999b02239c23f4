// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Normal coordinate systems and vector encodings.
//!
//! A [`NormalCoords`] names a coordinate system a user asks for. A
//! [`NormalEncoding`] describes how a vector is actually laid out in memory:
//! how many coordinates per tetrahedron and which disc types are present.
//! Encodings join under `+` to the simplest encoding that can hold a sum.

use std::fmt;
use std::ops::Add;

use strum_macros::{EnumCount as EnumCountMacro, EnumIter, IntoStaticStr};

use crate::error::{KernelError, Result};

/// Coordinate systems for normal and almost normal surfaces.
///
/// Each system carries a fixed integer tag used for persistence. Tags below
/// 10000 are reserved; extensions use tags from 10000 upwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumCountMacro, EnumIter, IntoStaticStr)]
pub enum NormalCoords {
    /// Triangles and quadrilaterals.
    Standard,
    /// Quadrilaterals only; spun normal surfaces are allowed.
    Quad,
    /// Quadrilaterals only, restricted to closed surfaces.
    QuadClosed,
    /// Triangles, quadrilaterals and octagons.
    AlmostNormal,
    /// The older almost normal layout; identical vectors to [`NormalCoords::AlmostNormal`].
    LegacyAlmostNormal,
    /// Quadrilaterals and octagons.
    QuadOct,
    /// Quadrilaterals and octagons, restricted to closed surfaces.
    QuadOctClosed,
    /// Edge weights; for viewing only.
    Edge,
    /// Normal arcs on each triangle; for viewing only.
    Arc,
    /// Angle structures.
    Angle,
}

/// The first tag available to extensions.
pub const FIRST_EXTENSION_TAG: u32 = 10000;

impl NormalCoords {
    pub fn tag(self) -> u32 {
        match self {
            NormalCoords::Standard => 0,
            NormalCoords::Quad => 1,
            NormalCoords::QuadClosed => 10,
            NormalCoords::AlmostNormal => 100,
            NormalCoords::QuadOct => 101,
            NormalCoords::QuadOctClosed => 110,
            NormalCoords::LegacyAlmostNormal => 200,
            NormalCoords::Edge => 300,
            NormalCoords::Arc => 301,
            NormalCoords::Angle => 400,
        }
    }

    pub fn from_tag(tag: u32) -> Result<Self> {
        use strum::IntoEnumIterator;
        NormalCoords::iter().find(|c| c.tag() == tag).ok_or_else(|| {
            if tag >= FIRST_EXTENSION_TAG {
                KernelError::invalid_argument(format!("coordinate system {} is an unregistered extension", tag))
            } else {
                KernelError::invalid_argument(format!("unknown coordinate system {}", tag))
            }
        })
    }

    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Whether surfaces can be enumerated in this system.
    pub fn is_enumerable(self) -> bool {
        !matches!(self, NormalCoords::Edge | NormalCoords::Arc | NormalCoords::Angle)
    }

    /// Whether this system stores octagons.
    pub fn is_almost_normal(self) -> bool {
        matches!(
            self,
            NormalCoords::AlmostNormal
                | NormalCoords::LegacyAlmostNormal
                | NormalCoords::QuadOct
                | NormalCoords::QuadOctClosed
        )
    }

    /// Whether vertex surfaces here are computed in a reduced space and then
    /// lifted back to triangles.
    pub fn is_reduced(self) -> bool {
        matches!(
            self,
            NormalCoords::Quad | NormalCoords::QuadClosed | NormalCoords::QuadOct | NormalCoords::QuadOctClosed
        )
    }

    /// Whether enumeration excludes spun normal surfaces.
    pub fn is_closed_only(self) -> bool {
        matches!(self, NormalCoords::QuadClosed | NormalCoords::QuadOctClosed)
    }
}

impl fmt::Display for NormalCoords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

const SIZE_MASK: u32 = 0x000F;
const STORES_TRIANGLES: u32 = 0x0010;
const STORES_OCTAGONS: u32 = 0x0020;
const STORES_ANGLES: u32 = 0x0040;
const COULD_BE_VERTEX_LINK: u32 = 0x0100;
const COULD_BE_NON_COMPACT: u32 = 0x0200;
const INVALID: u32 = 0x2000;
const ALL_FLAGS: u32 =
    SIZE_MASK | STORES_TRIANGLES | STORES_OCTAGONS | STORES_ANGLES | COULD_BE_VERTEX_LINK | COULD_BE_NON_COMPACT | INVALID;

/// How a vector of normal coordinates is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NormalEncoding {
    flags: u32,
}

impl NormalEncoding {
    /// The encoding used to store vectors of the given coordinate system.
    /// Viewing-only systems give an invalid encoding.
    pub fn new(coords: NormalCoords) -> Self {
        let flags = match coords {
            NormalCoords::Standard => 7 | STORES_TRIANGLES | COULD_BE_VERTEX_LINK,
            NormalCoords::AlmostNormal | NormalCoords::LegacyAlmostNormal => {
                10 | STORES_TRIANGLES | STORES_OCTAGONS | COULD_BE_VERTEX_LINK
            }
            NormalCoords::Quad => 3 | COULD_BE_NON_COMPACT,
            NormalCoords::QuadClosed => 3,
            NormalCoords::QuadOct => 6 | STORES_OCTAGONS | COULD_BE_NON_COMPACT,
            NormalCoords::QuadOctClosed => 6 | STORES_OCTAGONS,
            NormalCoords::Angle => 3 | STORES_ANGLES,
            NormalCoords::Edge | NormalCoords::Arc => INVALID,
        };
        Self { flags }
    }

    /// An encoding with no coordinates and no flags; `empty() + e == e`.
    pub fn empty() -> Self {
        Self { flags: 0 }
    }

    /// Coordinates per tetrahedron.
    pub fn block(&self) -> usize {
        (self.flags & SIZE_MASK) as usize
    }

    pub fn stores_triangles(&self) -> bool {
        self.flags & STORES_TRIANGLES != 0
    }

    pub fn stores_octagons(&self) -> bool {
        self.flags & STORES_OCTAGONS != 0
    }

    pub fn stores_angles(&self) -> bool {
        self.flags & STORES_ANGLES != 0
    }

    pub fn could_be_vertex_link(&self) -> bool {
        self.flags & COULD_BE_VERTEX_LINK != 0
    }

    pub fn could_be_non_compact(&self) -> bool {
        self.flags & COULD_BE_NON_COMPACT != 0
    }

    pub fn is_valid(&self) -> bool {
        self.flags & INVALID == 0
    }

    /// The same encoding with triangle coordinates added.
    pub fn with_triangles(self) -> Self {
        Self::from_flags((self.flags & !SIZE_MASK) | STORES_TRIANGLES)
    }

    /// The same encoding with octagon coordinates added.
    pub fn with_octagons(self) -> Self {
        Self::from_flags((self.flags & !SIZE_MASK) | STORES_OCTAGONS)
    }

    /// Offset of the first octagon coordinate within a block.
    pub(crate) fn oct_offset(&self) -> usize {
        if self.stores_triangles() {
            7
        } else {
            3
        }
    }

    /// Offset of the first quadrilateral coordinate within a block.
    pub(crate) fn quad_offset(&self) -> usize {
        if self.stores_triangles() {
            4
        } else {
            0
        }
    }

    /// Rebuilds the block size from the storage flags.
    fn from_flags(flags: u32) -> Self {
        let flags = flags & !SIZE_MASK;
        let size = if flags & STORES_ANGLES != 0 {
            if flags & (STORES_TRIANGLES | STORES_OCTAGONS) != 0 {
                return Self {
                    flags: flags | INVALID | 10,
                };
            }
            3
        } else if flags & INVALID != 0 && flags & (STORES_TRIANGLES | STORES_OCTAGONS) == 0 {
            0
        } else {
            3 + if flags & STORES_TRIANGLES != 0 { 4 } else { 0 } + if flags & STORES_OCTAGONS != 0 { 3 } else { 0 }
        };
        Self { flags: flags | size }
    }

    /// The integer form used for persistence.
    pub fn int_value(&self) -> u32 {
        self.flags
    }

    pub fn from_int_value(value: u32) -> Result<Self> {
        if value & !ALL_FLAGS != 0 {
            return Err(KernelError::invalid_input(format!("unknown encoding flags {:#x}", value)));
        }
        let enc = Self::from_flags(value);
        if enc.flags != value {
            return Err(KernelError::invalid_input(format!(
                "encoding {:#x} has block size {} but its flags need {}",
                value,
                value & SIZE_MASK,
                enc.block()
            )));
        }
        Ok(enc)
    }
}

impl Add for NormalEncoding {
    type Output = NormalEncoding;

    fn add(self, rhs: NormalEncoding) -> NormalEncoding {
        if self.flags == 0 {
            return rhs;
        }
        if rhs.flags == 0 {
            return self;
        }
        let mut flags = (self.flags | rhs.flags) & !SIZE_MASK;
        if self.stores_angles() != rhs.stores_angles() {
            flags |= INVALID;
        }
        let joined = Self::from_flags(flags);
        let block = joined.block().max(self.block()).max(rhs.block());
        if block != joined.block() {
            return Self {
                flags: (joined.flags & !SIZE_MASK) | INVALID | block as u32,
            };
        }
        joined
    }
}

impl From<NormalCoords> for NormalEncoding {
    fn from(coords: NormalCoords) -> Self {
        NormalEncoding::new(coords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use strum::{EnumCount, IntoEnumIterator};

    #[test]
    fn test_tags_round_trip() {
        assert_eq!(NormalCoords::COUNT, 10);
        for c in NormalCoords::iter() {
            assert_eq!(NormalCoords::from_tag(c.tag()).unwrap(), c);
        }
        assert!(NormalCoords::from_tag(5).is_err());
        assert!(NormalCoords::from_tag(10001).is_err());
    }

    #[test]
    fn test_blocks() {
        assert_eq!(NormalEncoding::new(NormalCoords::Standard).block(), 7);
        assert_eq!(NormalEncoding::new(NormalCoords::AlmostNormal).block(), 10);
        assert_eq!(NormalEncoding::new(NormalCoords::Quad).block(), 3);
        assert_eq!(NormalEncoding::new(NormalCoords::QuadOct).block(), 6);
        assert!(!NormalEncoding::new(NormalCoords::Edge).is_valid());
        let lifted = NormalEncoding::new(NormalCoords::Quad).with_triangles();
        assert_eq!(lifted.block(), 7);
        assert!(lifted.could_be_non_compact());
    }

    #[test]
    fn test_join() {
        let std = NormalEncoding::new(NormalCoords::Standard);
        let qo = NormalEncoding::new(NormalCoords::QuadOct);
        let sum = std + qo;
        assert_eq!(sum.block(), 10);
        assert!(sum.stores_triangles() && sum.stores_octagons() && sum.is_valid());
        assert!(!(std + NormalEncoding::new(NormalCoords::Angle)).is_valid());
        assert_eq!(NormalEncoding::empty() + std, std);
    }

    #[test]
    fn test_int_value() {
        for c in NormalCoords::iter() {
            let e = NormalEncoding::new(c);
            assert_eq!(NormalEncoding::from_int_value(e.int_value()).unwrap(), e);
        }
        assert!(NormalEncoding::from_int_value(0x10 | 3).is_err());
        assert!(NormalEncoding::from_int_value(0x8000).is_err());
    }

    fn any_encoding() -> impl Strategy<Value = NormalEncoding> {
        (0..NormalCoords::COUNT).prop_map(|i| {
            NormalCoords::iter()
                .nth(i)
                .map(NormalEncoding::new)
                .unwrap_or_else(NormalEncoding::empty)
        })
    }

    proptest! {
        #[test]
        fn prop_join_dominates(a in any_encoding(), b in any_encoding()) {
            let s = a + b;
            prop_assert!(s.block() >= a.block().max(b.block()));
            prop_assert!(s.stores_triangles() >= (a.stores_triangles() || b.stores_triangles()));
            prop_assert!(s.stores_octagons() >= (a.stores_octagons() || b.stores_octagons()));
            prop_assert!(s.stores_angles() >= (a.stores_angles() || b.stores_angles()));
            prop_assert!(s.could_be_vertex_link() >= (a.could_be_vertex_link() || b.could_be_vertex_link()));
            prop_assert!(s.could_be_non_compact() >= (a.could_be_non_compact() || b.could_be_non_compact()));
            prop_assert_eq!(s, b + a);
        }
    }
}
