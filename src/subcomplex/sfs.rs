// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Seifert fibred space invariants.

use std::fmt;

use crate::error::{KernelError, Result};

/// A Seifert fibred space described by its base orbifold, its exceptional
/// fibres and its obstruction constant.
///
/// Fibres are kept normalised as `(alpha, beta)` with `0 < beta < alpha`;
/// the integer parts of all fibres accumulate in the obstruction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SfsInvariants {
    base_orientable: bool,
    base_genus: u64,
    punctures: usize,
    reflectors: usize,
    fibre_reversing: bool,
    fibres: Vec<(u64, u64)>,
    obstruction: i64,
}

impl SfsInvariants {
    /// The space over a closed base of the given orientability and genus.
    pub fn new(base_orientable: bool, base_genus: u64) -> Self {
        Self {
            base_orientable,
            base_genus,
            ..Self::default()
        }
    }

    /// The space over the 2-sphere with no exceptional fibres.
    pub fn sphere() -> Self {
        Self::new(true, 0)
    }

    pub fn is_base_orientable(&self) -> bool {
        self.base_orientable
    }

    pub fn base_genus(&self) -> u64 {
        self.base_genus
    }

    pub fn punctures(&self) -> usize {
        self.punctures
    }

    pub fn reflectors(&self) -> usize {
        self.reflectors
    }

    /// Whether some loop in the base reverses the fibre direction.
    pub fn is_fibre_reversing(&self) -> bool {
        self.fibre_reversing
    }

    pub fn fibres(&self) -> &[(u64, u64)] {
        &self.fibres
    }

    pub fn obstruction(&self) -> i64 {
        self.obstruction
    }

    pub fn add_punctures(&mut self, count: usize) {
        self.punctures += count;
    }

    pub fn add_reflector(&mut self) {
        self.reflectors += 1;
    }

    pub fn set_fibre_reversing(&mut self, reversing: bool) {
        self.fibre_reversing = reversing;
    }

    /// Adds a fibre of type `(alpha, beta)`. Regular fibres (`alpha = 1`)
    /// only shift the obstruction.
    pub fn insert_fibre(&mut self, alpha: i64, beta: i64) -> Result<()> {
        if alpha == 0 {
            return Err(KernelError::invalid_argument("a fibre needs alpha != 0"));
        }
        let (alpha, beta) = if alpha < 0 { (-alpha, -beta) } else { (alpha, beta) };
        self.obstruction += beta.div_euclid(alpha);
        let rest = beta.rem_euclid(alpha);
        if rest != 0 {
            let fibre = (alpha.unsigned_abs(), rest.unsigned_abs());
            let at = self.fibres.partition_point(|f| *f < fibre);
            self.fibres.insert(at, fibre);
        }
        Ok(())
    }

    /// Reverses the orientation of every fibre: `beta/alpha` becomes
    /// `-beta/alpha`.
    pub fn reflect(&mut self) {
        let n = self.fibres.len() as i64;
        for f in &mut self.fibres {
            f.1 = f.0 - f.1;
        }
        self.fibres.sort_unstable();
        self.obstruction = -self.obstruction - n;
    }

    /// The name of the base surface, ignoring cone points.
    pub fn base_name(&self) -> String {
        let closed = match (self.base_orientable, self.base_genus) {
            (true, 0) => "S2".to_string(),
            (true, 1) => "T".to_string(),
            (true, g) => format!("#{} T", g),
            (false, 1) => "RP2".to_string(),
            (false, 2) => "KB".to_string(),
            (false, g) => format!("#{} RP2", g),
        };
        let mut name = match (closed.as_str(), self.punctures) {
            (_, 0) => closed,
            ("S2", 1) => "D".to_string(),
            ("S2", 2) => "A".to_string(),
            (_, p) => format!("{} - {} discs", closed, p),
        };
        if self.reflectors > 0 {
            name.push_str(&format!(" + {} reflectors", self.reflectors));
        }
        name
    }
}

impl fmt::Display for SfsInvariants {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = if self.fibre_reversing { "SFS~" } else { "SFS" };
        write!(f, "{} [{}:", prefix, self.base_name())?;
        for (a, b) in &self.fibres {
            write!(f, " ({},{})", a, b)?;
        }
        if self.obstruction != 0 || self.fibres.is_empty() {
            write!(f, " (1,{})", self.obstruction)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fibres_are_normalised() {
        let mut sfs = SfsInvariants::sphere();
        sfs.insert_fibre(3, 4).unwrap();
        sfs.insert_fibre(-2, 1).unwrap();
        sfs.insert_fibre(1, -1).unwrap();
        assert_eq!(sfs.fibres(), &[(2, 1), (3, 1)]);
        // 4/3 = 1 + 1/3, -1/2 = -1 + 1/2, then -1.
        assert_eq!(sfs.obstruction(), -1);
        assert_eq!(sfs.to_string(), "SFS [S2: (2,1) (3,1) (1,-1)]");
        assert!(sfs.insert_fibre(0, 1).is_err());
    }

    #[test]
    fn test_reflect_twice_is_identity() {
        let mut sfs = SfsInvariants::sphere();
        sfs.insert_fibre(5, 2).unwrap();
        sfs.insert_fibre(3, 1).unwrap();
        let before = sfs.clone();
        sfs.reflect();
        assert_eq!(sfs.fibres(), &[(3, 2), (5, 3)]);
        assert_eq!(sfs.obstruction(), -2);
        sfs.reflect();
        assert_eq!(sfs, before);
    }

    #[test]
    fn test_base_names() {
        let mut sfs = SfsInvariants::new(true, 0);
        sfs.add_punctures(1);
        assert_eq!(sfs.base_name(), "D");
        assert_eq!(SfsInvariants::new(false, 2).base_name(), "KB");
        assert_eq!(SfsInvariants::new(true, 3).base_name(), "#3 T");
        let mut bounded = SfsInvariants::new(true, 1);
        bounded.add_punctures(2);
        bounded.set_fibre_reversing(true);
        assert_eq!(bounded.to_string(), "SFS~ [T - 2 discs: (1,0)]");
    }
}
