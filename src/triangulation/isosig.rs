// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Isomorphism signatures.
//!
//! Each connected component is relabelled breadth first from every starting
//! tetrahedron and every vertex labelling of it. A new tetrahedron reached
//! across a face is labelled so that the gluing reads as the identity. The
//! labelling is written out as
//!
//! 1. the size `n`, as a digit count followed by that many digits,
//! 2. one action per face not already glued, in scan order, packed three
//!    per character: 0 boundary, 1 existing tetrahedron, 2 new tetrahedron,
//! 3. for each action 1, the destination tetrahedron and gluing index.
//!
//! The component signature is the smallest string over all starts, and the
//! signature of the triangulation concatenates component signatures in
//! sorted order. Digits are base 64 over `a-z A-Z 0-9 + -`.

use itertools::Itertools;

use super::isomorphism::Isomorphism;
use super::triangulation::Triangulation;
use crate::error::{KernelError, Result};
use crate::maths::Perm4;

const ALPHABET: &[u8; 64] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789+-";

fn sig_char(value: usize) -> char {
    ALPHABET[value] as char
}

fn sig_value(c: u8) -> Option<usize> {
    ALPHABET.iter().position(|&a| a == c)
}

/// Number of base-64 digits needed for values below `n`, at least one.
fn digits_for(n: usize) -> usize {
    let mut digits = 1;
    let mut cap = 64usize;
    while cap <= n {
        digits += 1;
        cap = cap.saturating_mul(64);
    }
    digits
}

fn push_digits(out: &mut String, mut value: usize, digits: usize) {
    for _ in 0..digits {
        out.push(sig_char(value % 64));
        value /= 64;
    }
}

/// One labelling of a component: the signature and the relabelling of its
/// tetrahedra into `0..size`.
struct Labelling {
    sig: String,
    image: Vec<(usize, usize, Perm4)>,
}

fn label_from(tri: &Triangulation, size: usize, start: usize, perm: Perm4) -> Labelling {
    let mut image = vec![usize::MAX; tri.size()];
    let mut perms = vec![Perm4::identity(); tri.size()];
    let mut order = vec![start];
    image[start] = 0;
    perms[start] = perm;

    let mut actions: Vec<usize> = Vec::with_capacity(2 * size + 2);
    let mut joins: Vec<(usize, usize)> = Vec::new();
    let mut i = 0;
    while i < order.len() {
        let t = order[i];
        for face in 0..4 {
            let f = perms[t].pre_image(face);
            match tri.adjacent(t, f) {
                None => actions.push(0),
                Some((u, g)) => {
                    if image[u] == usize::MAX {
                        image[u] = order.len();
                        perms[u] = perms[t] * g.inverse();
                        order.push(u);
                        actions.push(2);
                    } else {
                        let partner = (image[u], perms[u].apply(g.apply(f)));
                        if partner < (i, face) {
                            continue;
                        }
                        actions.push(1);
                        joins.push((image[u], (perms[u] * g * perms[t].inverse()).index()));
                    }
                }
            }
        }
        i += 1;
    }

    let digits = digits_for(size);
    let mut sig = String::new();
    sig.push(sig_char(digits));
    push_digits(&mut sig, size, digits);
    for chunk in &actions.iter().chunks(3) {
        let packed = chunk.enumerate().map(|(k, &a)| a << (2 * k)).sum::<usize>();
        sig.push(sig_char(packed));
    }
    for (dest, gluing) in joins {
        push_digits(&mut sig, dest, digits);
        sig.push(sig_char(gluing));
    }
    Labelling {
        sig,
        image: order.iter().map(|&t| (t, image[t], perms[t])).collect(),
    }
}

impl Triangulation {
    /// The isomorphism signature.
    pub fn iso_sig(&self) -> String {
        self.iso_sig_detail().0
    }

    /// The isomorphism signature, and an isomorphism taking this
    /// triangulation to the one that [`Triangulation::from_iso_sig`]
    /// rebuilds from it.
    pub fn iso_sig_detail(&self) -> (String, Isomorphism) {
        if self.is_empty() {
            let mut sig = String::new();
            sig.push(sig_char(1));
            push_digits(&mut sig, 0, 1);
            return (sig, Isomorphism::identity(0));
        }
        let mut best: Vec<Labelling> = self
            .skeleton()
            .components()
            .into_iter()
            .filter_map(|tets| {
                let size = tets.len();
                tets.iter()
                    .flat_map(|&start| Perm4::all().into_iter().map(move |p| (start, p)))
                    .map(|(start, p)| label_from(self, size, start, p))
                    .min_by(|a, b| a.sig.cmp(&b.sig))
            })
            .collect();
        best.sort_by(|a, b| a.sig.cmp(&b.sig));

        let mut tet_image = vec![0; self.size()];
        let mut face_perm = vec![Perm4::identity(); self.size()];
        let mut offset = 0;
        let mut sig = String::new();
        for labelling in &best {
            sig.push_str(&labelling.sig);
            for &(t, new, perm) in &labelling.image {
                tet_image[t] = offset + new;
                face_perm[t] = perm;
            }
            offset += labelling.image.len();
        }
        (sig, Isomorphism::new_unchecked(tet_image, face_perm))
    }

    /// Whether the two triangulations are combinatorially isomorphic.
    pub fn is_isomorphic_to(&self, other: &Triangulation) -> bool {
        self.size() == other.size() && self.iso_sig() == other.iso_sig()
    }

    /// Relabels into the canonical labelling given by the signature.
    pub fn make_canonical(&mut self) -> Result<()> {
        let (_, iso) = self.iso_sig_detail();
        *self = iso.apply(self)?;
        Ok(())
    }

    /// Rebuilds a triangulation from its isomorphism signature.
    pub fn from_iso_sig(sig: &str) -> Result<Triangulation> {
        let mut reader = SigReader { bytes: sig.as_bytes(), pos: 0 };
        let mut tri = Triangulation::new();
        if reader.bytes.is_empty() {
            return Err(KernelError::invalid_input("empty isomorphism signature"));
        }
        while !reader.at_end() {
            decode_component(&mut reader, &mut tri)?;
        }
        Ok(tri)
    }
}

impl Isomorphism {
    fn new_unchecked(tet_image: Vec<usize>, face_perm: Vec<Perm4>) -> Self {
        match Isomorphism::new(tet_image, face_perm) {
            Ok(iso) => iso,
            Err(_) => unreachable!("signature labellings cover every tetrahedron once"),
        }
    }
}

struct SigReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl SigReader<'_> {
    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn next_value(&mut self) -> Result<usize> {
        let c = *self
            .bytes
            .get(self.pos)
            .ok_or_else(|| KernelError::invalid_input("isomorphism signature ended early"))?;
        self.pos += 1;
        sig_value(c).ok_or_else(|| KernelError::invalid_input(format!("invalid signature character {:?}", c as char)))
    }

    fn next_number(&mut self, digits: usize) -> Result<usize> {
        let mut value = 0usize;
        let mut scale = 1usize;
        for _ in 0..digits {
            value += self.next_value()? * scale;
            scale = scale.saturating_mul(64);
        }
        Ok(value)
    }
}

fn decode_component(reader: &mut SigReader<'_>, tri: &mut Triangulation) -> Result<()> {
    let digits = reader.next_value()?;
    if digits == 0 || digits > 8 {
        return Err(KernelError::invalid_input(format!("invalid size width {}", digits)));
    }
    let size = reader.next_number(digits)?;
    if size == 0 {
        return Ok(());
    }

    // Each action accounts for one or two of the 4n faces.
    let mut actions = Vec::new();
    let mut faces = 0;
    while faces < 4 * size {
        let packed = reader.next_value()?;
        for k in 0..3 {
            let action = (packed >> (2 * k)) & 3;
            if faces >= 4 * size {
                if action != 0 {
                    return Err(KernelError::invalid_input("non-zero padding in action list"));
                }
                continue;
            }
            faces += match action {
                0 => 1,
                1 | 2 => 2,
                _ => return Err(KernelError::invalid_input("invalid face action")),
            };
            actions.push(action);
        }
    }
    if faces != 4 * size {
        return Err(KernelError::invalid_input("face actions do not cover every face"));
    }

    let offset = tri.new_tetrahedra(size);
    let mut created = 1;
    let mut next_action = actions.into_iter();
    for t in 0..size {
        for face in 0..4 {
            if tri.adjacent(offset + t, face).is_some() {
                continue;
            }
            let action = next_action
                .next()
                .ok_or_else(|| KernelError::invalid_input("too few face actions"))?;
            match action {
                0 => {}
                1 => {
                    let dest = reader.next_number(digits)?;
                    let gluing = reader.next_value()?;
                    if dest >= size || gluing >= Perm4::COUNT {
                        return Err(KernelError::invalid_input("gluing out of range"));
                    }
                    tri.join(offset + t, face, offset + dest, Perm4::from_index(gluing))
                        .map_err(|e| KernelError::invalid_input(format!("inconsistent gluing: {}", e)))?;
                }
                _ => {
                    if created >= size {
                        return Err(KernelError::invalid_input("too many new tetrahedra"));
                    }
                    tri.join(offset + t, face, offset + created, Perm4::identity())
                        .map_err(|e| KernelError::invalid_input(format!("inconsistent gluing: {}", e)))?;
                    created += 1;
                }
            }
        }
    }
    if created != size || next_action.next().is_some() {
        return Err(KernelError::invalid_input("signature does not describe a connected component"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangulation::construct;

    #[test]
    fn test_round_trip() {
        for tri in [
            construct::figure_eight(),
            construct::layered_lens_space(7, 2).unwrap(),
            construct::layered_solid_torus(3, 5).unwrap(),
            Triangulation::sphere(),
            Triangulation::with_size(2),
        ] {
            let (sig, iso) = tri.iso_sig_detail();
            let rebuilt = Triangulation::from_iso_sig(&sig).unwrap();
            assert_eq!(rebuilt, iso.apply(&tri).unwrap());
            assert_eq!(rebuilt.iso_sig(), sig);
        }
    }

    #[test]
    fn test_invariant_under_relabelling() {
        let tri = construct::figure_eight();
        let iso = Isomorphism::new(vec![1, 0], vec![Perm4::new([3, 0, 2, 1]), Perm4::new([1, 2, 3, 0])]).unwrap();
        let other = iso.apply(&tri).unwrap();
        assert_eq!(tri.iso_sig(), other.iso_sig());
        assert!(tri.is_isomorphic_to(&other));
        assert!(!tri.is_isomorphic_to(&construct::gieseking()));
    }

    #[test]
    fn test_empty_and_rejects_garbage() {
        let empty = Triangulation::new();
        assert_eq!(Triangulation::from_iso_sig(&empty.iso_sig()).unwrap().size(), 0);
        assert!(matches!(Triangulation::from_iso_sig(""), Err(KernelError::InvalidInput(_))));
        assert!(Triangulation::from_iso_sig("b").is_err());
        assert!(Triangulation::from_iso_sig("bc*").is_err());
        let sig = construct::figure_eight().iso_sig();
        assert!(Triangulation::from_iso_sig(&sig[..sig.len() - 1]).is_err());
    }

    #[test]
    fn test_disconnected_sorted() {
        let mut a = Triangulation::sphere();
        a.insert_triangulation(&construct::figure_eight());
        let mut b = construct::figure_eight();
        b.insert_triangulation(&Triangulation::sphere());
        assert_eq!(a.iso_sig(), b.iso_sig());
        assert_eq!(Triangulation::from_iso_sig(&a.iso_sig()).unwrap().count_components(), 2);
    }

    #[test]
    fn test_make_canonical() {
        let mut tri = construct::layered_lens_space(8, 3).unwrap();
        let sig = tri.iso_sig();
        tri.make_canonical().unwrap();
        assert_eq!(tri, Triangulation::from_iso_sig(&sig).unwrap());
    }
}
