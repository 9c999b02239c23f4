// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Tight encoding: a compact, prefix-free, printable-ASCII byte stream.
//!
//! A natural number is written little-endian in base 90 using the characters
//! `!` (value 0) through `z` (value 89), then terminated by `~`. Since `~` is
//! never a digit, no encoding is a prefix of another.
//!
//! An abelian group is written as its rank, then each invariant factor in
//! ascending order, then the natural number 0 as an end marker.
//!
//! # Examples
//!
//! ```
//! use normal_kernel::homology::{tight_decode, tight_encoding, AbelianGroup};
//!
//! let g = AbelianGroup::free(2);
//! let s = tight_encoding(&g).unwrap();
//! assert_eq!(tight_decode::<AbelianGroup>(&s).unwrap(), g);
//! ```

use crate::error::{KernelError, Result};
use crate::maths::Integer;

use super::AbelianGroup;

const BASE: i64 = 90;
const FIRST_DIGIT: u8 = b'!';
const TERMINATOR: u8 = b'~';

/// A cursor over tight-encoded input.
#[derive(Debug)]
pub struct TightReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> TightReader<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn next_byte(&mut self) -> Result<u8> {
        let b = self
            .bytes
            .get(self.pos)
            .copied()
            .ok_or_else(|| KernelError::invalid_input("tight encoding ended early"))?;
        self.pos += 1;
        Ok(b)
    }
}

/// Types with a tight encoding.
pub trait TightEncode: Sized {
    fn tight_encode(&self, out: &mut String) -> Result<()>;

    fn tight_decode(reader: &mut TightReader<'_>) -> Result<Self>;
}

/// The tight encoding of `value` as a new string.
pub fn tight_encoding<T: TightEncode>(value: &T) -> Result<String> {
    let mut out = String::new();
    value.tight_encode(&mut out)?;
    Ok(out)
}

/// Decodes a complete string, which must contain nothing after the encoded value.
pub fn tight_decode<T: TightEncode>(input: &str) -> Result<T> {
    let mut reader = TightReader::new(input);
    let value = T::tight_decode(&mut reader)?;
    if !reader.is_at_end() {
        return Err(KernelError::invalid_input(
            "trailing data after tight encoding",
        ));
    }
    Ok(value)
}

/// Writes a non-negative integer. Negative and infinite values are
/// refused and nothing is written.
pub fn encode_natural(value: &Integer, out: &mut String) -> Result<()> {
    if value.is_negative() || value.is_infinite() {
        return Err(KernelError::invalid_input(format!(
            "tight encoding needs a natural number, not {}",
            value
        )));
    }
    let base = Integer::new(BASE);
    let mut rest = value.clone();
    loop {
        let (q, r) = rest.div_rem(&base);
        let digit = r.try_to_i64().unwrap_or(0) as u8;
        out.push((FIRST_DIGIT + digit) as char);
        if q.is_zero() {
            break;
        }
        rest = q;
    }
    out.push(TERMINATOR as char);
    Ok(())
}

/// Reads a natural number. Only the shortest encoding is accepted, so a
/// zero as the last of several digits is an error.
pub fn decode_natural(reader: &mut TightReader<'_>) -> Result<Integer> {
    let mut value = Integer::ZERO;
    let mut place = Integer::ONE;
    let mut digits = 0;
    let mut last = FIRST_DIGIT;
    loop {
        let b = reader.next_byte()?;
        if b == TERMINATOR {
            if digits == 0 {
                return Err(KernelError::invalid_input("empty tight-encoded integer"));
            }
            if digits > 1 && last == FIRST_DIGIT {
                return Err(KernelError::invalid_input("tight-encoded integer has a redundant zero digit"));
            }
            return Ok(value);
        }
        if !(FIRST_DIGIT..FIRST_DIGIT + BASE as u8).contains(&b) {
            return Err(KernelError::invalid_input(format!(
                "unexpected byte {:?} in tight-encoded integer",
                b as char
            )));
        }
        value += &place * (b - FIRST_DIGIT) as i64;
        place = &place * BASE;
        digits += 1;
        last = b;
    }
}

impl TightEncode for Integer {
    fn tight_encode(&self, out: &mut String) -> Result<()> {
        encode_natural(self, out)
    }

    fn tight_decode(reader: &mut TightReader<'_>) -> Result<Self> {
        decode_natural(reader)
    }
}

impl TightEncode for AbelianGroup {
    fn tight_encode(&self, out: &mut String) -> Result<()> {
        encode_natural(&Integer::from(self.rank()), out)?;
        for d in self.invariant_factors() {
            encode_natural(d, out)?;
        }
        encode_natural(&Integer::ZERO, out)
    }

    fn tight_decode(reader: &mut TightReader<'_>) -> Result<Self> {
        let rank = decode_natural(reader)?
            .try_to_i64()
            .and_then(|r| usize::try_from(r).ok())
            .ok_or_else(|| KernelError::invalid_input("abelian group rank out of range"))?;
        let mut invariants: Vec<Integer> = Vec::new();
        loop {
            let d = decode_natural(reader)?;
            if d.is_zero() {
                break;
            }
            if d == Integer::ONE {
                return Err(KernelError::invalid_input("invariant factor 1 in encoding"));
            }
            if let Some(prev) = invariants.last() {
                if !d.is_divisible_by(prev) {
                    return Err(KernelError::invalid_input(format!(
                        "invariant factors out of order: {} then {}",
                        prev, d
                    )));
                }
            }
            invariants.push(d);
        }
        AbelianGroup::from_invariants(rank, invariants)
            .map_err(|e| KernelError::invalid_input(e.to_string()))
    }
}
