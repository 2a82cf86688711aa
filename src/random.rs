// ABOUTME: Uniform random integer and string generation over a CSPRNG byte source
// ABOUTME: Rejection sampling sized to the minimal covering bit-width, so no modulo bias
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Uniform Random Generation
//!
//! Produces unbiased random integers in `[0, max)` by rejection sampling over
//! cryptographically secure random bytes, plus the derived alphanumeric string
//! generator used for key ids, key secrets, and signing secrets.
//!
//! The byte source is an injected capability (`RngCore + CryptoRng`) so tests
//! can substitute deterministic doubles; `random_int` and `random_string` bind
//! the operating system CSPRNG.

use crate::constants::pattern;
use crate::errors::{AppError, AppResult};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

/// Character drawing strategy for [`random_string_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StringMode {
    /// Append the full 36-character block once per requested unit.
    ///
    /// Earlier key generators assembled strings this way, yielding a
    /// deterministic `length * 36` character result with no per-position
    /// randomness and consuming no entropy. Kept selectable so keys minted by
    /// those generators can be reproduced byte-for-byte.
    Legacy,
    /// Draw `length` characters independently and uniformly from the block.
    #[default]
    Corrected,
}

/// Number of binary digits in `value`, with zero defined to occupy one digit
/// (its binary rendering is the single character `0`).
const fn bit_length(value: u64) -> u32 {
    if value == 0 {
        1
    } else {
        u64::BITS - value.leading_zeros()
    }
}

/// Zero the high-order bits of the first byte that lie beyond the covering
/// bit-width. Leaving them set would make candidates above the minimal
/// power-of-two range reachable and skew the accept/reject ratio.
fn mask_excess_bits(buf: &mut [u8], excess_bits: u32) {
    if excess_bits != 0 {
        if let Some(first) = buf.first_mut() {
            *first &= (1u8 << excess_bits) - 1;
        }
    }
}

/// Interpret the buffer as a big-endian unsigned integer.
fn bytes_to_int(buf: &[u8]) -> u64 {
    buf.iter().fold(0u64, |acc, &byte| (acc << 8) | u64::from(byte))
}

/// Generate a uniformly distributed integer in `[0, max)` using the operating
/// system CSPRNG.
///
/// # Errors
///
/// Returns an `ENTROPY_SOURCE_ERROR` if the secure random source cannot
/// supply bytes. The failure is fatal and never retried internally.
pub fn random_int(max: u64) -> AppResult<u64> {
    random_int_with(&mut OsRng, max)
}

/// Generate a uniformly distributed integer in `[0, max)` from the supplied
/// cryptographically secure byte source.
///
/// The sampling buffer is sized to `ceil(bit_length(max - 1) / 8)` bytes and
/// refilled with fresh bytes each round; the first byte is masked down to the
/// covering bit-width, and candidates `>= max` are rejected. Every value in
/// `[0, max)` is equally likely, and the expected number of rounds is below
/// two.
///
/// `max == 0` is a degenerate range with a single representable result: the
/// call returns `0` immediately without consuming entropy.
///
/// # Errors
///
/// Returns an `ENTROPY_SOURCE_ERROR` if `rng` cannot supply bytes.
pub fn random_int_with<R>(rng: &mut R, max: u64) -> AppResult<u64>
where
    R: RngCore + CryptoRng + ?Sized,
{
    if max == 0 {
        return Ok(0);
    }

    let bits = bit_length(max - 1);
    let excess_bits = bits % 8;
    let mut buf = vec![0u8; ((bits + 7) / 8) as usize];

    loop {
        rng.try_fill_bytes(&mut buf).map_err(|e| {
            AppError::entropy_source(format!("secure random source failed: {e}")).with_source(e)
        })?;
        mask_excess_bits(&mut buf, excess_bits);

        let candidate = bytes_to_int(&buf);
        if candidate < max {
            return Ok(candidate);
        }
    }
}

/// Generate a random string of `length` characters drawn uniformly from the
/// lowercase alphanumeric block, using the operating system CSPRNG.
///
/// # Errors
///
/// Returns an `ENTROPY_SOURCE_ERROR` if the secure random source cannot
/// supply bytes.
pub fn random_string(length: usize) -> AppResult<String> {
    random_string_with(&mut OsRng, length, StringMode::Corrected)
}

/// Generate a string from the lowercase alphanumeric block in the requested
/// [`StringMode`].
///
/// In `Corrected` mode the result has exactly `length` characters, each drawn
/// independently via [`random_int_with`] over the 36-character block. In
/// `Legacy` mode the result is the block repeated `length` times.
///
/// # Errors
///
/// Returns an `ENTROPY_SOURCE_ERROR` if `rng` cannot supply bytes
/// (`Corrected` mode only; `Legacy` mode consumes no entropy).
pub fn random_string_with<R>(rng: &mut R, length: usize, mode: StringMode) -> AppResult<String>
where
    R: RngCore + CryptoRng + ?Sized,
{
    match mode {
        StringMode::Legacy => Ok(pattern::ALPHANUMERIC_BLOCK.repeat(length)),
        StringMode::Corrected => {
            let block = pattern::ALPHANUMERIC_BLOCK.as_bytes();
            let mut out = String::with_capacity(length);
            for _ in 0..length {
                let index = random_int_with(rng, block.len() as u64)?;
                out.push(char::from(block[index as usize]));
            }
            Ok(out)
        }
    }
}
