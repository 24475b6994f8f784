//! # Additive Checksum
//!
//! The frame check byte is the plain sum of every preceding byte, modulo 256.
//! It is not a CRC: byte order within the covered range does not affect it.

/// Calculate the additive checksum of `data`
///
/// # Examples
///
/// ```
/// use ins_link::frame::checksum::checksum;
///
/// assert_eq!(checksum(&[0x5A, 0xA5, 0x1A, 0x01]), 0x1A);
/// ```
pub fn checksum(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |acc, &byte| acc.wrapping_add(byte))
}

/// Calculate the checksum by widening and reducing once (slow, for verification)
#[allow(dead_code)]
fn checksum_slow(data: &[u8]) -> u8 {
    (data.iter().map(|&b| b as u32).sum::<u32>() % 256) as u8
}
