use crate::error::{CodecError, Result};

/// The ordered alphabet. Index `i` is the digit with value `i`.
pub const ALPHABET: &[u8; 36] = b"1aku2blv3cmw4dnx5eoy6fpz7gq8hr9is0jt";

/// Number of digits in [`ALPHABET`].
pub const BASE: u64 = ALPHABET.len() as u64;

const INVALID: u8 = u8::MAX;

/// Reverse lookup table from ASCII byte to digit value.
const REVERSE: [u8; 128] = build_reverse();

const fn build_reverse() -> [u8; 128] {
    let mut table = [INVALID; 128];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
}

fn digit(c: char) -> Option<u64> {
    let index = usize::try_from(u32::from(c)).ok()?;
    match REVERSE.get(index) {
        Some(&value) if value != INVALID => Some(u64::from(value)),
        _ => None,
    }
}

/// Encodes an identifier as a short code.
///
/// `0` encodes to the single zero digit (`"1"`) rather than the empty string,
/// so every identifier has a non-empty code and `decode(encode(n)) == n` holds
/// for the whole `u64` range.
pub fn encode(mut id: u64) -> String {
    if id == 0 {
        return char::from(ALPHABET[0]).to_string();
    }

    // 36^13 > u64::MAX
    let mut buf = [0u8; 13];
    let mut i = buf.len();
    while id > 0 {
        i -= 1;
        buf[i] = ALPHABET[(id % BASE) as usize];
        id /= BASE;
    }
    buf[i..].iter().map(|&b| char::from(b)).collect()
}

/// Decodes a short code back into its identifier.
///
/// Characters are consumed most significant first. The empty string decodes
/// to `0`. Leading zero digits are accepted and do not change the value.
pub fn decode(code: &str) -> Result<u64> {
    code.chars()
        .enumerate()
        .try_fold(0u64, |n, (position, character)| {
            let value = digit(character).ok_or(CodecError::InvalidCharacter {
                character,
                position,
            })?;
            n.checked_mul(BASE)
                .and_then(|n| n.checked_add(value))
                .ok_or_else(|| CodecError::Overflow {
                    code: code.to_string(),
                })
        })
}
