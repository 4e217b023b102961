//! UTF-8 validation of text payloads.
//!
//! Only encodings allowed by RFC 3629 are accepted: at most four bytes per
//! code point, no overlong forms, no surrogates, nothing above U+10FFFF.

use core::fmt;

/// Reason why a buffer is not valid UTF-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Utf8Error {
    /// Multi-byte sequence is cut off by the end of input.
    Truncated,
    /// Byte cannot start a sequence: a stray continuation byte, `0xC0`, `0xC1` or `0xF5..=0xFF`.
    InvalidLeadByte,
    /// Byte following a lead byte is outside of the range allowed for its position.
    InvalidContinuation,
    /// Sequence decodes to a surrogate or to a value above U+10FFFF.
    ///
    /// Backstop after decoding: the continuation byte ranges already exclude such
    /// sequences, so they are reported as [`Utf8Error::InvalidContinuation`] first.
    InvalidCodePoint,
}

impl fmt::Display for Utf8Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Utf8Error::Truncated => "truncated UTF-8 sequence",
            Utf8Error::InvalidLeadByte => "invalid UTF-8 lead byte",
            Utf8Error::InvalidContinuation => "invalid UTF-8 continuation byte",
            Utf8Error::InvalidCodePoint => "UTF-8 sequence encodes a surrogate or out-of-range code point",
        };
        f.write_str(s)
    }
}

const fn sequence_lengths() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut b = 0;
    while b < 256 {
        table[b] = match b as u8 {
            0x00..=0x7F => 1,
            0xC2..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF4 => 4,
            _ => 0,
        };
        b += 1;
    }
    table
}

/// Total length of a sequence by its lead byte. Zero means the byte cannot lead.
pub(crate) static SEQUENCE_LENGTH: [u8; 256] = sequence_lengths();

/// What accumulating 6 bits per byte adds on top of the code point, by sequence length.
const OFFSETS: [u32; 4] = [0x0000_0000, 0x0000_3080, 0x000E_2080, 0x03C8_2080];

const MAX_CODE_POINT: u32 = 0x10_FFFF;
const SURROGATES: core::ops::RangeInclusive<u32> = 0xD800..=0xDFFF;

const ASCII_MASK: u64 = 0x8080_8080_8080_8080;

/// Allowed range of the continuation byte at `position` (0 = right after `lead`).
///
/// Second byte is narrowed to exclude overlongs, surrogates and values above U+10FFFF.
#[inline]
fn continuation_range(lead: u8, position: usize) -> core::ops::RangeInclusive<u8> {
    match (lead, position) {
        (0xE0, 0) => 0xA0..=0xBF,
        (0xED, 0) => 0x80..=0x9F,
        (0xF0, 0) => 0x90..=0xBF,
        (0xF4, 0) => 0x80..=0x8F,
        _ => 0x80..=0xBF,
    }
}

/// Check the bytes present so far of a sequence cut off by the end of input.
pub(crate) fn check_prefix(seq: &[u8]) -> Result<(), Utf8Error> {
    let lead = seq[0];
    for (i, &b) in seq[1..].iter().enumerate() {
        if !continuation_range(lead, i).contains(&b) {
            return Err(Utf8Error::InvalidContinuation);
        }
    }
    Ok(())
}

/// Check one complete sequence. `seq` must be exactly as long as its lead byte announces.
pub(crate) fn check_sequence(seq: &[u8]) -> Result<(), Utf8Error> {
    let lead = seq[0];
    let mut ch = lead as u32;
    for (i, &b) in seq[1..].iter().enumerate() {
        if !continuation_range(lead, i).contains(&b) {
            return Err(Utf8Error::InvalidContinuation);
        }
        ch = (ch << 6) + b as u32;
    }
    let ch = ch.wrapping_sub(OFFSETS[seq.len() - 1]);

    // Unreachable after the range checks above; kept as a backstop on the decoded value.
    if ch > MAX_CODE_POINT || SURROGATES.contains(&ch) {
        return Err(Utf8Error::InvalidCodePoint);
    }
    Ok(())
}

#[inline]
fn ascii_word(chunk: &[u8]) -> bool {
    let mut w = [0u8; 8];
    w.copy_from_slice(chunk);
    u64::from_ne_bytes(w) & ASCII_MASK == 0
}

/// Scan `buffer` left to right, stopping at the first violation.
///
/// On success returns the offset of a trailing sequence cut off by the end of the buffer,
/// or `buffer.len()` if there is none.
pub(crate) fn scan(buffer: &[u8]) -> Result<usize, Utf8Error> {
    let mut i = 0;
    while i < buffer.len() {
        let lead = buffer[i];
        if lead < 0x80 {
            i += 1;
            while let Some(chunk) = buffer.get(i..i + 8) {
                if !ascii_word(chunk) {
                    break;
                }
                i += 8;
            }
            continue;
        }

        let len = SEQUENCE_LENGTH[lead as usize] as usize;
        if len == 0 {
            return Err(Utf8Error::InvalidLeadByte);
        }
        let Some(seq) = buffer.get(i..i + len) else {
            return Ok(i);
        };
        check_sequence(seq)?;
        i += len;
    }
    Ok(i)
}

/// Check that whole `buffer` is well-formed UTF-8, reporting the first violation found.
#[inline]
pub fn validate_utf8(buffer: &[u8]) -> Result<(), Utf8Error> {
    if scan(buffer)? == buffer.len() {
        Ok(())
    } else {
        Err(Utf8Error::Truncated)
    }
}

/// Check that whole `buffer` is well-formed UTF-8.
///
/// A text frame payload failing this check should make the peer close
/// the connection with status code 1007.
///
/// ```
/// use websocket_payload::is_valid_utf8;
///
/// assert!(is_valid_utf8(b"\xE2\x82\xAC"));
/// assert!(!is_valid_utf8(b"\xE2\x82"));
/// assert!(!is_valid_utf8(b"\xED\xA0\x80"));
/// ```
#[inline]
pub fn is_valid_utf8(buffer: &[u8]) -> bool {
    validate_utf8(buffer).is_ok()
}
