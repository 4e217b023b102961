//! XOR masking of frame payloads (RFC 6455, section 5.3).
//!
//! Masking and unmasking are the same operation: byte `i` of the payload is XORed with
//! `key[i % 4]`. Applying it twice with the same key and phase restores the original bytes.

/// Masking key as it appears in a frame header.
pub type MaskKey = [u8; 4];

#[cfg(not(feature="unoptimised_masking"))]
const WORD_SIZE : usize = 8;

/// Mask (or unmask) `buffer` in place, starting from the beginning of the key.
///
/// This is what a server does with a payload received from a client.
///
/// ```
/// let mut payload = [0x7F, 0x93];
/// websocket_payload::unmask(&mut payload[..], [0x37, 0xFA, 0x21, 0x3D]);
/// assert_eq!(&payload, b"Hi");
/// ```
#[inline]
pub fn unmask(buffer: &mut [u8], key: MaskKey) {
    apply_mask(key, buffer, 0);
}

/// Write `source[..length]` masked with `key` into `destination[destination_offset..]`.
///
/// Typically `destination` is an outgoing frame buffer and `destination_offset`
/// is the length of already written frame header.
///
/// # Panics
///
/// If `source` is shorter than `length` or `destination` is shorter than
/// `destination_offset + length`.
#[inline]
pub fn mask(
    source: &[u8],
    key: MaskKey,
    destination: &mut [u8],
    destination_offset: usize,
    length: usize,
) {
    let source = &source[..length];
    let destination = &mut destination[destination_offset..][..length];
    apply_mask_into(key, source, destination, 0);
}

/// Mask `payload_chunk` in place, using `key[phase % 4]` for its first byte.
///
/// `phase` is the offset of this chunk within the frame payload (modulo 4), which
/// allows payload to be processed piece by piece. See also [`crate::PayloadMasker`].
#[cfg(feature="unoptimised_masking")]
pub fn apply_mask(key: MaskKey, payload_chunk: &mut [u8], phase: u8) {
    let mut phase = phase & 0x03;
    for b in payload_chunk.iter_mut() {
        let index = (phase & 0x03) as usize;
        *b ^= key[index];
        phase = (phase + 1) & 0x03;
    }
}

/// Write masked `source` into the beginning of `destination`, using `key[phase % 4]` for the first byte.
///
/// # Panics
///
/// If `destination` is shorter than `source`.
#[cfg(feature="unoptimised_masking")]
pub fn apply_mask_into(key: MaskKey, source: &[u8], destination: &mut [u8], phase: u8) {
    let mut phase = phase & 0x03;
    let destination = &mut destination[..source.len()];
    for (d, s) in destination.iter_mut().zip(source) {
        let index = (phase & 0x03) as usize;
        *d = *s ^ key[index];
        phase = (phase + 1) & 0x03;
    }
}

/// Number of bytes to handle one by one before `data` reaches word alignment.
#[cfg(not(feature="unoptimised_masking"))]
#[inline]
fn preamble_length(data: &[u8]) -> usize {
    data.as_ptr().align_offset(WORD_SIZE).min(data.len())
}

/// Key repeated over one word, starting at `phase`.
#[cfg(not(feature="unoptimised_masking"))]
#[inline]
fn mask_window(key: MaskKey, phase: usize) -> [u8; WORD_SIZE] {
    let mut m = [0; WORD_SIZE];
    for (i, mb) in m.iter_mut().enumerate() {
        *mb = key[(i + phase) % 4];
    }
    m
}

#[cfg(not(feature="unoptimised_masking"))]
#[inline]
fn load_word(chunk: &[u8]) -> u64 {
    let mut w = [0u8; WORD_SIZE];
    w.copy_from_slice(chunk);
    u64::from_ne_bytes(w)
}

/// Mask `payload_chunk` in place, using `key[phase % 4]` for its first byte.
///
/// `phase` is the offset of this chunk within the frame payload (modulo 4), which
/// allows payload to be processed piece by piece. See also [`crate::PayloadMasker`].
#[cfg(not(feature="unoptimised_masking"))]
pub fn apply_mask(key: MaskKey, payload_chunk: &mut [u8], phase: u8) {
    let mut phase = phase as usize;
    let n = preamble_length(payload_chunk);
    let (prefix, main_part) = payload_chunk.split_at_mut(n);

    for b in prefix.iter_mut() {
        *b ^= key[phase % 4];
        phase += 1;
    }
    if main_part.is_empty() {
        return;
    }

    let m = mask_window(key, phase);
    let mword = u64::from_ne_bytes(m);

    let mut chunks = main_part.chunks_exact_mut(WORD_SIZE);
    for chunk in &mut chunks {
        let w = load_word(chunk) ^ mword;
        chunk.copy_from_slice(&w.to_ne_bytes());
    }
    // Whole words keep the window in phase, so the tail starts at its beginning.
    for (b, maskbyte) in chunks.into_remainder().iter_mut().zip(m) {
        *b ^= maskbyte;
    }
}

/// Write masked `source` into the beginning of `destination`, using `key[phase % 4]` for the first byte.
///
/// Alignment is decided by the `source` cursor; `destination` may be aligned arbitrarily.
///
/// # Panics
///
/// If `destination` is shorter than `source`.
#[cfg(not(feature="unoptimised_masking"))]
pub fn apply_mask_into(key: MaskKey, source: &[u8], destination: &mut [u8], phase: u8) {
    let mut phase = phase as usize;
    let destination = &mut destination[..source.len()];

    let n = preamble_length(source);
    let (src_prefix, src_main) = source.split_at(n);
    let (dst_prefix, dst_main) = destination.split_at_mut(n);

    for (d, s) in dst_prefix.iter_mut().zip(src_prefix) {
        *d = *s ^ key[phase % 4];
        phase += 1;
    }
    if src_main.is_empty() {
        return;
    }

    let m = mask_window(key, phase);
    let mword = u64::from_ne_bytes(m);

    let mut src_chunks = src_main.chunks_exact(WORD_SIZE);
    let mut dst_chunks = dst_main.chunks_exact_mut(WORD_SIZE);
    for (d, s) in (&mut dst_chunks).zip(&mut src_chunks) {
        let w = load_word(s) ^ mword;
        d.copy_from_slice(&w.to_ne_bytes());
    }
    let tail = src_chunks.remainder().iter().zip(m);
    for (d, (s, maskbyte)) in dst_chunks.into_remainder().iter_mut().zip(tail) {
        *d = *s ^ maskbyte;
    }
}
