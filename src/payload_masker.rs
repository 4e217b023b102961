use nonmax::NonMaxU8;

use crate::masking::{apply_mask, apply_mask_into, MaskKey};

/// Masks or unmasks one frame payload that arrives (or departs) in several chunks.
///
/// It remembers the key and the position within the key, so chunks of any size can be
/// fed in order and the result is the same as masking the whole payload at once.
///
/// ```
/// use websocket_payload::PayloadMasker;
///
/// let mut payload = *b"\x7f\x9f\x4d\x51\x58";
/// let mut masker = PayloadMasker::new([0x37, 0xfa, 0x21, 0x3d]);
/// let (a, b) = payload.split_at_mut(3);
/// masker.transform(a);
/// masker.transform(b);
/// assert_eq!(&payload, b"Hello");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct PayloadMasker {
    key: MaskKey,
    phase: Option<NonMaxU8>,
}

#[inline]
fn phase_value(x: usize) -> NonMaxU8 {
    // Always below 4, so never the forbidden value.
    NonMaxU8::new((x & 0x03) as u8).unwrap_or_default()
}

impl PayloadMasker {
    /// Masker for a masked frame with the given key, positioned at the start of the payload.
    #[inline]
    pub fn new(key: MaskKey) -> PayloadMasker {
        PayloadMasker {
            key,
            phase: Some(NonMaxU8::default()),
        }
    }

    /// Masker for a frame without a mask: all transformations are no-ops.
    #[inline]
    pub const fn unmasked() -> PayloadMasker {
        PayloadMasker {
            key: [0; 4],
            phase: None,
        }
    }

    /// Choose between [`PayloadMasker::new`] and [`PayloadMasker::unmasked`]
    /// based on the masking key field of a frame header.
    #[inline]
    pub fn from_mask(mask: Option<MaskKey>) -> PayloadMasker {
        match mask {
            Some(key) => PayloadMasker::new(key),
            None => PayloadMasker::unmasked(),
        }
    }

    /// Mask or unmask next chunk of the payload in place.
    ///
    /// Chunks must be supplied in the same order they appear in the payload.
    #[inline]
    pub fn transform(&mut self, data: &mut [u8]) {
        if let Some(ref mut phase) = self.phase {
            let ph = phase.get();
            apply_mask(self.key, data, ph);
            *phase = phase_value(ph as usize + data.len());
        }
    }

    /// Write next chunk of the payload, masked or unmasked, to the beginning of `destination`.
    ///
    /// For frames without a mask this is a plain copy.
    ///
    /// # Panics
    ///
    /// If `destination` is shorter than `source`.
    #[inline]
    pub fn transform_into(&mut self, source: &[u8], destination: &mut [u8]) {
        match self.phase {
            Some(ref mut phase) => {
                let ph = phase.get();
                apply_mask_into(self.key, source, destination, ph);
                *phase = phase_value(ph as usize + source.len());
            }
            None => destination[..source.len()].copy_from_slice(source),
        }
    }

    /// Undo the position advance caused by this number of last transformed bytes,
    /// e.g. when they were not actually written to the socket.
    ///
    /// The bytes themselves are not restored; transform them again to get the original content.
    #[inline]
    pub fn rollback(&mut self, n_bytes: usize) {
        if let Some(ref mut phase) = self.phase {
            let modulo = n_bytes % 4;
            *phase = phase_value(phase.get() as usize + 4 - modulo);
        }
    }

    /// Current position within the masking key, if the frame is masked.
    #[inline]
    pub fn phase(&self) -> Option<u8> {
        self.phase.map(|x| x.get())
    }

    /// Check if you can skip `transform` and use payload as is.
    #[inline]
    pub const fn transform_needed(&self) -> bool {
        self.phase.is_some()
    }
}
