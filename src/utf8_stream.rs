use tinyvec::ArrayVec;

use crate::utf8::{check_prefix, check_sequence, scan, Utf8Error, SEQUENCE_LENGTH};

/// Validates UTF-8 that arrives in pieces, e.g. payload chunks of a fragmented text message.
///
/// Chunk boundaries may split a multi-byte sequence; up to 3 bytes of it are kept until the rest arrives.
/// Bytes of such a sequence are checked as soon as they arrive, so a broken one is rejected
/// without waiting for its end.
/// Feeding all chunks of a buffer and then calling [`Utf8StreamValidator::finish`] succeeds
/// exactly when [`crate::validate_utf8`] accepts the whole buffer.
///
/// ```
/// use websocket_payload::Utf8StreamValidator;
///
/// let mut v = Utf8StreamValidator::new();
/// v.add_data(b"price: \xE2\x82").unwrap();
/// assert!(!v.eof_valid());
/// v.add_data(b"\xAC").unwrap();
/// assert!(v.finish().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Utf8StreamValidator {
    /// Beginning of a sequence cut off by the previous chunk
    pending: ArrayVec<[u8; 4]>,
    error: Option<Utf8Error>,
}

impl Utf8StreamValidator {
    #[inline]
    pub fn new() -> Utf8StreamValidator {
        Utf8StreamValidator::default()
    }

    /// Validate next chunk of the stream.
    ///
    /// Once an error is returned, all subsequent calls return it as well, until [`Utf8StreamValidator::reset`].
    pub fn add_data(&mut self, mut data: &[u8]) -> Result<(), Utf8Error> {
        if let Some(e) = self.error {
            return Err(e);
        }

        if !self.pending.is_empty() {
            let needed = SEQUENCE_LENGTH[self.pending[0] as usize] as usize;
            let n = (needed - self.pending.len()).min(data.len());
            self.pending.extend_from_slice(&data[..n]);
            data = &data[n..];
            if self.pending.len() < needed {
                return self.record(check_prefix(&self.pending));
            }
            let ret = check_sequence(&self.pending);
            self.pending.clear();
            self.record(ret)?;
        }

        let complete = self.record(scan(data))?;
        self.pending.extend_from_slice(&data[complete..]);
        if self.pending.is_empty() {
            return Ok(());
        }
        self.record(check_prefix(&self.pending))
    }

    /// There is no incomplete sequence at this moment and the stream may end here.
    #[inline]
    pub fn eof_valid(&self) -> bool {
        self.error.is_none() && self.pending.is_empty()
    }

    /// Final verdict for the stream, to be called after the last chunk.
    #[inline]
    pub fn finish(&self) -> Result<(), Utf8Error> {
        match self.error {
            Some(e) => Err(e),
            None if !self.pending.is_empty() => Err(Utf8Error::Truncated),
            None => Ok(()),
        }
    }

    /// Number of bytes of an incomplete sequence waiting for continuation.
    #[inline]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Forget everything and start validating a new stream.
    #[inline]
    pub fn reset(&mut self) {
        self.pending.clear();
        self.error = None;
    }

    fn record<T>(&mut self, ret: Result<T, Utf8Error>) -> Result<T, Utf8Error> {
        if let Err(e) = &ret {
            self.error = Some(*e);
        }
        ret
    }
}
