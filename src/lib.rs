//! Low-level WebSocket payload primitives that do not use memory allocations or IO:
//! applying and removing the frame masking key and checking that text payloads are valid UTF-8.
//!
//! Frame headers, handshakes, message assembly and closing the connection are not here;
//! the caller extracts payload and masking key from frames and decides what to do with the verdicts.
//!
//! ```
//! use websocket_payload::{is_valid_utf8, mask, unmask};
//!
//! let key = [0x37, 0xFA, 0x21, 0x3D];
//! let mut frame = [0u8; 8];
//! mask(b"Hi", key, &mut frame[..], 6, 2);
//! assert_eq!(&frame[6..], &[0x7F, 0x93]);
//!
//! let payload = &mut frame[6..];
//! unmask(payload, key);
//! assert!(is_valid_utf8(payload));
//! assert_eq!(payload, b"Hi");
//! ```

#![no_std]

pub mod masking;
pub use masking::{apply_mask, apply_mask_into, mask, unmask, MaskKey};

mod payload_masker;
pub use payload_masker::PayloadMasker;

pub mod utf8;
pub use utf8::{is_valid_utf8, validate_utf8, Utf8Error};

mod utf8_stream;
pub use utf8_stream::Utf8StreamValidator;

#[cfg(test)]
mod tests;
