use super::*;

extern crate std;
use std::vec::Vec;

use pretty_assertions::assert_eq;

const KEY: MaskKey = [0x37, 0xfa, 0x21, 0x3d];

#[test]
fn mask_hi() {
    let mut out = [0u8; 2];
    mask(b"Hi", KEY, &mut out[..], 0, 2);
    assert_eq!(out, [0x7f, 0x93]);
    unmask(&mut out[..], KEY);
    assert_eq!(&out, b"Hi");
}

#[test]
fn unmask_hello() {
    let mut payload = *b"\x7f\x9f\x4d\x51\x58";
    unmask(&mut payload[..], KEY);
    assert_eq!(&payload, b"Hello");
}

#[test]
fn mask_after_header() {
    let mut frame = *b"\x81\x85\x37\xfa\x21\x3d\0\0\0\0\0";
    mask(b"Hello!!!", KEY, &mut frame[..], 6, 5);
    assert_eq!(&frame, b"\x81\x85\x37\xfa\x21\x3d\x7f\x9f\x4d\x51\x58");
}

#[test]
fn mask_empty() {
    let mut out = [0xAAu8; 3];
    mask(b"", KEY, &mut out[..], 3, 0);
    assert_eq!(out, [0xAA; 3]);

    let mut empty: [u8; 0] = [];
    unmask(&mut empty[..], KEY);
    apply_mask(KEY, &mut empty[..], 3);
}

#[test]
#[should_panic]
fn mask_destination_too_short() {
    let mut out = [0u8; 4];
    mask(b"Hello", KEY, &mut out[..], 1, 5);
}

#[test]
#[should_panic]
fn mask_source_too_short() {
    let mut out = [0u8; 16];
    mask(b"Hi", KEY, &mut out[..], 0, 3);
}

#[test]
fn text_frame_payload() {
    let mut payload = [0u8; 4];
    mask("\u{20AC}!".as_bytes(), KEY, &mut payload[..], 0, 4);
    assert!(!is_valid_utf8(&payload));
    unmask(&mut payload[..], KEY);
    assert!(is_valid_utf8(&payload));
    assert_eq!(core::str::from_utf8(&payload), Ok("\u{20AC}!"));
}

#[test]
fn fragmented_text_message() {
    let mut message: Vec<u8> = "h\u{e9}llo \u{1F600}".as_bytes().into();
    let mut masker = PayloadMasker::new(KEY);
    masker.transform(&mut message[..]);

    let mut unmasker = PayloadMasker::new(KEY);
    let mut validator = Utf8StreamValidator::new();
    for fragment in message.chunks_mut(3) {
        unmasker.transform(fragment);
        validator.add_data(fragment).unwrap();
    }
    assert_eq!(validator.finish(), Ok(()));
    assert_eq!(core::str::from_utf8(&message), Ok("h\u{e9}llo \u{1F600}"));
}

#[test]
fn error_display() {
    use std::string::ToString;
    assert_eq!(Utf8Error::Truncated.to_string(), "truncated UTF-8 sequence");
    assert_eq!(Utf8Error::InvalidLeadByte.to_string(), "invalid UTF-8 lead byte");
}
