//! Character codes and classes used by the scanner.
//!
//! The language is ASCII-only; every byte at or above 0x80 is illegal
//! outside comments.

pub const LINE_FEED: u8 = b'\n';
pub const CARRIAGE_RETURN: u8 = b'\r';
pub const TAB: u8 = b'\t';
pub const VERTICAL_TAB: u8 = 0x0B;
pub const FORM_FEED: u8 = 0x0C;
pub const SPACE: u8 = b' ';
pub const DELETE: u8 = 0x7F;

pub const DOUBLE_QUOTE: u8 = b'"';
pub const BACKSLASH: u8 = b'\\';
pub const OPEN_BRACE: u8 = b'{';
pub const CLOSE_BRACE: u8 = b'}';
pub const UNDERSCORE: u8 = b'_';

/// Whitespace skipped between tokens.
#[inline]
pub fn is_white_space(ch: u8) -> bool {
    matches!(
        ch,
        SPACE | TAB | LINE_FEED | CARRIAGE_RETURN | VERTICAL_TAB | FORM_FEED
    )
}

/// Check if a byte can start an identifier.
#[inline]
pub fn is_identifier_start(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == UNDERSCORE
}

/// Check if a byte can continue an identifier.
#[inline]
pub fn is_identifier_part(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || ch == UNDERSCORE
}

/// Printable ASCII, the only raw bytes allowed inside string literals.
#[inline]
pub fn is_printable(ch: u8) -> bool {
    (SPACE..DELETE).contains(&ch)
}
