// SPDX-License-Identifier: Apache-2.0

/// Decodes the letter following a backslash inside a string.
///
/// Returns `None` for letters outside the recognized set; the tokenizer
/// reports those as invalid input. The lexical grammar has no `\uXXXX`
/// form, so `u` is unrecognized like any other letter.
pub(crate) fn decode(letter: u8) -> Option<u8> {
    match letter {
        b'"' => Some(b'"'),
        b'\\' => Some(b'\\'),
        b'/' => Some(b'/'),
        b'b' => Some(0x08),
        b'f' => Some(0x0c),
        b'n' => Some(b'\n'),
        b'r' => Some(b'\r'),
        b't' => Some(b'\t'),
        _ => None,
    }
}
