// SPDX-License-Identifier: Apache-2.0

/// Outcomes of a `read` call that did not produce a token.
///
/// `NeedMore` is a suspension signal rather than a failure, in the manner of
/// `nb::Error::WouldBlock`: the tokenizer keeps its state and any partially
/// accumulated bytes, and the caller continues with the next chunk. Every
/// other variant is a hard stop for the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The chunk ran out before the current token completed. Supply the next
    /// chunk and call `read` again; the tokenizer resumes mid-token.
    NeedMore,
    /// A control or non-printable-ASCII byte inside a primitive.
    InvalidByte(u8),
    /// An unrecognized letter after a backslash inside a string.
    InvalidEscape(u8),
    /// The value did not fit the accumulator storage.
    NoMemory,
    /// The input ended inside a string (reported by `finish`).
    Truncated,
    /// The tokenizer reached a state it never should.
    Unexpected(&'static str),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::NeedMore => write!(f, "more input required"),
            Error::InvalidByte(b) => write!(f, "invalid byte 0x{b:02x} in primitive"),
            Error::InvalidEscape(b) => write!(f, "invalid escape 0x{b:02x} in string"),
            Error::NoMemory => write!(f, "value does not fit the accumulator"),
            Error::Truncated => write!(f, "input ended inside a token"),
            Error::Unexpected(msg) => write!(f, "unexpected state: {msg}"),
        }
    }
}
