// SPDX-License-Identifier: Apache-2.0

use log::trace;

use crate::accumulator::Accumulator;
use crate::escape;
use crate::{Cursor, Error, Token, TokenKind, Value};

/// Position in the state machine, preserved across `NeedMore` suspensions.
#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    /// Between tokens, skipping separators.
    Idle,
    /// Inside a primitive, scanning for a terminator.
    Primitive,
    /// Inside a string body. `key` means the string opened in key position
    /// and stays a key candidate until the lookahead past its closing
    /// quote decides.
    Body { key: bool },
    /// Immediately after a backslash, waiting for the escape letter.
    Escape { key: bool },
    /// Past a key candidate's closing quote, scanning for `:`.
    KeyEnd,
}

/// An incremental, pull-based tokenizer over a JSON-like byte stream.
///
/// The tokenizer holds no input of its own: the caller feeds it chunks
/// through a [`Cursor`], one `read` call per token. A value that lies
/// wholly inside the current chunk and needs no escape decoding is
/// returned as a slice of that chunk; anything else is assembled in the
/// fixed-size storage supplied at construction. The tokenizer never
/// allocates.
///
/// It is a lexer, not a validating parser: brackets are not balance-
/// checked, a key in array position is not rejected, and primitives are
/// returned as raw byte spans.
///
/// # Example
///
/// ```
/// use jtok::{Cursor, TokenKind, Tokenizer};
///
/// let mut storage = [0u8; 64];
/// let mut tokenizer = Tokenizer::new(&mut storage);
/// let mut cursor = Cursor::new(b"{\"a\":1}");
///
/// let token = tokenizer.read(&mut cursor).unwrap();
/// assert_eq!(token.kind, TokenKind::ObjectBegin);
/// let token = tokenizer.read(&mut cursor).unwrap();
/// assert_eq!(token.kind, TokenKind::ObjectKey);
/// assert_eq!(token.value.as_bytes(), b"a");
/// ```
pub struct Tokenizer<'b> {
    state: State,
    acc: Accumulator<'b>,
    /// Kind of the most recently produced token. Drives the key/value
    /// lookback and `eof_allowed`.
    last: TokenKind,
}

impl<'b> Tokenizer<'b> {
    /// Creates a tokenizer around caller-owned value storage.
    ///
    /// The storage bounds the largest value that must be assembled in the
    /// accumulator; one byte of it is kept as headroom. Values served
    /// zero-copy from a chunk are not limited by it.
    pub fn new(storage: &'b mut [u8]) -> Self {
        Self {
            state: State::Idle,
            acc: Accumulator::new(storage),
            last: TokenKind::None,
        }
    }

    /// Reads the next token from the chunk under `cursor`.
    ///
    /// On success the cursor sits on the first unconsumed byte and the
    /// call can be repeated immediately. [`Error::NeedMore`] means the
    /// chunk ran out mid-token: state and partial bytes are kept, and the
    /// next call resumes with the next chunk. Any other error ends the
    /// stream; continuation after it is not supported.
    pub fn read<'a>(&mut self, cursor: &mut Cursor<'a>) -> Result<Token<'a, '_>, Error> {
        match self.state {
            State::Idle => self.scan_idle(cursor),
            State::Primitive => self.scan_primitive(cursor),
            State::Body { .. } | State::Escape { .. } | State::KeyEnd => self.scan_string(cursor),
        }
    }

    /// Resolves work left suspended when the byte source is exhausted.
    ///
    /// End of input terminates a primitive the same way whitespace would,
    /// and refutes a pending key candidate into a plain string; either is
    /// returned here. Returns `Ok(None)` when nothing was pending and
    /// [`Error::Truncated`] when the input ended inside a string.
    pub fn finish(&mut self) -> Result<Option<Token<'_, '_>>, Error> {
        let kind = match self.state {
            State::Idle => return Ok(None),
            State::Primitive => TokenKind::Primitive,
            State::KeyEnd => TokenKind::String,
            State::Body { .. } | State::Escape { .. } => return Err(Error::Truncated),
        };
        trace!("input ended, emitting pending {:?}", kind);
        self.state = State::Idle;
        self.last = kind;
        Ok(Some(Token {
            kind,
            value: Value::Buffered(self.acc.as_slice()),
        }))
    }

    /// Whether running out of input right now would leave a well-formed
    /// stream.
    ///
    /// Only the most recently produced token is consulted: the answer is
    /// false exactly after an `ObjectBegin` or `ArrayBegin`. A stream cut
    /// off deeper inside an open object (say, right after a complete
    /// member value) still reports true; callers needing a stricter check
    /// must track nesting themselves.
    pub fn eof_allowed(&self) -> bool {
        !matches!(self.last, TokenKind::ObjectBegin | TokenKind::ArrayBegin)
    }

    /// Skips separators and dispatches the next token start.
    fn scan_idle<'a>(&mut self, cursor: &mut Cursor<'a>) -> Result<Token<'a, '_>, Error> {
        while let Some(byte) = cursor.peek() {
            match byte {
                // Pure separators; no structural validation happens here.
                b' ' | b'\t' | b'\r' | b'\n' | b':' | b',' => cursor.bump(),
                b'{' => {
                    cursor.bump();
                    return Ok(self.structural(TokenKind::ObjectBegin));
                }
                b'}' => {
                    cursor.bump();
                    return Ok(self.structural(TokenKind::ObjectEnd));
                }
                b'[' => {
                    cursor.bump();
                    return Ok(self.structural(TokenKind::ArrayBegin));
                }
                b']' => {
                    cursor.bump();
                    return Ok(self.structural(TokenKind::ArrayEnd));
                }
                b'"' => {
                    cursor.bump();
                    // One-token lookback: directly after a key this can
                    // only be a value string, anywhere else it is a key
                    // candidate until the lookahead decides.
                    let key = self.last != TokenKind::ObjectKey;
                    self.acc.clear();
                    self.state = State::Body { key };
                    return self.scan_string(cursor);
                }
                _ => {
                    self.acc.clear();
                    self.state = State::Primitive;
                    return self.scan_primitive(cursor);
                }
            }
        }
        Err(Error::NeedMore)
    }

    /// Scans a primitive up to (not including) its terminator.
    fn scan_primitive<'a>(&mut self, cursor: &mut Cursor<'a>) -> Result<Token<'a, '_>, Error> {
        let start = cursor.pos();
        while let Some(byte) = cursor.peek() {
            match byte {
                b' ' | b'\t' | b'\r' | b'\n' | b',' | b']' | b'}' => {
                    let end = cursor.pos();
                    return self.finish_value(TokenKind::Primitive, cursor, start, end);
                }
                0x20..=0x7e => cursor.bump(),
                _ => return Err(Error::InvalidByte(byte)),
            }
        }
        self.acc.append(cursor.slice(start, cursor.pos())?)?;
        trace!("primitive suspended, {} bytes held", self.acc.len());
        Err(Error::NeedMore)
    }

    /// Scans a string or key candidate, including the lookahead past a
    /// candidate's closing quote.
    fn scan_string<'a>(&mut self, cursor: &mut Cursor<'a>) -> Result<Token<'a, '_>, Error> {
        let mut start = cursor.pos();
        // Content span of a key candidate whose quote closed in this
        // chunk, held until the lookahead settles key vs. string.
        let mut held: Option<(usize, usize)> = None;
        while let Some(byte) = cursor.peek() {
            match self.state {
                State::Body { key } => match byte {
                    b'"' => {
                        let end = cursor.pos();
                        cursor.bump();
                        if key {
                            held = Some((start, end));
                            self.state = State::KeyEnd;
                        } else {
                            return self.finish_value(TokenKind::String, cursor, start, end);
                        }
                    }
                    b'\\' => {
                        self.acc.append(cursor.slice(start, cursor.pos())?)?;
                        cursor.bump();
                        self.state = State::Escape { key };
                    }
                    _ => cursor.bump(),
                },
                State::Escape { key } => {
                    let unescaped = escape::decode(byte).ok_or(Error::InvalidEscape(byte))?;
                    self.acc.push(unescaped)?;
                    cursor.bump();
                    start = cursor.pos();
                    self.state = State::Body { key };
                }
                State::KeyEnd => match byte {
                    b' ' | b'\t' | b'\r' | b'\n' => cursor.bump(),
                    b':' => {
                        let (s, e) = held.take().unwrap_or((start, start));
                        cursor.bump();
                        return self.finish_value(TokenKind::ObjectKey, cursor, s, e);
                    }
                    // Anything else refutes the candidate; the byte stays
                    // for the next idle scan.
                    _ => {
                        let (s, e) = held.take().unwrap_or((start, start));
                        return self.finish_value(TokenKind::String, cursor, s, e);
                    }
                },
                State::Idle | State::Primitive => {
                    return Err(Error::Unexpected("string scan outside string state"))
                }
            }
        }
        // Chunk exhausted: move whatever this chunk contributed into the
        // accumulator so the chunk may be reused, then suspend.
        match self.state {
            State::Body { .. } => self.acc.append(cursor.slice(start, cursor.pos())?)?,
            State::KeyEnd => {
                if let Some((s, e)) = held {
                    self.acc.append(cursor.slice(s, e)?)?;
                }
            }
            _ => {}
        }
        trace!("string suspended in {:?}, {} bytes held", self.state, self.acc.len());
        Err(Error::NeedMore)
    }

    /// Finalizes a value token: a direct chunk slice when nothing was
    /// copied yet, otherwise the accumulated bytes.
    fn finish_value<'a>(
        &mut self,
        kind: TokenKind,
        cursor: &Cursor<'a>,
        start: usize,
        end: usize,
    ) -> Result<Token<'a, '_>, Error> {
        self.state = State::Idle;
        self.last = kind;
        trace!("{:?} complete", kind);
        let value = if self.acc.is_empty() {
            Value::Chunk(cursor.slice(start, end)?)
        } else {
            self.acc.append(cursor.slice(start, end)?)?;
            Value::Buffered(self.acc.as_slice())
        };
        Ok(Token { kind, value })
    }

    /// Emits a single-byte structural token.
    fn structural(&mut self, kind: TokenKind) -> Token<'static, 'static> {
        self.last = kind;
        trace!("{:?} complete", kind);
        Token {
            kind,
            value: Value::Chunk(&[]),
        }
    }
}
