// SPDX-License-Identifier: Apache-2.0

//! Reads a JSON-like stream from stdin and dumps keys and values indented
//! by nesting depth.
//!
//! The read buffer is deliberately small so that values routinely span
//! chunks and the tokenizer's suspend/resume path is exercised on real
//! input. Set `RUST_LOG=trace` to watch it happen.

use std::io::Read;
use std::process::ExitCode;

use jtok::{Cursor, Error, Token, TokenKind, Tokenizer};

const CHUNK_BUF_SIZE: usize = 64;
const VALUE_BUF_SIZE: usize = 256;

/// Indented key/value rendering. Depth is tracked here, display-only; the
/// tokenizer itself knows nothing about nesting.
struct Printer {
    depth: usize,
    prev: TokenKind,
}

impl Printer {
    fn new() -> Self {
        Self {
            depth: 0,
            prev: TokenKind::None,
        }
    }

    fn print(&mut self, token: &Token<'_, '_>) {
        match token.kind {
            TokenKind::ObjectBegin | TokenKind::ArrayBegin => {
                if self.prev == TokenKind::ObjectKey {
                    println!();
                }
                self.depth += 1;
            }
            TokenKind::ObjectEnd | TokenKind::ArrayEnd => {
                self.depth = self.depth.saturating_sub(1);
            }
            TokenKind::ObjectKey => {
                self.indent();
                print!("\"{}\" : ", String::from_utf8_lossy(token.value.as_bytes()));
            }
            TokenKind::String => {
                if self.prev != TokenKind::ObjectKey {
                    self.indent();
                }
                println!("\"{}\"", String::from_utf8_lossy(token.value.as_bytes()));
            }
            TokenKind::Primitive => {
                if self.prev != TokenKind::ObjectKey {
                    self.indent();
                }
                println!("{}", String::from_utf8_lossy(token.value.as_bytes()));
            }
            TokenKind::None => {}
        }
        self.prev = token.kind;
    }

    fn indent(&self) {
        for _ in 0..self.depth {
            print!("  ");
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let mut chunk = [0u8; CHUNK_BUF_SIZE];
    let mut storage = [0u8; VALUE_BUF_SIZE];
    let mut tokenizer = Tokenizer::new(&mut storage);
    let mut printer = Printer::new();

    let mut stdin = std::io::stdin().lock();
    loop {
        let n = match stdin.read(&mut chunk) {
            Ok(n) => n,
            Err(err) => {
                eprintln!("read error: {err}");
                return ExitCode::from(1);
            }
        };
        if n == 0 {
            // True end of input: resolve anything still suspended, then
            // ask whether stopping here leaves a well-formed stream.
            match tokenizer.finish() {
                Ok(Some(token)) => printer.print(&token),
                Ok(None) => {}
                Err(err) => {
                    eprintln!("truncated document: {err}");
                    return ExitCode::from(2);
                }
            }
            if tokenizer.eof_allowed() {
                return ExitCode::SUCCESS;
            }
            eprintln!("unexpected end of input");
            return ExitCode::from(2);
        }

        let mut cursor = Cursor::new(&chunk[..n]);
        loop {
            match tokenizer.read(&mut cursor) {
                Ok(token) => printer.print(&token),
                Err(Error::NeedMore) => break,
                Err(err) => {
                    eprintln!("parse error: {err}");
                    return ExitCode::from(1);
                }
            }
        }
    }
}
