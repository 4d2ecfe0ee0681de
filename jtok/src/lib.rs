// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), no_std)]

mod accumulator;

mod cursor;
pub use cursor::Cursor;

mod error;
pub use error::Error;

mod escape;

mod token;
pub use token::{Token, TokenKind, Value};

mod tokenizer;
pub use tokenizer::Tokenizer;
