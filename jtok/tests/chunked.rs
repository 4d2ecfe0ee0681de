// SPDX-License-Identifier: Apache-2.0

//! Chunking must be observationally transparent: splitting a document at
//! arbitrary byte boundaries yields the same token sequence as feeding it
//! whole.

use jtok::{Cursor, Error, TokenKind, Tokenizer};

use test_log::test;

fn tokenize(doc: &[u8], chunk_size: usize) -> Result<Vec<(TokenKind, Vec<u8>)>, Error> {
    let mut storage = [0u8; 256];
    let mut tokenizer = Tokenizer::new(&mut storage);
    let mut out = Vec::new();
    for piece in doc.chunks(chunk_size.max(1)) {
        let mut cursor = Cursor::new(piece);
        loop {
            match tokenizer.read(&mut cursor) {
                Ok(token) => out.push((token.kind, token.value.as_bytes().to_vec())),
                Err(Error::NeedMore) => break,
                Err(err) => return Err(err),
            }
        }
        assert!(cursor.is_empty(), "cursor must reach the chunk end");
    }
    if let Some(token) = tokenizer.finish()? {
        out.push((token.kind, token.value.as_bytes().to_vec()));
    }
    Ok(out)
}

/// Tokenizes `doc` whole, then at every split size down to single bytes,
/// and demands identical kind/value sequences throughout.
fn assert_transparent(doc: &[u8]) {
    let reference = tokenize(doc, doc.len().max(1)).expect("whole-document tokenization failed");
    for split in 1..=doc.len() {
        let chunked = tokenize(doc, split)
            .unwrap_or_else(|err| panic!("split size {split} failed: {err:?}"));
        assert_eq!(chunked, reference, "split size {split} diverged");
    }
}

macro_rules! transparency_tests {
    ($($name:ident => $doc:expr,)*) => {
        $(
            paste::paste! {
                #[test]
                fn [<chunking_is_transparent_for_ $name>]() {
                    assert_transparent($doc);
                }
            }
        )*
    };
}

transparency_tests! {
    object_with_array => br#"{"a":1,"b":[2,3]}"#,
    nested_containers => br#"{"outer":{"inner":[true,false,null]},"tail":"end"}"#,
    escaped_strings => br#"{"msg":"line1\nline2\ttab \"quoted\" a\/b c\\d \b\f\r"}"#,
    heavy_whitespace => b"  {  \"a\"  :  1 ,\n\t \"b\" : [ 2 , 3 ] }  ",
    strings_in_arrays => br#"["a","b",{"k":"v"},"c"]"#,
    empty_containers => br#"{"e":{},"f":[]}"#,
    empty_strings => br#"{"":""}"#,
    top_level_string => br#""line1\nline2""#,
    top_level_primitive => b"12345",
    deep_arrays => b"[[[[[1]]]]]",
    long_member_chain => br#"{"k1":"v1","k2":2,"k3":"v\t3","k4":[{"n":null}]}"#,
}

#[test]
fn escaped_string_reference_value() {
    // Anchor the reference sequence the transparency tests compare against.
    let tokens = tokenize(br#"{"msg":"a\nb"}"#, 64).unwrap();
    let expected: &[(TokenKind, &[u8])] = &[
        (TokenKind::ObjectBegin, b""),
        (TokenKind::ObjectKey, b"msg"),
        (TokenKind::String, b"a\nb"),
        (TokenKind::ObjectEnd, b""),
    ];
    assert_eq!(tokens.len(), expected.len());
    for ((kind, value), (want_kind, want_value)) in tokens.iter().zip(expected) {
        assert_eq!(kind, want_kind);
        assert_eq!(value.as_slice(), *want_value);
    }
}

#[test]
fn byte_by_byte_suspension_cadence() {
    let mut storage = [0u8; 64];
    let mut tokenizer = Tokenizer::new(&mut storage);

    // `[` completes immediately.
    let mut cursor = Cursor::new(b"[");
    assert_eq!(
        tokenizer.read(&mut cursor).map(|t| t.kind),
        Ok(TokenKind::ArrayBegin)
    );

    // `1` cannot complete without its terminator.
    let mut cursor = Cursor::new(b"1");
    assert_eq!(tokenizer.read(&mut cursor), Err(Error::NeedMore));

    // The `,` terminates the primitive and stays unconsumed.
    let mut cursor = Cursor::new(b",");
    let token = tokenizer.read(&mut cursor).unwrap();
    assert_eq!(token.kind, TokenKind::Primitive);
    assert_eq!(token.value.as_bytes(), b"1");
    assert_eq!(cursor.pos(), 0);

    // Re-reading the same chunk then skips the separator.
    assert_eq!(tokenizer.read(&mut cursor), Err(Error::NeedMore));
    assert!(cursor.is_empty());
}

#[test]
fn one_byte_chunks_match_the_reference_scenario() {
    let doc = br#"{"a":1,"b":[2,3]}"#;
    let tokens = tokenize(doc, 1).unwrap();
    let expected_kinds = [
        TokenKind::ObjectBegin,
        TokenKind::ObjectKey,
        TokenKind::Primitive,
        TokenKind::ObjectKey,
        TokenKind::ArrayBegin,
        TokenKind::Primitive,
        TokenKind::Primitive,
        TokenKind::ArrayEnd,
        TokenKind::ObjectEnd,
    ];
    let got_kinds: Vec<TokenKind> = tokens.iter().map(|(kind, _)| *kind).collect();
    assert_eq!(got_kinds, expected_kinds);
}

#[test]
fn invalid_input_is_reported_at_any_split() {
    for split in 1..=7 {
        assert_eq!(
            tokenize(b"[nu\x07ll]", split),
            Err(Error::InvalidByte(0x07)),
            "split size {split}"
        );
    }
    for split in 1..=5 {
        assert_eq!(
            tokenize(br#""a\x""#, split),
            Err(Error::InvalidEscape(b'x')),
            "split size {split}"
        );
    }
}
