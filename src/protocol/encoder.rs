//! Command encoder
//!
//! Builds the exact request bytes for a command. Three strategies exist:
//!
//! ```text
//! Inline:        NAME arg1 arg2 ...\r\n
//! Bulk:          NAME arg1 ... argN-1 <len(argN)>\r\n<argN bytes>\r\n
//! SortComposite: SORT key [BY p] [LIMIT s e] [GET p]... [STORE k] [ALPHA|ASC|DESC]\r\n
//! ```
//!
//! Only the bulk payload is binary safe. Every other token is written on
//! the request line, so a space, CR or LF inside one is rejected with
//! [`InvalidCommand::InvalidInlineArgument`].

use bytes::Bytes;

use crate::error::{InvalidCommand, Result};

/// Line terminator for every request line
pub const CRLF: &[u8] = b"\r\n";

/// A stringified command argument
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Arg(Bytes);

impl Arg {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Case-insensitive comparison against an ASCII keyword
    fn is_keyword(&self, keyword: &str) -> bool {
        let raw: &[u8] = &self.0;
        let word = raw.strip_prefix(b":").unwrap_or(raw);
        word.eq_ignore_ascii_case(keyword.as_bytes())
    }
}

impl From<Bytes> for Arg {
    fn from(b: Bytes) -> Self {
        Arg(b)
    }
}

impl From<Vec<u8>> for Arg {
    fn from(v: Vec<u8>) -> Self {
        Arg(Bytes::from(v))
    }
}

impl From<&[u8]> for Arg {
    fn from(b: &[u8]) -> Self {
        Arg(Bytes::copy_from_slice(b))
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Arg(Bytes::from(s))
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg(Bytes::copy_from_slice(s.as_bytes()))
    }
}

impl From<&String> for Arg {
    fn from(s: &String) -> Self {
        Arg::from(s.as_str())
    }
}

macro_rules! arg_from_display {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Arg {
                fn from(v: $ty) -> Self {
                    Arg(Bytes::from(v.to_string()))
                }
            }
        )*
    };
}

arg_from_display!(i32, i64, u32, u64, usize, f64);

/// Request encoding strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingStrategy {
    /// Space-separated single line
    Inline,

    /// Header line ending in the payload length, then the raw payload
    Bulk,

    /// Keyword-driven SORT option list
    SortComposite,
}

/// Encode a command with the given strategy
pub fn encode(strategy: EncodingStrategy, name: &str, args: &[Arg]) -> Result<Vec<u8>> {
    match strategy {
        EncodingStrategy::Inline => encode_inline(name, args),
        EncodingStrategy::Bulk => encode_bulk(name, args),
        EncodingStrategy::SortComposite => encode_sort(name, args),
    }
}

/// `NAME arg1 arg2 ...\r\n`
pub fn encode_inline(name: &str, args: &[Arg]) -> Result<Vec<u8>> {
    let mut message = header_line(name, args.iter().map(Arg::as_bytes))?;
    message.extend_from_slice(CRLF);
    Ok(message)
}

/// `NAME arg1 ... <len>\r\n<payload>\r\n`, the last argument being the payload
pub fn encode_bulk(name: &str, args: &[Arg]) -> Result<Vec<u8>> {
    let (payload, header_args) = args
        .split_last()
        .ok_or_else(|| InvalidCommand::MissingPayload(name.to_string()))?;
    let payload = payload.as_bytes();
    let len = payload.len().to_string();

    let mut message = header_line(
        name,
        header_args
            .iter()
            .map(Arg::as_bytes)
            .chain(std::iter::once(len.as_bytes())),
    )?;
    message.reserve(CRLF.len() * 2 + payload.len());
    message.extend_from_slice(CRLF);
    message.extend_from_slice(payload);
    message.extend_from_slice(CRLF);
    Ok(message)
}

/// `SORT key [options...]\r\n`
///
/// Options are consumed by keyword and re-emitted uppercase in the order
/// given, without reordering or deduplication.
pub fn encode_sort(name: &str, args: &[Arg]) -> Result<Vec<u8>> {
    if !name.eq_ignore_ascii_case("SORT") {
        return Err(InvalidCommand::WrongCommandName {
            expected: "SORT",
            actual: name.to_string(),
        }
        .into());
    }

    let (key, options) = args.split_first().ok_or(InvalidCommand::MissingSortKey)?;

    let mut tokens: Vec<&[u8]> = vec![key.as_bytes()];
    let mut rest = options.iter();

    while let Some(option) = rest.next() {
        let (keyword, operands) = SortOption::parse(option)?;
        tokens.push(keyword.as_bytes());
        for _ in 0..operands {
            let operand = rest.next().ok_or(InvalidCommand::MissingSortOperand(keyword))?;
            tokens.push(operand.as_bytes());
        }
    }

    let mut message = header_line("SORT", tokens.into_iter())?;
    message.extend_from_slice(CRLF);
    Ok(message)
}

/// SORT option keywords and how many operands each consumes
struct SortOption;

impl SortOption {
    const TABLE: &'static [(&'static str, usize)] = &[
        ("BY", 1),
        ("LIMIT", 2),
        ("GET", 1),
        ("STORE", 1),
        ("ALPHA", 0),
        ("ASC", 0),
        ("DESC", 0),
    ];

    fn parse(arg: &Arg) -> Result<(&'static str, usize)> {
        Self::TABLE
            .iter()
            .find(|(keyword, _)| arg.is_keyword(keyword))
            .copied()
            .ok_or_else(|| {
                InvalidCommand::UnknownSortOption(String::from_utf8_lossy(arg.as_bytes()).into_owned())
                    .into()
            })
    }
}

/// Uppercased `name` followed by each token, single-space separated
fn header_line<'a>(name: &str, tokens: impl Iterator<Item = &'a [u8]>) -> Result<Vec<u8>> {
    let mut line = name.to_ascii_uppercase().into_bytes();
    for token in tokens {
        if token.iter().any(|b| matches!(b, b' ' | b'\r' | b'\n')) {
            return Err(InvalidCommand::InvalidInlineArgument {
                name: name.to_ascii_uppercase(),
                arg: String::from_utf8_lossy(token).into_owned(),
            }
            .into());
        }
        line.push(b' ');
        line.extend_from_slice(token);
    }
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<Arg> {
        items.iter().map(|s| Arg::from(*s)).collect()
    }

    #[test]
    fn test_inline_without_args() {
        assert_eq!(encode_inline("ping", &[]).unwrap(), b"PING\r\n");
    }

    #[test]
    fn test_inline_joins_with_single_spaces() {
        let encoded = encode(EncodingStrategy::Inline, "GET", &args(&["mykey"])).unwrap();
        assert_eq!(encoded, b"GET mykey\r\n");
    }

    #[test]
    fn test_inline_stringifies_numbers() {
        let encoded = encode_inline("EXPIRE", &[Arg::from("k"), Arg::from(30i64)]).unwrap();
        assert_eq!(encoded, b"EXPIRE k 30\r\n");
    }

    #[test]
    fn test_bulk_set() {
        let encoded = encode(EncodingStrategy::Bulk, "SET", &args(&["key", "hello world"])).unwrap();
        assert_eq!(encoded, b"SET key 11\r\nhello world\r\n");
    }

    #[test]
    fn test_bulk_binary_payload() {
        let payload: Vec<u8> = vec![0x61, 0x0d, 0x0a, 0x00, 0x62];
        let encoded = encode_bulk("SET", &[Arg::from("k"), Arg::from(payload.clone())]).unwrap();

        let mut expected = b"SET k 5\r\n".to_vec();
        expected.extend_from_slice(&payload);
        expected.extend_from_slice(b"\r\n");
        assert_eq!(encoded, expected);
    }

    #[test]
    fn test_bulk_empty_payload() {
        let encoded = encode_bulk("ECHO", &args(&[""])).unwrap();
        assert_eq!(encoded, b"ECHO 0\r\n\r\n");
    }

    #[test]
    fn test_inline_rejects_line_breaking_bytes() {
        for bad in ["a b", "a\r\nFLUSHALL", "a\n", "\r"] {
            let err = encode_inline("GET", &args(&[bad])).unwrap_err();
            assert!(
                matches!(
                    err,
                    crate::error::RedisError::InvalidCommand(InvalidCommand::InvalidInlineArgument { .. })
                ),
                "{:?} was accepted",
                bad
            );
        }
    }

    #[test]
    fn test_bulk_header_args_are_inline_tokens() {
        assert!(encode_bulk("SET", &args(&["my key", "v"])).is_err());
        // The payload itself may hold anything
        assert!(encode_bulk("SET", &args(&["k", "a b\r\n"])).is_ok());
    }

    #[test]
    fn test_bulk_requires_payload() {
        assert!(encode_bulk("SET", &[]).is_err());
    }

    #[test]
    fn test_sort_without_options() {
        let encoded = encode_sort("SORT", &args(&["mylist"])).unwrap();
        assert_eq!(encoded, b"SORT mylist\r\n");
    }

    #[test]
    fn test_sort_full_option_list() {
        let encoded = encode(
            EncodingStrategy::SortComposite,
            "sort",
            &args(&[
                "mylist", ":by", "weight_*", ":limit", "0", "10", ":get", "obj_*", ":get", "#",
                ":store", "dst", ":alpha", ":asc",
            ]),
        )
        .unwrap();
        assert_eq!(
            encoded,
            b"SORT mylist BY weight_* LIMIT 0 10 GET obj_* GET # STORE dst ALPHA ASC\r\n".to_vec()
        );
    }

    #[test]
    fn test_sort_keywords_without_colon() {
        let encoded = encode_sort("SORT", &args(&["l", "desc", "Alpha"])).unwrap();
        assert_eq!(encoded, b"SORT l DESC ALPHA\r\n");
    }
}
