//! Tests for the Command Registry
//!
//! These tests verify:
//! - Registry dispatch encodes with each command's strategy
//! - Reply transforms are applied after decoding
//! - Server errors come back as values, not failures
//! - Caller misuse is rejected before any bytes are written

use std::io::{Cursor, Read, Write};

use redwire::command::{int_to_bool, invoke};
use redwire::{
    define, Arg, CommandRegistry, Connection, EncodingStrategy, InvalidCommand, ParamShape,
    RedisError, Reply, StringMode, Value,
};

// =============================================================================
// Helper Functions
// =============================================================================

/// In-memory duplex: scripted server replies in, client requests out
struct ScriptedStream {
    replies: Cursor<Vec<u8>>,
    written: Vec<u8>,
}

impl Read for ScriptedStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.replies.read(buf)
    }
}

impl Write for ScriptedStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn connection(replies: &[u8]) -> Connection<ScriptedStream> {
    connection_with_mode(replies, StringMode::Text)
}

fn connection_with_mode(replies: &[u8], mode: StringMode) -> Connection<ScriptedStream> {
    let stream = ScriptedStream {
        replies: Cursor::new(replies.to_vec()),
        written: Vec::new(),
    };
    Connection::from_stream(stream, mode)
}

fn written(conn: &Connection<ScriptedStream>) -> &[u8] {
    &conn.get_ref().expect("connection open").written
}

fn args(items: &[&str]) -> Vec<Arg> {
    items.iter().map(|s| Arg::from(*s)).collect()
}

// =============================================================================
// Registry Dispatch
// =============================================================================

#[test]
fn test_set_uses_bulk_and_status_ok() {
    let registry = CommandRegistry::with_builtin_commands();
    let mut conn = connection(b"+OK\r\n");

    let value = registry.call(&mut conn, "set", &args(&["key", "hello world"])).unwrap();

    assert_eq!(value, Value::Bool(true));
    assert_eq!(written(&conn), b"SET key 11\r\nhello world\r\n");
}

#[test]
fn test_get_returns_bulk() {
    let registry = CommandRegistry::with_builtin_commands();
    let mut conn = connection(b"$5\r\nvalue\r\n");

    let value = registry.call(&mut conn, "GET", &args(&["key"])).unwrap();

    assert_eq!(value, Value::Reply(Reply::text("value")));
    assert_eq!(written(&conn), b"GET key\r\n");
}

#[test]
fn test_get_missing_key_is_nil() {
    let registry = CommandRegistry::with_builtin_commands();
    let mut conn = connection(b"$-1\r\n");

    let value = registry.call(&mut conn, "get", &args(&["missing"])).unwrap();
    assert_eq!(value, Value::Reply(Reply::Bulk(None)));
}

#[test]
fn test_variadic_del() {
    let registry = CommandRegistry::with_builtin_commands();
    let mut conn = connection(b":2\r\n");

    let value = registry.call(&mut conn, "del", &args(&["a", "b", "c"])).unwrap();

    assert_eq!(value, Value::Reply(Reply::Integer(2)));
    assert_eq!(written(&conn), b"DEL a b c\r\n");
}

#[test]
fn test_exists_transforms_to_bool() {
    let registry = CommandRegistry::with_builtin_commands();
    let mut conn = connection(b":1\r\n:0\r\n");

    assert_eq!(registry.call(&mut conn, "exists", &args(&["a"])).unwrap(), Value::Bool(true));
    assert_eq!(registry.call(&mut conn, "exists", &args(&["b"])).unwrap(), Value::Bool(false));
    assert_eq!(written(&conn), b"EXISTS a\r\nEXISTS b\r\n");
}

#[test]
fn test_smembers_transforms_to_set() {
    let registry = CommandRegistry::with_builtin_commands();
    let mut conn = connection(b"*3\r\n$1\r\nb\r\n$1\r\na\r\n$1\r\nc\r\n");

    let value = registry.call(&mut conn, "smembers", &args(&["s"])).unwrap();
    match value {
        Value::Set(members) => {
            assert_eq!(members.into_iter().collect::<Vec<_>>(), vec!["a", "b", "c"])
        }
        other => panic!("Expected set, got {:?}", other),
    }
}

#[test]
fn test_sort_through_registry() {
    let registry = CommandRegistry::with_builtin_commands();
    let mut conn = connection(b"*2\r\n$1\r\n3\r\n$1\r\n1\r\n");

    let value = registry
        .call(&mut conn, "sort", &args(&["mylist", ":by", "weight_*", ":limit", "0", "10", ":desc"]))
        .unwrap();

    assert_eq!(written(&conn), b"SORT mylist BY weight_* LIMIT 0 10 DESC\r\n");
    assert_eq!(
        value,
        Value::Reply(Reply::Array(Some(vec![Reply::text("3"), Reply::text("1")])))
    );
}

#[test]
fn test_zscore_transforms_to_float() {
    let registry = CommandRegistry::with_builtin_commands();
    let mut conn = connection(b"$4\r\n2.25\r\n");

    let value = registry.call(&mut conn, "zscore", &args(&["z", "member"])).unwrap();

    assert_eq!(value, Value::Float(2.25));
    assert_eq!(written(&conn), b"ZSCORE z 6\r\nmember\r\n");
}

#[test]
fn test_mget_with_non_utf8_element_in_text_mode() {
    let registry = CommandRegistry::with_builtin_commands();
    let mut conn = connection(b"*2\r\n$2\r\n\xff\xfe\r\n$2\r\nok\r\n+PONG\r\n");

    let value = registry.call(&mut conn, "mget", &args(&["raw", "plain"])).unwrap();
    assert_eq!(
        value,
        Value::Reply(Reply::Array(Some(vec![
            Reply::text("\u{fffd}\u{fffd}"),
            Reply::text("ok"),
        ])))
    );

    // Stream stays aligned and usable
    assert!(conn.is_connected());
    let pong = registry.call(&mut conn, "ping", &[]).unwrap();
    assert_eq!(pong, Value::Reply(Reply::Status("PONG".to_string())));
}

#[test]
fn test_binary_mode_round_trip() {
    let registry = CommandRegistry::with_builtin_commands();
    let payload: Vec<u8> = vec![0x61, 0x0d, 0x62];

    let mut replies = b"+OK\r\n$3\r\n".to_vec();
    replies.extend_from_slice(&payload);
    replies.extend_from_slice(b"\r\n");
    let mut conn = connection_with_mode(&replies, StringMode::Binary);

    registry
        .call(&mut conn, "set", &[Arg::from("bin"), Arg::from(payload.clone())])
        .unwrap();
    let value = registry.call(&mut conn, "get", &args(&["bin"])).unwrap();

    assert_eq!(value.as_reply().and_then(Reply::as_bytes), Some(payload.as_slice()));
}

// =============================================================================
// Server Errors
// =============================================================================

#[test]
fn test_server_error_is_a_value() {
    let registry = CommandRegistry::with_builtin_commands();
    let mut conn = connection(b"-WRONGTYPE Operation against a key holding the wrong kind of value\r\n");

    let value = registry.call(&mut conn, "sadd", &args(&["str", "m"])).unwrap();
    let reply = value.as_reply().expect("untransformed error reply");

    assert!(reply.is_error());
    assert!(reply.server_message().unwrap().starts_with("WRONGTYPE"));
    assert!(conn.is_connected());
}

// =============================================================================
// Caller Errors
// =============================================================================

#[test]
fn test_unknown_command() {
    let registry = CommandRegistry::with_builtin_commands();
    let mut conn = connection(b"");

    let result = registry.call(&mut conn, "subscribe", &args(&["chan"]));
    assert!(matches!(
        result,
        Err(RedisError::InvalidCommand(InvalidCommand::UnknownCommand(_)))
    ));
    assert!(written(&conn).is_empty());
}

#[test]
fn test_wrong_arity_writes_nothing() {
    let registry = CommandRegistry::with_builtin_commands();
    let mut conn = connection(b"");

    let result = registry.call(&mut conn, "get", &args(&["a", "b"]));
    assert!(matches!(
        result,
        Err(RedisError::InvalidCommand(InvalidCommand::WrongArity { actual: 2, .. }))
    ));
    assert!(written(&conn).is_empty());
}

#[test]
fn test_smuggled_request_writes_nothing() {
    let registry = CommandRegistry::with_builtin_commands();
    let mut conn = connection(b"");

    let result = registry.call(&mut conn, "get", &args(&["a\r\nFLUSHALL"]));
    assert!(matches!(
        result,
        Err(RedisError::InvalidCommand(InvalidCommand::InvalidInlineArgument { .. }))
    ));
    assert!(written(&conn).is_empty());
    assert!(conn.is_connected());
}

#[test]
fn test_bad_sort_option_writes_nothing() {
    let registry = CommandRegistry::with_builtin_commands();
    let mut conn = connection(b"");

    let result = registry.call(&mut conn, "sort", &args(&["k", ":shuffle"]));
    assert!(matches!(
        result,
        Err(RedisError::InvalidCommand(InvalidCommand::UnknownSortOption(_)))
    ));
    assert!(written(&conn).is_empty());
}

// =============================================================================
// Custom Definitions
// =============================================================================

#[test]
fn test_custom_command_definition() {
    let mut registry = CommandRegistry::new();
    registry.register(
        define("hexists", ParamShape::fixed(2), EncodingStrategy::Inline).with_transform(int_to_bool),
    );
    let mut conn = connection(b":1\r\n");

    let value = registry.call(&mut conn, "HEXISTS", &args(&["h", "f"])).unwrap();

    assert_eq!(value, Value::Bool(true));
    assert_eq!(written(&conn), b"HEXISTS h f\r\n");
}

#[test]
fn test_invoke_splices_rest_after_fixed() {
    let desc = define("sinterstore", ParamShape::variadic(2), EncodingStrategy::Inline);
    let mut conn = connection(b":3\r\n");

    let value = invoke(&mut conn, &desc, &args(&["dst", "s1"]), &args(&["s2", "s3"])).unwrap();

    assert_eq!(value, Value::Reply(Reply::Integer(3)));
    assert_eq!(written(&conn), b"SINTERSTORE dst s1 s2 s3\r\n");
}

#[test]
fn test_closed_connection_is_not_connected() {
    let registry = CommandRegistry::with_builtin_commands();
    let mut conn = connection(b"+PONG\r\n");
    conn.close();

    let result = registry.call(&mut conn, "ping", &[]);
    assert!(matches!(result, Err(RedisError::NotConnected)));
}
