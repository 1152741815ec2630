use transit::{decode, encode, Format, Value};

#[test]
fn top_level_scalars_are_quoted_in_compact_json() {
    let cases: [(Value, &str); 6] = [
        (Value::Str("hello".into()), r#"["~#'","hello"]"#),
        (Value::Int(42), r#"["~#'",42]"#),
        (Value::Null, r#"["~#'",null]"#),
        (Value::Bool(true), r#"["~#'",true]"#),
        (Value::Float(2.5), r#"["~#'",2.5]"#),
        (Value::keyword("a"), r#"["~#'","~:a"]"#),
    ];
    for (value, wire) in cases {
        assert_eq!(encode(&value, Format::Json).unwrap(), wire.as_bytes());
        assert_eq!(decode(wire.as_bytes(), Format::Json).unwrap(), value);
    }
}

#[test]
fn top_level_scalars_are_quoted_in_verbose_json() {
    assert_eq!(
        encode(&Value::Str("hello".into()), Format::JsonVerbose).unwrap(),
        br#"{"~#'":"hello"}"#
    );
    assert_eq!(
        decode(br#"{"~#'":"hello"}"#, Format::JsonVerbose).unwrap(),
        Value::Str("hello".into())
    );
}

#[test]
fn top_level_scalars_are_quoted_in_msgpack() {
    assert_eq!(
        encode(&Value::Str("hello".into()), Format::MsgPack).unwrap(),
        [0x92, 0xa3, b'~', b'#', b'\'', 0xa5, b'h', b'e', b'l', b'l', b'o']
    );
}

#[test]
fn composites_are_not_quoted() {
    assert_eq!(
        encode(&Value::Array(vec![Value::Int(1)]), Format::Json).unwrap(),
        b"[1]"
    );
    assert_eq!(
        encode(&Value::Map(vec![]), Format::Json).unwrap(),
        br#"["^ "]"#
    );
    assert_eq!(
        encode(&Value::Set(vec![]), Format::Json).unwrap(),
        br#"["~#set",[]]"#
    );
}

#[test]
fn quote_tag_is_never_cached() {
    // Two top-level encodes share nothing, but even within one stream the
    // 3-character quote tag stays below the cacheable minimum.
    let wire = encode(&Value::Str("x".into()), Format::Json).unwrap();
    assert_eq!(wire, br#"["~#'","x"]"#);
}

#[test]
fn empty_string_top_level() {
    let wire = encode(&Value::Str(String::new()), Format::Json).unwrap();
    assert_eq!(wire, br#"["~#'",""]"#);
    assert_eq!(
        decode(&wire, Format::Json).unwrap(),
        Value::Str(String::new())
    );
}
