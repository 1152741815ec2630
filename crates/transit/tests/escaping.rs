use transit::{decode, encode, Format, Value};

const FORMATS: [Format; 3] = [Format::Json, Format::JsonVerbose, Format::MsgPack];

fn json(value: &Value) -> String {
    String::from_utf8(encode(value, Format::Json).unwrap()).unwrap()
}

#[test]
fn reserved_first_characters_escape_on_the_wire() {
    let cases = [
        ("~looks-tagged", r#"["~~looks-tagged"]"#),
        ("^looks-cached", r#"["~^looks-cached"]"#),
        ("`reserved", "[\"~`reserved\"]"),
    ];
    for (s, wire) in cases {
        let value = Value::Array(vec![Value::Str(s.into())]);
        assert_eq!(json(&value), wire);
        assert_eq!(decode(wire.as_bytes(), Format::Json).unwrap(), value);
    }
}

#[test]
fn reserved_strings_round_trip_everywhere() {
    for s in ["~", "^", "`", "~:fake", "^ ", "~#set", "~~", "plain"] {
        for format in FORMATS {
            let value = Value::Array(vec![Value::Str(s.into())]);
            let bytes = encode(&value, format).unwrap();
            assert_eq!(
                decode(&bytes, format).unwrap(),
                value,
                "string {s:?} in {format:?}"
            );
        }
    }
}

#[test]
fn escaped_strings_as_map_keys() {
    let value = Value::Map(vec![
        (Value::Str("~key".into()), Value::Int(1)),
        (Value::Str("^key".into()), Value::Int(2)),
    ]);
    for format in FORMATS {
        let bytes = encode(&value, format).unwrap();
        assert_eq!(decode(&bytes, format).unwrap(), value);
    }
}

#[test]
fn escaped_map_keys_still_cache() {
    // "~^key" is a map-key string of length 5: eligible.
    let value = Value::Array(vec![
        Value::Map(vec![(Value::Str("^key".into()), Value::Int(1))]),
        Value::Map(vec![(Value::Str("^key".into()), Value::Int(2))]),
    ]);
    let wire = json(&value);
    assert_eq!(wire, r#"[["^ ","~^key",1],["^ ","^0",2]]"#);
    assert_eq!(decode(wire.as_bytes(), Format::Json).unwrap(), value);
}

#[test]
fn interior_reserved_characters_pass_through() {
    let value = Value::Array(vec![Value::Str("a~b^c`d".into())]);
    assert_eq!(json(&value), r#"["a~b^c`d"]"#);
}
