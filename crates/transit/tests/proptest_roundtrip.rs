use proptest::prelude::*;
use transit::{decode, encode, Format, Value};

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        any::<f64>().prop_map(Value::Float),
        ".{0,12}".prop_map(Value::Str),
        proptest::collection::vec(any::<u8>(), 0..16).prop_map(Value::Bytes),
        "[a-z]{1,8}".prop_map(Value::keyword),
        "[a-z]{1,8}".prop_map(Value::symbol),
        // Outside i64 so the big integer does not narrow to a ground int.
        (1i128..1_000_000).prop_map(|d| Value::BigInt(i128::from(i64::MAX) + d)),
        (-1_000_000i128 - i128::from(i64::MAX)..-i128::from(i64::MAX) - 1)
            .prop_map(Value::BigInt),
        "[0-9]{1,20}\\.[0-9]{1,10}".prop_map(Value::BigDec),
        (-8_000_000_000_000i64..8_000_000_000_000).prop_map(|m| {
            Value::timestamp_millis(m).expect("millis in range")
        }),
        any::<u128>().prop_map(|u| Value::Uuid(uuid::Uuid::from_u128(u))),
        "[a-z]{1,10}".prop_map(|p| Value::Uri(format!("http://example.com/{p}"))),
        any::<char>().prop_map(Value::Char),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    arb_scalar().prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            proptest::collection::vec(inner.clone(), 0..4).prop_map(Value::Set),
            proptest::collection::vec(inner.clone(), 0..4).prop_map(Value::List),
            proptest::collection::vec((arb_scalar(), inner.clone()), 0..4)
                .prop_map(Value::Map),
            proptest::collection::vec((inner.clone(), inner.clone()), 1..3)
                .prop_map(Value::Map),
            // Tag prefix chosen to never collide with a built-in reader.
            ("x[a-z]{1,5}", inner).prop_map(|(t, v)| Value::tagged(t, v)),
        ]
    })
}

proptest! {
    #[test]
    fn round_trips_in_every_format(value in arb_value()) {
        for format in [Format::Json, Format::JsonVerbose, Format::MsgPack] {
            let bytes = encode(&value, format).unwrap();
            let back = decode(&bytes, format).unwrap();
            prop_assert_eq!(&back, &value, "format {:?}", format);
        }
    }

    #[test]
    fn compact_json_decodes_as_verbose_and_back(value in arb_value()) {
        // The JSON decoder is flavor-blind; what compact writes, the
        // verbose-configured decoder also reads.
        let bytes = encode(&value, Format::Json).unwrap();
        let back = decode(&bytes, Format::JsonVerbose).unwrap();
        prop_assert_eq!(&back, &value);
    }

    #[test]
    fn arbitrary_strings_survive_escaping(s in ".{0,40}") {
        let value = Value::Array(vec![Value::Str(s)]);
        for format in [Format::Json, Format::JsonVerbose, Format::MsgPack] {
            let bytes = encode(&value, format).unwrap();
            prop_assert_eq!(&decode(&bytes, format).unwrap(), &value);
        }
    }

    #[test]
    fn arbitrary_string_map_keys_survive(k in ".{1,24}", v in any::<i64>()) {
        let value = Value::Array(vec![
            Value::Map(vec![(Value::Str(k.clone()), Value::Int(v))]),
            Value::Map(vec![(Value::Str(k), Value::Int(v))]),
        ]);
        for format in [Format::Json, Format::JsonVerbose, Format::MsgPack] {
            let bytes = encode(&value, format).unwrap();
            prop_assert_eq!(&decode(&bytes, format).unwrap(), &value);
        }
    }
}
