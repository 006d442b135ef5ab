//! End-to-end decode fixtures: pinned hex vectors and the cross-cutting
//! properties (endianness equivalence, purity, input normalization, output
//! shape).

use serde_json::json;
use wkbtree_core::{decode, decode_header, Decoder, Kind, Value, WkbTreeError};

/// Build the big-endian and little-endian encodings of the same logical
/// POINT, optionally with an SRID.
fn point_both_orders(x: f64, y: f64, srid: Option<i32>) -> (Vec<u8>, Vec<u8>) {
    let mut type_word = 1u32;
    if srid.is_some() {
        type_word |= 0x2000_0000;
    }

    let mut be = vec![0x00];
    be.extend_from_slice(&type_word.to_be_bytes());
    if let Some(s) = srid {
        be.extend_from_slice(&s.to_be_bytes());
    }
    be.extend_from_slice(&x.to_be_bytes());
    be.extend_from_slice(&y.to_be_bytes());

    let mut le = vec![0x01];
    le.extend_from_slice(&type_word.to_le_bytes());
    if let Some(s) = srid {
        le.extend_from_slice(&s.to_le_bytes());
    }
    le.extend_from_slice(&x.to_le_bytes());
    le.extend_from_slice(&y.to_le_bytes());

    (be, le)
}

#[test]
fn spec_point_vector() {
    let geom = decode("01010000003D0AD7A3701D41400000000000C055C0").unwrap();
    assert_eq!(
        geom.to_json().unwrap(),
        json!({"type": "POINT", "srid": null, "value": [34.23, -87.0]})
    );
}

#[test]
fn spec_empty_point_vector() {
    let geom = decode("0101000000000000000000F87F000000000000F87F").unwrap();
    assert_eq!(
        geom.to_json().unwrap(),
        json!({"type": "POINT", "srid": null, "value": []})
    );
}

#[test]
fn spec_multipoint_vector() {
    let geom = decode(
        "010400000004000000\
         010100000000000000000000000000000000000000\
         010100000000000000000024400000000000000000\
         010100000000000000000024400000000000002440\
         010100000000000000000000000000000000002440",
    )
    .unwrap();
    assert_eq!(
        geom.to_json().unwrap(),
        json!({
            "type": "MULTIPOINT",
            "srid": null,
            "value": [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]]
        })
    );
}

#[test]
fn spec_invalid_byte_order_vector() {
    let err = decode("0301000000").unwrap_err();
    assert!(matches!(err, WkbTreeError::InvalidByteOrder(3)));
}

#[test]
fn spec_unsupported_type_vector() {
    let err = decode("0115000000").unwrap_err();
    assert!(matches!(err, WkbTreeError::UnsupportedType(21)));
}

#[test]
fn both_byte_orders_decode_to_the_same_tree() {
    let (be, le) = point_both_orders(10.0, -20.0, None);
    assert_eq!(decode(&be).unwrap(), decode(&le).unwrap());

    let (be, le) = point_both_orders(34.23, -87.0, Some(4326));
    let from_be = decode(&be).unwrap();
    let from_le = decode(&le).unwrap();
    assert_eq!(from_be, from_le);
    assert_eq!(from_be.srid, Some(4326));
}

#[test]
fn decoding_is_pure() {
    let hex = "0101000020E6100000000000000000244000000000000034C0";
    let first = decode(hex).unwrap();
    let second = decode(hex).unwrap();
    assert_eq!(first, second);

    let mut decoder = Decoder::new();
    assert_eq!(decoder.decode(hex).unwrap(), first);
    assert_eq!(decoder.decode(hex).unwrap(), first);
}

#[test]
fn hex_and_binary_presentations_decode_identically() {
    let hex = "0101000020E6100000000000000000244000000000000034C0";
    let (_, binary) = point_both_orders(10.0, -20.0, Some(4326));

    let from_binary = decode(&binary).unwrap();
    for presentation in [
        hex.to_string(),
        hex.to_lowercase(),
        format!("0x{hex}"),
        format!("0X{}", hex.to_lowercase()),
        format!("x{hex}"),
    ] {
        assert_eq!(decode(&presentation).unwrap(), from_binary, "{presentation}");
    }
}

#[test]
fn dimension_suffix_matrix() {
    // Each body is X=1, Y=2, then Z and/or M ordinates.
    let cases = [
        ("0101000000000000000000F03F0000000000000040", "POINT", 2),
        (
            "0101000080000000000000F03F00000000000000400000000000000840",
            "POINT Z",
            3,
        ),
        (
            "0101000040000000000000F03F00000000000000400000000000000840",
            "POINT M",
            3,
        ),
        (
            "01010000C0000000000000F03F000000000000004000000000000008400000000000001040",
            "POINT ZM",
            4,
        ),
    ];
    for (hex, name, arity) in cases {
        let geom = decode(hex).unwrap();
        assert_eq!(geom.type_name(), name);
        match &geom.value {
            Value::Point(coords) => assert_eq!(coords.len(), arity, "{name}"),
            other => panic!("expected Point, got {other:?}"),
        }
    }
}

#[test]
fn zm_tuple_is_ordered_x_y_z_m() {
    // POINT ZM (1 2 3 4): Z precedes M on the wire and in the tree.
    let geom = decode(
        "01010000C0000000000000F03F000000000000004000000000000008400000000000001040",
    )
    .unwrap();
    assert_eq!(geom.value, Value::Point(vec![1.0, 2.0, 3.0, 4.0]));
}

#[test]
fn collection_members_inherit_parent_arity() {
    // GEOMETRYCOLLECTION Z with one POINT member: member tuples carry Z.
    let mut blob = vec![0x01];
    blob.extend_from_slice(&(7u32 | 0x8000_0000).to_le_bytes());
    blob.extend_from_slice(&1u32.to_le_bytes());
    blob.push(0x01);
    blob.extend_from_slice(&1u32.to_le_bytes());
    for v in [1.0f64, 2.0, 3.0] {
        blob.extend_from_slice(&v.to_le_bytes());
    }

    let geom = decode(&blob).unwrap();
    assert_eq!(geom.type_name(), "GEOMETRYCOLLECTION Z");
    match &geom.value {
        Value::Collection(members) => {
            assert_eq!(members[0].value, Value::Point(vec![1.0, 2.0, 3.0]));
        }
        other => panic!("expected Collection, got {other:?}"),
    }
}

#[test]
fn collection_json_shape_has_no_member_srid() {
    let geom = decode(
        "010700000002000000\
         0101000000000000000000244000000000000034C0\
         010200000002000000\
         00000000000000000000000000000000\
         000000000000F03F000000000000F03F",
    )
    .unwrap();
    assert_eq!(
        geom.to_json().unwrap(),
        json!({
            "type": "GEOMETRYCOLLECTION",
            "srid": null,
            "value": [
                {"type": "POINT", "value": [10.0, -20.0]},
                {"type": "LINESTRING", "value": [[0.0, 0.0], [1.0, 1.0]]},
            ]
        })
    );
}

#[test]
fn every_decodable_kind_round_trips_through_json() {
    let fixtures = [
        // POINT(10 -20)
        "0101000000000000000000244000000000000034C0",
        // LINESTRING(10 -20, 0 -0.5)
        "010200000002000000000000000000244000000000000034C00000000000000000000000000000E0BF",
        // POLYGON((0 0, 10 0, 10 10, 0 0))
        "0103000000010000000400000000000000000000000000000000000000000000000000244000000000000000000000000000002440000000000000244000000000000000000000000000000000",
        // MULTIPOINT(0 0, 10 0)
        "010400000002000000010100000000000000000000000000000000000000010100000000000000000024400000000000000000",
        // MULTILINESTRING((0 0, 1 1))
        "01050000000100000001020000000200000000000000000000000000000000000000000000000000F03F000000000000F03F",
        // MULTIPOLYGON(((0 0, 10 0, 10 10, 0 0)))
        "0106000000010000000103000000010000000400000000000000000000000000000000000000000000000000244000000000000000000000000000002440000000000000244000000000000000000000000000000000",
        // GEOMETRYCOLLECTION(POINT(10 -20))
        "0107000000010000000101000000000000000000244000000000000034C0",
        // CIRCULARSTRING(0 0, 1 1, 2 0)
        "01080000000300000000000000000000000000000000000000000000000000F03F000000000000F03F00000000000000400000000000000000",
    ];
    for hex in fixtures {
        let geom = decode(hex).unwrap();
        let json = geom.to_json().unwrap();
        assert_eq!(json["type"], geom.type_name(), "{hex}");
        assert!(json["srid"].is_null(), "{hex}");
        assert!(json["value"].is_array(), "{hex}");
    }
}

#[test]
fn header_peek_agrees_with_full_decode() {
    let fixtures = [
        "0101000000000000000000244000000000000034C0",
        "0101000020E6100000000000000000244000000000000034C0",
        "010200000002000000000000000000244000000000000034C00000000000000000000000000000E0BF",
        "0107000000010000000101000000000000000000244000000000000034C0",
    ];
    for hex in fixtures {
        let hdr = decode_header(hex).unwrap();
        let geom = decode(hex).unwrap();
        assert_eq!(hdr.kind(), Some(geom.kind), "{hex}");
        assert_eq!(hdr.srid, geom.srid, "{hex}");
        assert_eq!(hdr.dims, geom.dims, "{hex}");
    }
}

#[test]
fn failures_never_yield_partial_results() {
    // Valid prefix (two complete points), then a truncated third element.
    let err = decode(
        "010400000003000000\
         010100000000000000000000000000000000000000\
         010100000000000000000024400000000000000000\
         01010000000000000000002440",
    )
    .unwrap_err();
    assert!(matches!(err, WkbTreeError::InsufficientInput { .. }));
}

#[test]
fn collection_path_rejects_collection_only_kinds() {
    // MULTISURFACE (12) resolves to a kind but has no body reader, on the
    // nested path just as at the top level.
    let top = decode("010C000000").unwrap_err();
    assert!(matches!(top, WkbTreeError::UnsupportedType(12)));

    let nested = decode("010700000001000000010C000000").unwrap_err();
    assert!(matches!(nested, WkbTreeError::UnsupportedType(12)));

    assert_eq!(Kind::from_code(12), Some(Kind::MultiSurface));
    assert_eq!(decode_header("010C000000").unwrap().kind(), Some(Kind::MultiSurface));
}
