#![allow(non_snake_case)]

use super::*;

fn varint(mut value: u64) -> Vec<u8> {
    let mut out = Vec::new();
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return out;
        }
        out.push(byte | 0x80);
    }
}

fn tag(field_number: u32, wire_type: u8) -> Vec<u8> {
    varint((u64::from(field_number) << 3) | u64::from(wire_type))
}

fn bytes_field(field_number: u32, payload: &[u8]) -> Vec<u8> {
    let mut out = tag(field_number, 2);
    out.extend(varint(payload.len() as u64));
    out.extend_from_slice(payload);
    out
}

fn varint_field(field_number: u32, value: u64) -> Vec<u8> {
    let mut out = tag(field_number, 0);
    out.extend(varint(value));
    out
}

// decode_varint tests

#[test]
fn decode_varint___single_byte___returns_value_and_length() {
    assert_eq!(decode_varint(&[0x08]), Some((8, 1)));
}

#[test]
fn decode_varint___multi_byte___combines_groups_little_endian() {
    assert_eq!(decode_varint(&[0xac, 0x02]), Some((300, 2)));
}

#[test]
fn decode_varint___trailing_bytes___are_not_consumed() {
    assert_eq!(decode_varint(&[0x01, 0xff, 0xff]), Some((1, 1)));
}

#[test]
fn decode_varint___max_u64___decodes_in_ten_bytes() {
    let encoded = varint(u64::MAX);

    assert_eq!(encoded.len(), MAX_VARINT_LEN);
    assert_eq!(decode_varint(&encoded), Some((u64::MAX, 10)));
}

#[test]
fn decode_varint___eleven_continuation_bytes___returns_none() {
    let encoded = [0xffu8; 11];

    assert_eq!(decode_varint(&encoded), None);
}

#[test]
fn decode_varint___empty_input___returns_none() {
    assert_eq!(decode_varint(&[]), None);
}

// find_field tests

#[test]
fn find_field___length_delimited_match___returns_exact_bytes() {
    let blob = bytes_field(7, b"plan:pro");

    let value = find_field(&blob, 7);

    assert_eq!(value.and_then(|v| v.as_bytes()), Some(&b"plan:pro"[..]));
}

#[test]
fn find_field___other_field_number___returns_none() {
    let blob = bytes_field(7, b"plan:pro");

    assert!(find_field(&blob, 8).is_none());
}

#[test]
fn find_field___truncated_payload___returns_none() {
    let mut blob = bytes_field(7, b"plan:pro");
    blob.truncate(blob.len() - 3);

    assert!(find_field(&blob, 7).is_none());
}

#[test]
fn find_field___skips_every_supported_wire_type() {
    let mut blob = varint_field(1, 300);
    blob.extend(tag(2, 1));
    blob.extend_from_slice(&42u64.to_le_bytes());
    blob.extend(bytes_field(3, b"skip me"));
    blob.extend(tag(4, 5));
    blob.extend_from_slice(&7u32.to_le_bytes());
    blob.extend(varint_field(9, 1));

    assert_eq!(find_field(&blob, 9), Some(WireValue::Varint(1)));
    assert_eq!(find_field(&blob, 2), Some(WireValue::Fixed64(42)));
    assert_eq!(find_field(&blob, 4), Some(WireValue::Fixed32(7)));
}

#[test]
fn find_field___match_before_corruption___is_still_found() {
    let mut blob = varint_field(1, 5);
    blob.extend_from_slice(&[0xff, 0xff]);

    assert_eq!(find_field(&blob, 1), Some(WireValue::Varint(5)));
}

#[test]
fn find_field___match_after_corruption___is_absent() {
    let mut blob = tag(1, 2);
    blob.extend(varint(100));
    blob.extend(varint_field(2, 5));

    assert!(find_field(&blob, 2).is_none());
}

#[test]
fn find_field___group_wire_type___aborts_walk() {
    let mut blob = tag(1, 3);
    blob.extend(varint_field(2, 5));

    assert!(find_field(&blob, 2).is_none());
}

#[test]
fn find_field___first_occurrence___wins() {
    let mut blob = varint_field(5, 1);
    blob.extend(varint_field(5, 2));

    assert_eq!(find_field(&blob, 5), Some(WireValue::Varint(1)));
}

#[test]
fn find_field___extension_sized_field_number___is_found() {
    let blob = bytes_field(50000, b"");

    assert_eq!(find_field(&blob, 50000), Some(WireValue::Bytes(&[])));
}

// find_all tests

#[test]
fn find_all___repeated_strings___returns_in_order() {
    let mut blob = bytes_field(1, b"free");
    blob.extend(varint_field(2, 9));
    blob.extend(bytes_field(1, b"pro"));

    let plans: Vec<&str> = find_all(&blob, 1).iter().filter_map(|v| v.as_str()).collect();

    assert_eq!(plans, vec!["free", "pro"]);
}

#[test]
fn find_all___corrupt_tail___keeps_values_before_it() {
    let mut blob = varint_field(1, 10);
    blob.extend(varint_field(1, 11));
    blob.push(0x80);

    assert_eq!(
        find_all(&blob, 1),
        vec![WireValue::Varint(10), WireValue::Varint(11)]
    );
}

// packed_varints tests

#[test]
fn packed_varints___run_of_varints___decodes_all() {
    let mut run = varint(1);
    run.extend(varint(300));
    run.extend(varint(2));

    assert_eq!(packed_varints(&run), vec![1, 300, 2]);
}

#[test]
fn packed_varints___truncated_last_element___is_dropped() {
    let mut run = varint(4);
    run.push(0x80);

    assert_eq!(packed_varints(&run), vec![4]);
}

#[test]
fn WireValue___packed_from_bytes_field___unpacks_elements() {
    let mut run = varint(3);
    run.extend(varint(4));
    let blob = bytes_field(1, &run);

    let value = find_field(&blob, 1).unwrap();

    assert_eq!(value.packed(), vec![3, 4]);
}

#[test]
fn WireValue___packed_from_single_varint___yields_one() {
    assert_eq!(WireValue::Varint(9).packed(), vec![9]);
}

// nested lookup tests

#[test]
fn WireValue___nested___walks_sub_blob() {
    let inner = bytes_field(1, b"users");
    let blob = bytes_field(50000, &inner);

    let collection = find_field(&blob, 50000).and_then(|v| v.nested(1));

    assert_eq!(collection.and_then(|v| v.as_str()), Some("users"));
}

#[test]
fn WireValue___as_str_invalid_utf8___returns_none() {
    let value = WireValue::Bytes(&[0xff, 0xfe]);

    assert_eq!(value.as_str(), None);
    assert!(value.as_bytes().is_some());
}

#[test]
fn WireValue___accessors___reject_other_wire_types() {
    let value = WireValue::Varint(1);

    assert_eq!(value.as_bytes(), None);
    assert_eq!(value.as_fixed64(), None);
    assert_eq!(value.as_bool(), Some(true));
}

// ExtensionValue tests

#[test]
fn ExtensionValue___present_field___exposes_raw_payload() {
    let blob = bytes_field(50000, &bytes_field(2, b"user_id"));
    let ext = ExtensionValue::new(&blob, 50000);

    assert!(ext.is_present());
    assert_eq!(ext.field_number(), 50000);
    assert_eq!(
        ext.child(2).and_then(|c| c.value()).and_then(|v| v.as_str()),
        Some("user_id")
    );
}

#[test]
fn ExtensionValue___absent_field___has_no_child() {
    let blob = varint_field(1, 1);
    let ext = ExtensionValue::new(&blob, 50000);

    assert!(!ext.is_present());
    assert!(ext.raw().is_none());
    assert!(ext.child(1).is_none());
}

#[test]
fn ExtensionValue___repeated_queries___are_identical() {
    let blob = bytes_field(3, b"abc");
    let ext = ExtensionValue::new(&blob, 3);

    assert_eq!(ext.raw(), ext.raw());
}

// Fields iterator tests

#[test]
fn Fields___clean_input___reports_no_error() {
    let blob = varint_field(1, 1);
    let mut walk = fields(&blob);

    assert_eq!(walk.next(), Some((1, WireValue::Varint(1))));
    assert_eq!(walk.next(), None);
    assert_eq!(walk.error(), None);
}

#[test]
fn Fields___length_past_end___records_out_of_range() {
    let mut blob = tag(1, 2);
    blob.extend(varint(9));
    blob.push(b'x');
    let mut walk = fields(&blob);

    assert_eq!(walk.next(), None);
    assert_eq!(
        walk.error(),
        Some(WireError::LengthOutOfRange {
            length: 9,
            remaining: 1
        })
    );
}

#[test]
fn Fields___field_number_zero___records_invalid_field() {
    let blob = [0x00, 0x01];
    let mut walk = fields(&blob);

    assert_eq!(walk.next(), None);
    assert_eq!(walk.error(), Some(WireError::InvalidFieldNumber(0)));
}

#[test]
fn Fields___after_error___stays_exhausted() {
    let blob = [0x0f];
    let mut walk = fields(&blob);

    assert_eq!(walk.next(), None);
    assert_eq!(walk.next(), None);
    assert_eq!(walk.error(), Some(WireError::UnsupportedWireType(7)));
}
