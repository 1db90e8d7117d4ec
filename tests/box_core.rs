use fmp4box::{BoxBuf, BoxError, BoxMut, BoxRead, BoxView, BoxWrite, FourCC};

fn leaf(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut v = Vec::new();
    v.extend_from_slice(&((8 + payload.len()) as u32).to_be_bytes());
    v.extend_from_slice(tag);
    v.extend_from_slice(payload);
    v
}

#[test]
fn read_valid_box() {
    let data = leaf(b"free", &[1, 2, 3, 4]);
    let b = BoxBuf::from_bytes(data.clone()).unwrap();
    assert_eq!(b.boxed_size(), 12);
    assert_eq!(b.payload_size(), 4);
    assert!(b.is_type(FourCC(*b"free")));
    assert_eq!(b.as_bytes(), &data[..]);
}

#[test]
fn read_rejects_size_mismatch() {
    // size field says 10, actual length is 8
    let mut data = vec![0, 0, 0, 10];
    data.extend_from_slice(b"free");
    let mut b = BoxBuf::default();
    assert!(matches!(b.read(&data), Err(BoxError::MalformedInput(_))));
}

#[test]
fn read_rejects_truncated_header() {
    let mut b = BoxBuf::default();
    assert!(matches!(b.read(&[0, 0, 0]), Err(BoxError::MalformedInput(_))));
}

#[test]
fn read_accepts_streaming_size_zero() {
    let mut data = vec![0, 0, 0, 0];
    data.extend_from_slice(b"free");
    data.extend_from_slice(&[9, 9]);
    let b = BoxBuf::from_bytes(data).unwrap();
    // normalized to the actual length
    assert_eq!(b.boxed_size(), 10);
    assert_eq!(b.get_u32(0).unwrap(), 10);
}

#[test]
fn extended_size_reads_and_grows() {
    let mut data = vec![0, 0, 0, 1];
    data.extend_from_slice(b"test");
    data.extend_from_slice(&24u64.to_be_bytes());
    data.extend_from_slice(&[0xAA; 8]);
    let mut b = BoxBuf::from_bytes(data).unwrap();
    assert_eq!(b.header_len(), 16);
    assert_eq!(b.boxed_size(), 24);
    assert_eq!(b.payload_size(), 8);

    b.reserve(24, 0, 4).unwrap();
    assert_eq!(b.boxed_size(), 28);
    assert_eq!(b.as_bytes().len(), 28);
    assert_eq!(b.get_u32(0).unwrap(), 1);
    assert_eq!(b.get_u64(8).unwrap(), 28);
}

#[test]
fn extended_size_rejects_truncated_tail() {
    let mut data = vec![0, 0, 0, 1];
    data.extend_from_slice(b"test");
    data.extend_from_slice(&[0, 0]);
    assert!(BoxBuf::from_bytes(data).is_err());
}

#[test]
fn scalar_accessors_roundtrip_without_resizing() {
    let mut b = BoxBuf::with_payload(FourCC(*b"test"), 32);
    b.set_u8(8, 0xAB).unwrap();
    b.set_u16(9, 0x1234).unwrap();
    b.set_u24(11, 0xABCDEF).unwrap();
    b.set_u32(14, 0xDEADBEEF).unwrap();
    b.set_u64(18, 0x0102030405060708).unwrap();
    assert_eq!(b.get_u8(8).unwrap(), 0xAB);
    assert_eq!(b.get_u16(9).unwrap(), 0x1234);
    assert_eq!(b.get_u24(11).unwrap(), 0xABCDEF);
    assert_eq!(b.get_u32(14).unwrap(), 0xDEADBEEF);
    assert_eq!(b.get_u64(18).unwrap(), 0x0102030405060708);
    assert_eq!(b.boxed_size(), 40);
    assert_eq!(b.as_bytes().len(), 40);
}

#[test]
fn scalar_out_of_range_is_error() {
    let mut b = BoxBuf::new(FourCC(*b"test"));
    assert!(matches!(b.get_u32(8), Err(BoxError::IndexOutOfRange { .. })));
    assert!(matches!(b.set_u32(8, 1), Err(BoxError::IndexOutOfRange { .. })));
}

#[test]
fn set_string_grows_and_shrinks() {
    let mut b = BoxBuf::new(FourCC(*b"test"));
    b.set_string(b"hello world", 8).unwrap();
    assert_eq!(b.boxed_size(), 19);
    assert_eq!(b.get_string(8).unwrap(), b"hello world");

    b.set_string(b"hi", 8).unwrap();
    assert_eq!(b.boxed_size(), 10);
    assert_eq!(b.get_string(8).unwrap(), b"hi");
    assert_eq!(b.as_bytes().len(), 10);
}

#[test]
fn reserve_grow_then_shrink_restores_contents() {
    let mut b = BoxBuf::with_payload(FourCC(*b"test"), 8);
    b.set_u32(8, 111).unwrap();
    b.set_u32(12, 222).unwrap();
    let before = b.as_bytes().to_vec();

    b.reserve(12, 0, 16).unwrap();
    assert_eq!(b.boxed_size(), 32);
    // inserted range is zero-filled, tail shifted
    assert_eq!(b.get_u32(12).unwrap(), 0);
    assert_eq!(b.get_u32(28).unwrap(), 222);

    b.reserve(12, 16, 0).unwrap();
    assert_eq!(b.as_bytes(), &before[..]);
}

#[test]
fn reserve_rejects_out_of_range_span() {
    let mut b = BoxBuf::new(FourCC(*b"test"));
    assert!(matches!(b.reserve(4, 10, 20), Err(BoxError::IndexOutOfRange { .. })));
}

#[test]
fn clear_resets_to_zero_typed_shell() {
    let mut b = BoxBuf::with_payload(FourCC(*b"test"), 100);
    b.clear();
    assert_eq!(b.boxed_size(), 8);
    assert_eq!(b.payload_size(), 0);
    assert_eq!(b.box_type(), FourCC([0; 4]));
}

#[test]
fn borrowed_overlay_allows_same_length_writes_only() {
    let mut data = leaf(b"test", &[0; 8]);
    let mut m = BoxMut::new(&mut data).unwrap();
    m.set_u32(8, 42).unwrap();
    assert_eq!(m.get_u32(8).unwrap(), 42);

    // same-length tail replacement is fine
    m.set_string(b"abcd", 12).unwrap();
    assert_eq!(m.get_string(12).unwrap(), b"abcd");

    // growth on a borrowed overlay must fail
    assert!(matches!(m.set_string(b"abcdefgh", 12), Err(BoxError::ImmutableBuffer)));
    assert!(matches!(m.reserve(8, 0, 4), Err(BoxError::ImmutableBuffer)));
}

#[test]
fn nested_box_views_share_the_parent_buffer() {
    let child = leaf(b"chld", &[1, 2, 3, 4]);
    let data = leaf(b"prnt", &child);
    let b = BoxBuf::from_bytes(data).unwrap();
    let v = b.get_box(8).unwrap();
    assert_eq!(v.box_type(), FourCC(*b"chld"));
    assert_eq!(v.boxed_size(), 12);
    assert_eq!(v.payload(), &[1, 2, 3, 4]);
}

#[test]
fn set_box_appends_and_replaces_with_resize() {
    let mut b = BoxBuf::new(FourCC(*b"prnt"));
    let child = BoxBuf::from_bytes(leaf(b"chld", &[1, 2])).unwrap();
    b.set_box(&child, 8).unwrap();
    assert_eq!(b.boxed_size(), 18);

    let bigger = BoxBuf::from_bytes(leaf(b"chld", &[1, 2, 3, 4, 5, 6])).unwrap();
    b.set_box(&bigger, 8).unwrap();
    assert_eq!(b.boxed_size(), 22);
    assert_eq!(b.get_box(8).unwrap().payload(), &[1, 2, 3, 4, 5, 6]);
}

#[test]
fn view_validates_frame() {
    assert!(BoxView::new(&[0, 0, 0, 9, b'a', b'b', b'c', b'd']).is_err());
    let data = leaf(b"test", &[]);
    let v = BoxView::new(&data).unwrap();
    assert_eq!(v.boxed_size(), 8);
    assert_eq!(v.to_buf().unwrap().as_bytes(), &data[..]);
}
