use fmp4box::boxes::{Tfrf, UuidBox, UUID_TFRF};
use fmp4box::BoxRead;

#[test]
fn uuid_roundtrip() {
    let mut u = UuidBox::new();
    u.set_uuid(&UUID_TFRF).unwrap();
    assert_eq!(u.uuid().unwrap(), UUID_TFRF);
    assert_eq!(u.uuid_string().unwrap(), "d4807ef2-ca39-4695-8e54-26cb9e46a79f");
}

#[test]
fn uuid_string_parsing() {
    let mut u = UuidBox::new();
    u.set_uuid_string("d4807ef2-ca39-4695-8e54-26cb9e46a79f").unwrap();
    assert_eq!(u.uuid().unwrap(), UUID_TFRF);

    u.set_uuid_string("D4807EF2CA3946958E5426CB9E46A79F").unwrap();
    assert_eq!(u.uuid().unwrap(), UUID_TFRF);

    assert!(u.set_uuid_string("not-a-uuid").is_err());
}

#[test]
fn tfrf_entries_grow_and_read_back() {
    let mut t = Tfrf::new();
    assert_eq!(t.version().unwrap(), 1);
    assert_eq!(t.fragment_count().unwrap(), 0);

    t.set_time(0, 10_000_000_000).unwrap();
    t.set_duration(0, 20_000_000).unwrap();
    t.set_time(1, 30_000_000_000).unwrap();
    t.set_duration(1, 40_000_000).unwrap();

    assert_eq!(t.fragment_count().unwrap(), 2);
    assert_eq!(t.time(0).unwrap(), 10_000_000_000);
    assert_eq!(t.duration(0).unwrap(), 20_000_000);
    assert_eq!(t.time(1).unwrap(), 30_000_000_000);
    assert_eq!(t.duration(1).unwrap(), 40_000_000);
    assert!(t.time(2).is_err());
    // uuid (16) + version/flags (4) + count (1) + two 16-byte entries
    assert_eq!(t.payload_size(), 21 + 32);
}

#[test]
fn tfrf_version0_uses_narrow_entries() {
    let mut t = Tfrf::new();
    t.set_version(0).unwrap();
    t.set_time(0, 90_000).unwrap();
    t.set_duration(0, 3_000).unwrap();
    assert_eq!(t.time(0).unwrap(), 90_000);
    assert_eq!(t.duration(0).unwrap(), 3_000);
    assert_eq!(t.payload_size(), 21 + 8);
}

#[test]
fn tfrf_dispatch_requires_matching_uuid() {
    let t = Tfrf::new();
    let buf = t.into_inner();
    let again = Tfrf::from_box(buf).unwrap();
    assert_eq!(again.fragment_count().unwrap(), 0);

    // a generic uuid box with a different identifier is rejected
    let plain = UuidBox::new().into_inner();
    assert!(Tfrf::from_box(plain).is_err());
}
