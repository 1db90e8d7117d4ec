use fmp4box::boxes::{Mfhd, Moof, Trun, TrunSample, TRUN_SAMPLE_SIZE};
use fmp4box::{pretty, BoxBuf, ChildSequenceMut, FourCC, VersionFlagsMut};

#[test]
fn container_tree_renders_children_with_fields() {
    let mut moof = Moof::new();
    let mut mfhd = Mfhd::new();
    mfhd.set_sequence_number(42).unwrap();
    moof.append(&mfhd).unwrap();
    let mut trun = Trun::new();
    trun.set_flags(TRUN_SAMPLE_SIZE).unwrap();
    trun.set_sample(0, TrunSample { size: 321, ..TrunSample::default() }).unwrap();
    moof.append(&trun).unwrap();

    let text = moof.to_pretty_string(0);
    assert!(text.contains("[moof]"));
    assert!(text.contains("[mfhd]"));
    assert!(text.contains("sequence_number: 42"));
    assert!(text.contains("[trun]"));
    assert!(text.contains("size: 321"));
}

#[test]
fn unknown_box_falls_back_to_hex_dump() {
    let mut data = vec![0, 0, 0, 12];
    data.extend_from_slice(b"zzzz");
    data.extend_from_slice(&[0x41, 0x42, 0x43, 0x44]);
    let b = BoxBuf::from_bytes(data).unwrap();

    let text = pretty::box_to_string(&b, 0);
    assert!(text.contains("[zzzz]"));
    assert!(text.contains("41 42 43 44"));
    assert!(text.contains("|ABCD|"));
}

#[test]
fn dispatch_handles_nested_unknown_children() {
    let mut moof = Moof::new();
    moof.append(&BoxBuf::new(FourCC(*b"wxyz"))).unwrap();
    let text = pretty::box_to_string(&moof, 0);
    assert!(text.contains("[moof]"));
    assert!(text.contains("[wxyz]"));
}
