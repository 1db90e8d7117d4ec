use fmp4box::boxes::{Mfhd, Moof, Traf, Trun, TrunSample, TRUN_SAMPLE_DURATION, TRUN_SAMPLE_SIZE};
use fmp4box::{BoxRead, ChildSequence, ChildSequenceMut, VersionFlagsMut};

#[test]
fn append_and_count() {
    let mut moof = Moof::new();
    assert_eq!(moof.content_count(), 0);

    let mut mfhd = Mfhd::new();
    mfhd.set_sequence_number(1).unwrap();
    moof.append(&mfhd).unwrap();
    assert_eq!(moof.content_count(), 1);

    let traf = Traf::new();
    moof.append(&traf).unwrap();
    assert_eq!(moof.content_count(), 2);

    assert_eq!(moof.content(0).unwrap().box_type().0, *b"mfhd");
    assert_eq!(moof.content(1).unwrap().box_type().0, *b"traf");
    assert_eq!(moof.boxed_size(), 8 + 16 + 8);
}

#[test]
fn set_content_at_count_appends_without_touching_prior_children() {
    let mut moof = Moof::new();
    let mut mfhd = Mfhd::new();
    mfhd.set_sequence_number(7).unwrap();
    moof.set_content(&mfhd, 0).unwrap();

    let before = moof.content(0).unwrap().as_bytes().to_vec();
    let count = moof.content_count();
    moof.set_content(&Traf::new(), count).unwrap();

    assert_eq!(moof.content_count(), count + 1);
    assert_eq!(moof.content(0).unwrap().as_bytes(), &before[..]);
}

#[test]
fn replacing_a_child_resizes_its_span_in_place() {
    let mut moof = Moof::new();
    moof.append(&Mfhd::new()).unwrap();
    moof.append(&Traf::new()).unwrap();

    let mut trun = Trun::new();
    trun.set_flags(TRUN_SAMPLE_DURATION | TRUN_SAMPLE_SIZE).unwrap();
    trun.set_sample(1, TrunSample::default()).unwrap();
    moof.set_content(&trun, 0).unwrap();

    assert_eq!(moof.content_count(), 2);
    assert_eq!(moof.content(0).unwrap().box_type().0, *b"trun");
    assert_eq!(moof.content(1).unwrap().box_type().0, *b"traf");
    assert_eq!(moof.payload_size(), trun.boxed_size() + 8);
}

#[test]
fn insert_past_count_is_an_error() {
    let mut moof = Moof::new();
    assert!(moof.set_content(&Mfhd::new(), 1).is_err());
    assert!(moof.content(0).is_err());
}

#[test]
fn shrinking_replacement_preserves_later_children() {
    let mut moof = Moof::new();
    let mut trun = Trun::new();
    trun.set_flags(TRUN_SAMPLE_DURATION | TRUN_SAMPLE_SIZE).unwrap();
    trun.set_sample(3, TrunSample::default()).unwrap();
    moof.append(&trun).unwrap();
    let mut mfhd = Mfhd::new();
    mfhd.set_sequence_number(9).unwrap();
    moof.append(&mfhd).unwrap();

    let original = moof.boxed_size();
    moof.set_content(&Mfhd::new(), 0).unwrap();
    assert!(moof.boxed_size() < original);
    let tail = moof.content(1).unwrap();
    assert_eq!(tail.box_type().0, *b"mfhd");
    assert_eq!(tail.as_bytes(), mfhd.as_bytes());
}
