use fmp4box::boxes::{
    Mehd, Mfhd, Mfro, Tfhd, Tfra, TfraEntry, Trex, Trun, TrunSample,
    trun_sample_stride, SAMPLE_IS_IPICTURE, TFHD_BASE_DATA_OFFSET,
    TFHD_DEFAULT_SAMPLE_SIZE, TRUN_DATA_OFFSET, TRUN_FIRST_SAMPLE_FLAGS,
    TRUN_SAMPLE_DURATION, TRUN_SAMPLE_FLAGS, TRUN_SAMPLE_SIZE,
};
use fmp4box::{BoxBuf, BoxRead, FourCC, VersionFlags, VersionFlagsMut};

#[test]
fn mfhd_parse_mutate_roundtrip() {
    let data: Vec<u8> = vec![
        0x00, 0x00, 0x00, 0x10, 0x6D, 0x66, 0x68, 0x64,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x2A,
    ];
    let mut mfhd = Mfhd::from_box(BoxBuf::from_bytes(data.clone()).unwrap()).unwrap();
    assert_eq!(mfhd.version().unwrap(), 0);
    assert_eq!(mfhd.flags().unwrap(), 0);
    assert_eq!(mfhd.sequence_number().unwrap(), 42);

    mfhd.set_sequence_number(100).unwrap();
    assert_eq!(mfhd.boxed_size(), 16);
    assert_eq!(mfhd.sequence_number().unwrap(), 100);
    assert_eq!(&mfhd.as_bytes()[..12], &data[..12]);
}

#[test]
fn mfhd_wrapper_rejects_other_tags() {
    let b = BoxBuf::new(FourCC(*b"free"));
    assert!(Mfhd::from_box(b).is_err());
}

#[test]
fn trun_stride_matches_selected_fields() {
    assert_eq!(trun_sample_stride(TRUN_SAMPLE_DURATION | TRUN_SAMPLE_SIZE), 8);
    assert_eq!(trun_sample_stride(0), 0);
    assert_eq!(
        trun_sample_stride(TRUN_SAMPLE_DURATION | TRUN_SAMPLE_SIZE | TRUN_SAMPLE_FLAGS),
        12
    );

    let mut trun = Trun::new();
    trun.set_flags(TRUN_SAMPLE_DURATION | TRUN_SAMPLE_SIZE).unwrap();
    for i in 0..3u32 {
        let s = TrunSample { duration: 100 + i, size: 1000 + i, ..TrunSample::default() };
        trun.set_sample(i, s).unwrap();
    }

    assert_eq!(trun.sample_count().unwrap(), 3);
    // head (version/flags + count) plus three 8-byte records
    assert_eq!(trun.payload_size(), 8 + 24);
    let s = trun.sample(1).unwrap();
    assert_eq!(s.duration, 101);
    assert_eq!(s.size, 1001);
    assert_eq!(s.flags, 0);
    assert!(trun.sample(3).is_err());
}

#[test]
fn trun_head_fields_are_flag_gated() {
    let mut trun = Trun::new();
    assert!(trun.set_data_offset(99).is_err());
    assert!(trun.data_offset().is_err());

    trun.set_flags(TRUN_DATA_OFFSET | TRUN_FIRST_SAMPLE_FLAGS | TRUN_SAMPLE_SIZE).unwrap();
    trun.set_data_offset(64).unwrap();
    trun.set_first_sample_flags(SAMPLE_IS_IPICTURE).unwrap();
    trun.set_sample(0, TrunSample { size: 512, ..TrunSample::default() }).unwrap();

    assert_eq!(trun.data_offset().unwrap(), 64);
    assert_eq!(trun.first_sample_flags().unwrap(), SAMPLE_IS_IPICTURE);
    assert_eq!(trun.sample(0).unwrap().size, 512);
    assert_eq!(trun.payload_size(), 8 + 4 + 4 + 4);
}

#[test]
fn trun_write_past_end_zero_fills_gap() {
    let mut trun = Trun::new();
    trun.set_flags(TRUN_SAMPLE_SIZE).unwrap();
    trun.set_sample(2, TrunSample { size: 7, ..TrunSample::default() }).unwrap();
    assert_eq!(trun.sample_count().unwrap(), 3);
    assert_eq!(trun.sample(0).unwrap().size, 0);
    assert_eq!(trun.sample(2).unwrap().size, 7);
}

#[test]
fn tfhd_flag_selected_fields() {
    let mut tfhd = Tfhd::new();
    tfhd.set_track_id(1).unwrap();
    assert_eq!(tfhd.track_id().unwrap(), 1);
    assert!(tfhd.base_data_offset().is_err());

    tfhd.set_flags(TFHD_BASE_DATA_OFFSET | TFHD_DEFAULT_SAMPLE_SIZE).unwrap();
    tfhd.set_base_data_offset(1 << 40).unwrap();
    tfhd.set_default_sample_size(888).unwrap();

    assert_eq!(tfhd.base_data_offset().unwrap(), 1 << 40);
    assert_eq!(tfhd.default_sample_size().unwrap(), 888);
    assert!(tfhd.default_sample_duration().is_err());
    assert_eq!(tfhd.payload_size(), 8 + 8 + 4);
}

#[test]
fn trex_defaults_roundtrip() {
    let mut trex = Trex::new();
    assert_eq!(trex.default_sample_description_index().unwrap(), 1);
    trex.set_track_id(2).unwrap();
    trex.set_default_sample_duration(3600).unwrap();
    trex.set_default_sample_size(4096).unwrap();
    trex.set_default_sample_flags(0x0101_0000).unwrap();

    assert_eq!(trex.track_id().unwrap(), 2);
    assert_eq!(trex.default_sample_duration().unwrap(), 3600);
    assert_eq!(trex.default_sample_size().unwrap(), 4096);
    assert_eq!(trex.default_sample_flags().unwrap(), 0x0101_0000);
    assert_eq!(trex.boxed_size(), 32);
}

#[test]
fn mehd_widens_with_version() {
    let mut mehd = Mehd::new();
    mehd.set_fragment_duration(5000).unwrap();
    assert_eq!(mehd.fragment_duration().unwrap(), 5000);
    assert_eq!(mehd.boxed_size(), 16);

    let mut wide = Mehd::from_box(BoxBuf::with_payload(FourCC(*b"mehd"), 12)).unwrap();
    wide.set_version(1).unwrap();
    wide.set_fragment_duration(1 << 35).unwrap();
    assert_eq!(wide.fragment_duration().unwrap(), 1 << 35);
}

#[test]
fn tfra_selector_driven_stride() {
    let mut tfra = Tfra::new();
    tfra.set_track_id(3).unwrap();
    tfra.set_length_size_of_traf_num(1).unwrap();
    tfra.set_length_size_of_trun_num(0).unwrap();
    tfra.set_length_size_of_sample_num(3).unwrap();

    assert_eq!(tfra.length_size_of_traf_num().unwrap(), 1);
    assert_eq!(tfra.length_size_of_trun_num().unwrap(), 0);
    assert_eq!(tfra.length_size_of_sample_num().unwrap(), 3);
    // 4 + 4 time/offset, then 2 + 1 + 4 selector-sized numbers
    assert_eq!(tfra.entry_size().unwrap(), 15);

    let e = TfraEntry {
        time: 90_000,
        moof_offset: 4096,
        traf_number: 1,
        trun_number: 2,
        sample_number: 70_000,
    };
    tfra.set_entry(0, e).unwrap();
    tfra.set_entry(1, TfraEntry { time: 180_000, ..e }).unwrap();

    assert_eq!(tfra.number_of_entry().unwrap(), 2);
    assert_eq!(tfra.entry(0).unwrap(), e);
    assert_eq!(tfra.entry(1).unwrap().time, 180_000);
    assert_eq!(tfra.payload_size(), 16 + 2 * 15);
}

#[test]
fn tfra_version1_wide_entries() {
    let mut tfra = Tfra::new();
    tfra.set_version(1).unwrap();
    assert_eq!(tfra.entry_size().unwrap(), 19);

    let e = TfraEntry {
        time: 1 << 40,
        moof_offset: 1 << 33,
        traf_number: 1,
        trun_number: 1,
        sample_number: 1,
    };
    tfra.set_entry(0, e).unwrap();
    assert_eq!(tfra.entry(0).unwrap(), e);
}

#[test]
fn mfro_size_field() {
    let mut mfro = Mfro::new();
    mfro.set_mfra_size(1234).unwrap();
    assert_eq!(mfro.mfra_size().unwrap(), 1234);
    assert_eq!(mfro.boxed_size(), 16);
}
