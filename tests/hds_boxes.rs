use fmp4box::boxes::{
    Abst, Afra, AfraEntry, Afrt, Asrt, FragmentRun, GlobalAfraEntry, SegmentRun,
};
use fmp4box::BoxRead;

#[test]
fn abst_fixed_fields() {
    let mut abst = Abst::new();
    assert_eq!(abst.time_scale().unwrap(), 1000);

    abst.set_bootstrap_info_version(5).unwrap();
    abst.set_profile(1).unwrap();
    abst.set_live(true).unwrap();
    abst.set_update(true).unwrap();
    abst.set_current_media_time(123_456).unwrap();
    abst.set_smpte_time_code_offset(7).unwrap();

    assert_eq!(abst.bootstrap_info_version().unwrap(), 5);
    assert_eq!(abst.profile().unwrap(), 1);
    assert!(abst.live().unwrap());
    assert!(abst.update().unwrap());
    assert_eq!(abst.current_media_time().unwrap(), 123_456);
    assert_eq!(abst.smpte_time_code_offset().unwrap(), 7);

    abst.set_live(false).unwrap();
    assert!(!abst.live().unwrap());
    assert!(abst.update().unwrap());
}

#[test]
fn abst_string_sections_shift_coherently() {
    let mut abst = Abst::new();
    abst.set_movie_identifier("stream1").unwrap();
    abst.set_server_entry(0, "s1.example").unwrap();
    abst.set_server_entry(1, "s2.example").unwrap();
    abst.set_quality_entry(0, "hi").unwrap();
    abst.set_drm_data("drm").unwrap();
    abst.set_meta_data("meta").unwrap();

    assert_eq!(abst.server_entry_count().unwrap(), 2);
    assert_eq!(abst.quality_entry_count().unwrap(), 1);
    assert_eq!(abst.server_entry(0).unwrap(), "s1.example");
    assert_eq!(abst.server_entry(1).unwrap(), "s2.example");

    // replacing the first entry with a longer one shifts everything after it
    abst.set_server_entry(0, "much-longer-server-name").unwrap();
    assert_eq!(abst.server_entry(0).unwrap(), "much-longer-server-name");
    assert_eq!(abst.server_entry(1).unwrap(), "s2.example");
    assert_eq!(abst.quality_entry(0).unwrap(), "hi");
    assert_eq!(abst.drm_data().unwrap(), "drm");
    assert_eq!(abst.meta_data().unwrap(), "meta");
    assert_eq!(abst.movie_identifier().unwrap(), "stream1");

    assert!(abst.server_entry(2).is_err());
    assert!(abst.set_server_entry(4, "gap").is_err());
    assert_eq!(abst.boxed_size(), abst.as_bytes().len() as u64);
}

#[test]
fn abst_nested_run_tables() {
    let mut asrt = Asrt::new();
    asrt.set_segment_run(0, SegmentRun { first_segment: 1, fragments_per_segment: 20 }).unwrap();

    let mut afrt = Afrt::new();
    afrt.set_fragment_run(
        0,
        FragmentRun { first_fragment: 1, first_timestamp: 0, duration: 4000, discontinuity: 0 },
    )
    .unwrap();

    let mut abst = Abst::new();
    abst.set_segment_run_table(0, &asrt).unwrap();
    abst.set_fragment_run_table(0, &afrt).unwrap();

    assert_eq!(abst.segment_run_table_count().unwrap(), 1);
    assert_eq!(abst.fragment_run_table_count().unwrap(), 1);

    let table = abst.segment_run_table(0).unwrap();
    assert_eq!(table.segment_run(0).unwrap().fragments_per_segment, 20);
    let runs = abst.fragment_run_table(0).unwrap();
    assert_eq!(runs.fragment_run(0).unwrap().duration, 4000);
}

#[test]
fn asrt_quality_list_shifts_run_table() {
    let mut asrt = Asrt::new();
    asrt.set_update(1).unwrap();
    asrt.set_quality_entry(0, "hd").unwrap();
    asrt.set_segment_run(0, SegmentRun { first_segment: 1, fragments_per_segment: 10 }).unwrap();
    asrt.set_segment_run(1, SegmentRun { first_segment: 2, fragments_per_segment: 5 }).unwrap();

    assert_eq!(asrt.update().unwrap(), 1);
    assert_eq!(asrt.quality_entry(0).unwrap(), "hd");
    assert_eq!(asrt.segment_run_entry_count().unwrap(), 2);
    assert_eq!(asrt.segment_run(1).unwrap().first_segment, 2);

    asrt.set_quality_entry(1, "sd").unwrap();
    assert_eq!(asrt.quality_entry_count().unwrap(), 2);
    assert_eq!(asrt.segment_run(1).unwrap().first_segment, 2);
    assert!(asrt.segment_run(2).is_err());
}

#[test]
fn afrt_discontinuity_entries_carry_extra_byte() {
    let mut afrt = Afrt::new();
    afrt.set_time_scale(1000).unwrap();
    afrt.set_fragment_run(
        0,
        FragmentRun { first_fragment: 1, first_timestamp: 1000, duration: 4000, discontinuity: 0 },
    )
    .unwrap();
    let sz = afrt.boxed_size();

    afrt.set_fragment_run(
        1,
        FragmentRun { first_fragment: 0, first_timestamp: 0, duration: 0, discontinuity: 1 },
    )
    .unwrap();
    assert_eq!(afrt.boxed_size(), sz + 17);
    assert_eq!(afrt.fragment_run(1).unwrap().discontinuity, 1);

    // flipping entry 0 into a discontinuity grows it in place by one byte
    let mut first = afrt.fragment_run(0).unwrap();
    first.duration = 0;
    first.discontinuity = 2;
    afrt.set_fragment_run(0, first).unwrap();
    assert_eq!(afrt.boxed_size(), sz + 17 + 1);
    assert_eq!(afrt.fragment_run(0).unwrap().discontinuity, 2);
    assert_eq!(afrt.fragment_run(1).unwrap().discontinuity, 1);
}

#[test]
fn afra_selector_widths() {
    let mut afra = Afra::new();
    assert_eq!(afra.time_scale().unwrap(), 1000);
    afra.set_long_offsets(true).unwrap();

    afra.set_entry(0, AfraEntry { time: 1, offset: 1 << 33 }).unwrap();
    afra.set_entry(1, AfraEntry { time: 2, offset: 99 }).unwrap();

    assert_eq!(afra.entry_count().unwrap(), 2);
    assert_eq!(afra.entry(0).unwrap().offset, 1 << 33);
    assert_eq!(afra.entry(1).unwrap().time, 2);
    assert!(afra.entry(2).is_err());
    // 8-byte time plus 8-byte offset per entry
    assert_eq!(afra.payload_size(), 13 + 2 * 16);
}

#[test]
fn afra_global_entries_follow_local_table() {
    let mut afra = Afra::new();
    afra.set_long_offsets(true).unwrap();
    afra.set_global_entries(true).unwrap();
    afra.set_entry(0, AfraEntry { time: 10, offset: 20 }).unwrap();

    let g = GlobalAfraEntry {
        time: 90_000,
        segment: 3,
        fragment: 14,
        afra_offset: 1 << 34,
        offset_from_afra: 256,
    };
    afra.set_global_entry(0, g).unwrap();

    assert_eq!(afra.global_entry_count().unwrap(), 1);
    assert_eq!(afra.global_entry(0).unwrap(), g);
    // the local table is untouched
    assert_eq!(afra.entry(0).unwrap(), AfraEntry { time: 10, offset: 20 });
    assert!(afra.global_entry(1).is_err());
}

#[test]
fn afra_global_count_is_zero_without_flag() {
    let afra = Afra::new();
    assert_eq!(afra.global_entry_count().unwrap(), 0);
}
