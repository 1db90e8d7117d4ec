use fmp4box::boxes::{Dref, Ftyp, Hdlr, Mdhd, Mvhd, Smhd, Tkhd, Url, Vmhd};
use fmp4box::{BoxBuf, BoxRead, ChildSequence, FourCC, VersionFlags, VersionFlagsMut};

#[test]
fn ftyp_brands() {
    let mut ftyp = Ftyp::new();
    ftyp.set_major_brand(FourCC(*b"isom")).unwrap();
    ftyp.set_minor_version(512).unwrap();
    ftyp.set_compatible_brand(0, FourCC(*b"isom")).unwrap();
    ftyp.set_compatible_brand(1, FourCC(*b"avc1")).unwrap();

    assert_eq!(ftyp.major_brand().unwrap(), FourCC(*b"isom"));
    assert_eq!(ftyp.minor_version().unwrap(), 512);
    assert_eq!(ftyp.compatible_brands_count(), 2);
    assert_eq!(ftyp.compatible_brand(1).unwrap(), FourCC(*b"avc1"));
    assert!(ftyp.compatible_brand(2).is_err());
    assert_eq!(ftyp.boxed_size(), 8 + 8 + 8);
}

#[test]
fn mvhd_version0_defaults_and_fields() {
    let mut mvhd = Mvhd::new();
    assert_eq!(mvhd.boxed_size(), 108);
    assert_eq!(mvhd.rate().unwrap(), 0x0001_0000);
    assert_eq!(mvhd.volume().unwrap(), 0x0100);
    assert_eq!(mvhd.matrix(0).unwrap(), 0x0001_0000);
    assert_eq!(mvhd.matrix(4).unwrap(), 0x0001_0000);
    assert_eq!(mvhd.matrix(8).unwrap(), 0x4000_0000);

    mvhd.set_time_scale(90_000).unwrap();
    mvhd.set_duration(180_000).unwrap();
    mvhd.set_creation_time(3_500_000_000).unwrap();
    mvhd.set_next_track_id(2).unwrap();

    assert_eq!(mvhd.time_scale().unwrap(), 90_000);
    assert_eq!(mvhd.duration().unwrap(), 180_000);
    assert_eq!(mvhd.creation_time().unwrap(), 3_500_000_000);
    assert_eq!(mvhd.next_track_id().unwrap(), 2);
    assert!(mvhd.matrix(9).is_err());
    assert_eq!(mvhd.boxed_size(), 108);
}

#[test]
fn mvhd_version1_uses_wide_fields() {
    let mut mvhd = Mvhd::from_box(BoxBuf::with_payload(FourCC(*b"mvhd"), 112)).unwrap();
    mvhd.set_version(1).unwrap();
    mvhd.set_creation_time(1 << 33).unwrap();
    mvhd.set_time_scale(1000).unwrap();
    mvhd.set_duration((1 << 33) + 5).unwrap();
    mvhd.set_rate(0x0001_0000).unwrap();

    assert_eq!(mvhd.version().unwrap(), 1);
    assert_eq!(mvhd.creation_time().unwrap(), 1 << 33);
    assert_eq!(mvhd.time_scale().unwrap(), 1000);
    assert_eq!(mvhd.duration().unwrap(), (1 << 33) + 5);
    assert_eq!(mvhd.rate().unwrap(), 0x0001_0000);
}

#[test]
fn tkhd_fields() {
    let mut tkhd = Tkhd::new();
    assert_eq!(tkhd.boxed_size(), 92);
    assert_eq!(tkhd.flags().unwrap(), 0x000007);

    tkhd.set_track_id(3).unwrap();
    tkhd.set_duration(48_000).unwrap();
    tkhd.set_width(1280 << 16).unwrap();
    tkhd.set_height(720 << 16).unwrap();
    tkhd.set_layer(1).unwrap();

    assert_eq!(tkhd.track_id().unwrap(), 3);
    assert_eq!(tkhd.duration().unwrap(), 48_000);
    assert_eq!(tkhd.width().unwrap() >> 16, 1280);
    assert_eq!(tkhd.height().unwrap() >> 16, 720);
    assert_eq!(tkhd.layer().unwrap(), 1);
}

#[test]
fn mdhd_language_code() {
    let mut mdhd = Mdhd::new();
    assert_eq!(mdhd.language_code(), "und");

    mdhd.set_time_scale(48_000).unwrap();
    mdhd.set_duration(96_000).unwrap();
    // "eng" = (5, 14, 7) packed into 3x5 bits
    let eng = ((5u16) << 10) | ((14u16) << 5) | 7u16;
    mdhd.set_language(eng).unwrap();

    assert_eq!(mdhd.time_scale().unwrap(), 48_000);
    assert_eq!(mdhd.duration().unwrap(), 96_000);
    assert_eq!(mdhd.language_code(), "eng");
}

#[test]
fn hdlr_name_grows_the_record() {
    let mut hdlr = Hdlr::new();
    let before = hdlr.boxed_size();
    hdlr.set_handler_type(FourCC(*b"vide")).unwrap();
    hdlr.set_name("VideoHandler").unwrap();

    assert_eq!(hdlr.handler_type().unwrap(), FourCC(*b"vide"));
    assert_eq!(hdlr.name().unwrap(), "VideoHandler");
    assert_eq!(hdlr.boxed_size(), before + 12);

    hdlr.set_name("V").unwrap();
    assert_eq!(hdlr.name().unwrap(), "V");
    assert_eq!(hdlr.boxed_size(), before + 1);
}

#[test]
fn vmhd_and_smhd() {
    let vmhd = Vmhd::new();
    assert_eq!(vmhd.flags().unwrap(), 1);
    assert_eq!(vmhd.graphics_mode().unwrap(), 0);
    assert_eq!(vmhd.op_color(2).unwrap(), 0);
    assert!(vmhd.op_color(3).is_err());

    let mut smhd = Smhd::new();
    smhd.set_balance(-1).unwrap();
    assert_eq!(smhd.balance().unwrap(), -1);
}

#[test]
fn dref_collects_data_entries() {
    let mut dref = Dref::new();
    assert_eq!(dref.entry_count().unwrap(), 0);

    let mut url = Url::new();
    url.set_location("http://cdn.example/seg").unwrap();
    dref.set_data_entry(&url, 0).unwrap();

    assert_eq!(dref.entry_count().unwrap(), 1);
    let entry = dref.data_entry(0).unwrap();
    assert_eq!(entry.box_type().0, *b"url ");
    let parsed = Url::from_box(entry).unwrap();
    assert_eq!(parsed.location().unwrap(), "http://cdn.example/seg");
    assert!(dref.data_entry(1).is_err());
}

#[test]
fn containers_nest() {
    use fmp4box::boxes::{Mdia, Minf, Trak};
    use fmp4box::ChildSequenceMut;

    let mut minf = Minf::new();
    minf.append(&Vmhd::new()).unwrap();
    let mut mdia = Mdia::new();
    mdia.append(&Mdhd::new()).unwrap();
    mdia.append(&minf).unwrap();
    let mut trak = Trak::new();
    trak.append(&Tkhd::new()).unwrap();
    trak.append(&mdia).unwrap();

    assert_eq!(trak.content_count(), 2);
    let mdia_view = trak.content(1).unwrap();
    assert_eq!(mdia_view.box_type().0, *b"mdia");
    let sum: u64 = 8 + mdia_view.payload_size();
    assert_eq!(mdia_view.boxed_size(), sum);
}
