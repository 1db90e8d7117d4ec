use fmp4box::boxes::AvcC;
use fmp4box::BoxRead;

#[test]
fn annex_b_conversion_golden_bytes() {
    let mut avcc = AvcC::new();
    avcc.set_profile(0x42).unwrap();
    avcc.set_level(0x1E).unwrap();
    avcc.set_sps(&[0x67, 0x42, 0x00, 0x1E]).unwrap();
    avcc.set_pps(&[0x68, 0xCE, 0x3C, 0x80]).unwrap();

    assert_eq!(
        avcc.as_annex_b().unwrap(),
        vec![
            0x00, 0x00, 0x00, 0x01, 0x67, 0x42, 0x00, 0x1E,
            0x00, 0x00, 0x00, 0x01, 0x68, 0xCE, 0x3C, 0x80,
        ]
    );
}

#[test]
fn parameter_set_replacement_shifts_the_tail() {
    let mut avcc = AvcC::new();
    avcc.set_sps(&[0x67, 0x42, 0x00, 0x1E]).unwrap();
    avcc.set_pps(&[0x68, 0xCE, 0x3C, 0x80]).unwrap();
    assert_eq!(avcc.sps_len().unwrap(), 4);
    assert_eq!(avcc.pps_len().unwrap(), 4);

    // shrinking the SPS must leave the PPS intact
    avcc.set_sps(&[0x67, 0x64]).unwrap();
    assert_eq!(avcc.sps().unwrap(), &[0x67, 0x64]);
    assert_eq!(avcc.pps().unwrap(), &[0x68, 0xCE, 0x3C, 0x80]);

    // and growing it again too
    avcc.set_sps(&[0x67, 0x64, 0x00, 0x28, 0xAC]).unwrap();
    assert_eq!(avcc.sps_len().unwrap(), 5);
    assert_eq!(avcc.pps().unwrap(), &[0x68, 0xCE, 0x3C, 0x80]);
    assert_eq!(avcc.boxed_size(), avcc.as_bytes().len() as u64);
}

#[test]
fn header_bytes_and_counts() {
    let mut avcc = AvcC::new();
    assert_eq!(avcc.configuration_version().unwrap(), 1);
    assert_eq!(avcc.sps_number().unwrap(), 1);
    assert_eq!(avcc.pps_number().unwrap(), 1);

    avcc.set_profile(0x64).unwrap();
    avcc.set_compatible_profiles(0x00).unwrap();
    avcc.set_level(0x28).unwrap();
    assert_eq!(avcc.profile().unwrap(), 0x64);
    assert_eq!(avcc.level().unwrap(), 0x28);
}

#[test]
fn whole_payload_replacement() {
    let mut avcc = AvcC::new();
    // configuration record with one 2-byte SPS and one 2-byte PPS
    let payload = [
        0x01, 0x64, 0x00, 0x28, 0xFF, 0xE1,
        0x00, 0x02, 0x67, 0x64,
        0x01, 0x00, 0x02, 0x68, 0xEE,
    ];
    avcc.set_payload(&payload).unwrap();
    assert_eq!(avcc.payload_size() as usize, payload.len());
    assert_eq!(avcc.profile().unwrap(), 0x64);
    assert_eq!(avcc.sps().unwrap(), &[0x67, 0x64]);
    assert_eq!(avcc.pps().unwrap(), &[0x68, 0xEE]);
}
