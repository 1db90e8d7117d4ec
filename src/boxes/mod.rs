#[macro_use]
mod macros;

pub mod fragment;
pub mod hds;
pub mod movie;
pub mod sample;
pub mod uuid;

pub use fragment::*;
pub use hds::*;
pub use movie::*;
pub use sample::*;
pub use uuid::*;

use crate::boxed::FourCC;

/// Length of the NUL-terminated string starting at `start`, excluding the
/// terminator. Runs to the end of `bytes` when no terminator is found.
pub(crate) fn cstr_len(bytes: &[u8], start: usize) -> usize {
    if start >= bytes.len() { return 0; }
    bytes[start..].iter().position(|&b| b == 0).unwrap_or(bytes.len() - start)
}

pub(crate) fn lossy_str(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Does this tag have container semantics (payload = child boxes)?
pub fn is_container_tag(tag: FourCC) -> bool {
    matches!(&tag.0,
        b"moov" | b"trak" | b"mdia" | b"minf" | b"stbl" | b"edts" |
        b"udta" | b"dinf" | b"mvex" | b"moof" | b"traf" | b"mfra"
    )
}

/// Does this tag carry a version/flags prefix?
pub fn is_full_box_tag(tag: FourCC) -> bool {
    matches!(&tag.0,
        b"mvhd" | b"tkhd" | b"mdhd" | b"hdlr" | b"vmhd" | b"smhd" |
        b"hmhd" | b"nmhd" | b"dref" | b"url " | b"urn " | b"stsd" |
        b"stts" | b"ctts" | b"stsc" | b"stsz" | b"stco" | b"stss" |
        b"sdtp" | b"mehd" | b"trex" | b"mfhd" | b"tfhd" | b"trun" |
        b"tfra" | b"mfro" | b"abst" | b"asrt" | b"afrt" | b"afra"
    )
}
