//! Recursive tree-to-text rendering for diagnostics. The text format is a
//! debugging aid, not a stable contract.

use crate::boxed::{BoxRead, BoxView, FourCC};
use crate::boxes::*;
use crate::container::children_of;

/// Render any record: known types get field-level rendering, everything
/// else falls back to a hex dump.
pub fn box_to_string(b: &impl BoxRead, indent: usize) -> String {
    let bytes = b.as_bytes();
    let view = match BoxView::new(bytes) {
        Ok(v) => v,
        Err(_) => return raw_box_string(bytes, indent),
    };
    let rendered = match &view.box_type().0 {
        b"ftyp" => Ftyp::from_box(view).map(|x| x.to_pretty_string(indent)),
        b"moov" => Moov::from_box(view).map(|x| x.to_pretty_string(indent)),
        b"trak" => Trak::from_box(view).map(|x| x.to_pretty_string(indent)),
        b"mdia" => Mdia::from_box(view).map(|x| x.to_pretty_string(indent)),
        b"minf" => Minf::from_box(view).map(|x| x.to_pretty_string(indent)),
        b"dinf" => Dinf::from_box(view).map(|x| x.to_pretty_string(indent)),
        b"stbl" => Stbl::from_box(view).map(|x| x.to_pretty_string(indent)),
        b"edts" => Edts::from_box(view).map(|x| x.to_pretty_string(indent)),
        b"udta" => Udta::from_box(view).map(|x| x.to_pretty_string(indent)),
        b"mvex" => Mvex::from_box(view).map(|x| x.to_pretty_string(indent)),
        b"moof" => Moof::from_box(view).map(|x| x.to_pretty_string(indent)),
        b"traf" => Traf::from_box(view).map(|x| x.to_pretty_string(indent)),
        b"mfra" => Mfra::from_box(view).map(|x| x.to_pretty_string(indent)),
        b"mvhd" => Mvhd::from_box(view).map(|x| x.to_pretty_string(indent)),
        b"tkhd" => Tkhd::from_box(view).map(|x| x.to_pretty_string(indent)),
        b"mdhd" => Mdhd::from_box(view).map(|x| x.to_pretty_string(indent)),
        b"hdlr" => Hdlr::from_box(view).map(|x| x.to_pretty_string(indent)),
        b"vmhd" => Vmhd::from_box(view).map(|x| x.to_pretty_string(indent)),
        b"smhd" => Smhd::from_box(view).map(|x| x.to_pretty_string(indent)),
        b"hmhd" => Hmhd::from_box(view).map(|x| x.to_pretty_string(indent)),
        b"nmhd" => Nmhd::from_box(view).map(|x| x.to_pretty_string(indent)),
        b"url " => Url::from_box(view).map(|x| x.to_pretty_string(indent)),
        b"urn " => Urn::from_box(view).map(|x| x.to_pretty_string(indent)),
        b"dref" => Dref::from_box(view).map(|x| x.to_pretty_string(indent)),
        b"stsd" => Stsd::from_box(view).map(|x| x.to_pretty_string(indent)),
        b"stts" => Stts::from_box(view).map(|x| x.to_pretty_string(indent)),
        b"ctts" => Ctts::from_box(view).map(|x| x.to_pretty_string(indent)),
        b"stsc" => Stsc::from_box(view).map(|x| x.to_pretty_string(indent)),
        b"stco" => Stco::from_box(view).map(|x| x.to_pretty_string(indent)),
        b"stsz" => Stsz::from_box(view).map(|x| x.to_pretty_string(indent)),
        b"stss" => Stss::from_box(view).map(|x| x.to_pretty_string(indent)),
        b"sdtp" => Sdtp::from_box(view).map(|x| x.to_pretty_string(indent)),
        b"avcC" => AvcC::from_box(view).map(|x| x.to_pretty_string(indent)),
        b"clap" => Clap::from_box(view).map(|x| x.to_pretty_string(indent)),
        b"pasp" => Pasp::from_box(view).map(|x| x.to_pretty_string(indent)),
        b"avc1" => Ok(VisualSampleEntry::from_box(view).to_pretty_string(indent)),
        b"mp4a" => Ok(AudioSampleEntry::from_box(view).to_pretty_string(indent)),
        b"mehd" => Mehd::from_box(view).map(|x| x.to_pretty_string(indent)),
        b"trex" => Trex::from_box(view).map(|x| x.to_pretty_string(indent)),
        b"mfhd" => Mfhd::from_box(view).map(|x| x.to_pretty_string(indent)),
        b"tfhd" => Tfhd::from_box(view).map(|x| x.to_pretty_string(indent)),
        b"trun" => Trun::from_box(view).map(|x| x.to_pretty_string(indent)),
        b"tfra" => Tfra::from_box(view).map(|x| x.to_pretty_string(indent)),
        b"mfro" => Mfro::from_box(view).map(|x| x.to_pretty_string(indent)),
        b"abst" => Abst::from_box(view).map(|x| x.to_pretty_string(indent)),
        b"asrt" => Asrt::from_box(view).map(|x| x.to_pretty_string(indent)),
        b"afrt" => Afrt::from_box(view).map(|x| x.to_pretty_string(indent)),
        b"afra" => Afra::from_box(view).map(|x| x.to_pretty_string(indent)),
        b"uuid" => match Tfrf::from_box(view) {
            Ok(t) => Ok(t.to_pretty_string(indent)),
            Err(_) => UuidBox::from_box(view).map(|x| x.to_pretty_string(indent)),
        },
        _ => return raw_box_string(bytes, indent),
    };
    rendered.unwrap_or_else(|_| raw_box_string(bytes, indent))
}

/// Header line for a container plus its children, rendered recursively.
pub fn container_string(name: &str, b: &impl BoxRead, indent: usize) -> String {
    let ind = " ".repeat(indent);
    let mut out = format!("{ind}[{}] {} ({})\n", b.box_type(), name, b.boxed_size());
    for child in children_of(b) {
        out.push_str(&box_to_string(&child, indent + 2));
    }
    out
}

/// Fallback rendering: type, size, payload hex dump (capped).
pub fn raw_box_string(bytes: &[u8], indent: usize) -> String {
    let ind = " ".repeat(indent);
    if bytes.len() < 8 {
        return format!("{ind}[????] truncated box ({} bytes)\n", bytes.len());
    }
    let tag = FourCC([bytes[4], bytes[5], bytes[6], bytes[7]]);
    let header = if u32::from_be_bytes(bytes[0..4].try_into().unwrap()) == 1 {
        16.min(bytes.len())
    } else {
        8
    };
    let payload = &bytes[header..];
    let mut out = format!("{ind}[{tag}] Unknown box ({} bytes)\n", bytes.len());
    const CAP: usize = 256;
    out.push_str(&hex_dump(&payload[..payload.len().min(CAP)], indent + 2));
    if payload.len() > CAP {
        out.push_str(&format!("{ind}  ({} more bytes)\n", payload.len() - CAP));
    }
    out
}

/// Classic offset / hex / ASCII dump, 16 bytes per line.
pub fn hex_dump(bytes: &[u8], indent: usize) -> String {
    let ind = " ".repeat(indent);
    let mut out = String::new();
    for (i, chunk) in bytes.chunks(16).enumerate() {
        let hexs: String = chunk.iter().map(|b| format!("{:02x} ", b)).collect();
        let ascii: String = chunk
            .iter()
            .map(|&c| if (32..=126).contains(&c) { c as char } else { '.' })
            .collect();
        out.push_str(&format!("{ind}{:08x}  {:<48}  |{}|\n", i * 16, hexs, ascii));
    }
    out
}
