//! Fragmented-MP4 boxes: the moof/traf tree, track run tables and the
//! random-access index. Several records here have flag- or selector-driven
//! layouts; the offset/stride helpers stay separate from the raw accessors.

use crate::boxed::{BoxBuf, BoxRead, BoxWrite, oob};
use crate::error::{BoxError, Result};
use crate::full::VersionFlags;

container_box!(
    /// Movie Extends Box.
    Mvex, b"mvex", "Movie Extends Box");
container_box!(
    /// Movie Fragment Box.
    Moof, b"moof", "Movie Fragment Box");
container_box!(
    /// Track Fragment Box.
    Traf, b"traf", "Track Fragment Box");
container_box!(
    /// Movie Fragment Random Access Box.
    Mfra, b"mfra", "Movie Fragment Random Access Box");

full_box!(
    /// Movie Extends Header Box.
    Mehd, b"mehd");

impl Mehd {
    pub fn new() -> Self {
        Self { b: BoxBuf::with_payload(Self::TAG, 8) }
    }
}

impl Default for Mehd {
    fn default() -> Self { Self::new() }
}

impl<B: BoxRead> Mehd<B> {
    pub fn fragment_duration(&self) -> Result<u64> {
        let h = self.header_len();
        if self.version()? >= 1 { self.get_u64(h + 4) } else { Ok(self.get_u32(h + 4)? as u64) }
    }

    pub fn to_pretty_string(&self, indent: usize) -> String {
        let ind = " ".repeat(indent);
        format!(
            "{ind}[mehd] Movie Extends Header Box ({})\n{ind}  fragment_duration: {}\n",
            self.boxed_size(),
            self.fragment_duration().unwrap_or(0)
        )
    }
}

impl<B: BoxWrite> Mehd<B> {
    pub fn set_fragment_duration(&mut self, d: u64) -> Result<()> {
        let h = self.header_len();
        if self.version()? >= 1 { self.set_u64(h + 4, d) } else { self.set_u32(h + 4, d as u32) }
    }
}

full_box!(
    /// Track Extends Box: per-track defaults for fragment runs.
    Trex, b"trex");

impl Trex {
    pub fn new() -> Self {
        let mut t = Self { b: BoxBuf::with_payload(Self::TAG, 24) };
        let h = t.header_len();
        let _ = t.set_u32(h + 8, 1); // default_sample_description_index
        t
    }
}

impl Default for Trex {
    fn default() -> Self { Self::new() }
}

impl<B: BoxRead> Trex<B> {
    pub fn track_id(&self) -> Result<u32> {
        let h = self.header_len();
        self.get_u32(h + 4)
    }

    pub fn default_sample_description_index(&self) -> Result<u32> {
        let h = self.header_len();
        self.get_u32(h + 8)
    }

    pub fn default_sample_duration(&self) -> Result<u32> {
        let h = self.header_len();
        self.get_u32(h + 12)
    }

    pub fn default_sample_size(&self) -> Result<u32> {
        let h = self.header_len();
        self.get_u32(h + 16)
    }

    pub fn default_sample_flags(&self) -> Result<u32> {
        let h = self.header_len();
        self.get_u32(h + 20)
    }

    pub fn to_pretty_string(&self, indent: usize) -> String {
        let ind = " ".repeat(indent);
        let mut out = format!("{ind}[trex] Track Extends Box ({})\n", self.boxed_size());
        out.push_str(&format!("{ind}  track_id: {}\n", self.track_id().unwrap_or(0)));
        out.push_str(&format!("{ind}  default_sample_description_index: {}\n", self.default_sample_description_index().unwrap_or(0)));
        out.push_str(&format!("{ind}  default_sample_duration: {}\n", self.default_sample_duration().unwrap_or(0)));
        out.push_str(&format!("{ind}  default_sample_size: {}\n", self.default_sample_size().unwrap_or(0)));
        out.push_str(&format!("{ind}  default_sample_flags: {:#010x}\n", self.default_sample_flags().unwrap_or(0)));
        out
    }
}

impl<B: BoxWrite> Trex<B> {
    pub fn set_track_id(&mut self, v: u32) -> Result<()> {
        let h = self.header_len();
        self.set_u32(h + 4, v)
    }

    pub fn set_default_sample_description_index(&mut self, v: u32) -> Result<()> {
        let h = self.header_len();
        self.set_u32(h + 8, v)
    }

    pub fn set_default_sample_duration(&mut self, v: u32) -> Result<()> {
        let h = self.header_len();
        self.set_u32(h + 12, v)
    }

    pub fn set_default_sample_size(&mut self, v: u32) -> Result<()> {
        let h = self.header_len();
        self.set_u32(h + 16, v)
    }

    pub fn set_default_sample_flags(&mut self, v: u32) -> Result<()> {
        let h = self.header_len();
        self.set_u32(h + 20, v)
    }
}

full_box!(
    /// Movie Fragment Header Box: the fragment sequence number.
    Mfhd, b"mfhd");

impl Mfhd {
    pub fn new() -> Self {
        Self { b: BoxBuf::with_payload(Self::TAG, 8) }
    }
}

impl Default for Mfhd {
    fn default() -> Self { Self::new() }
}

impl<B: BoxRead> Mfhd<B> {
    pub fn sequence_number(&self) -> Result<u32> {
        let h = self.header_len();
        self.get_u32(h + 4)
    }

    pub fn to_pretty_string(&self, indent: usize) -> String {
        let ind = " ".repeat(indent);
        format!(
            "{ind}[mfhd] Movie Fragment Header Box ({})\n{ind}  sequence_number: {}\n",
            self.boxed_size(),
            self.sequence_number().unwrap_or(0)
        )
    }
}

impl<B: BoxWrite> Mfhd<B> {
    pub fn set_sequence_number(&mut self, v: u32) -> Result<()> {
        let h = self.header_len();
        self.set_u32(h + 4, v)
    }
}

pub const TFHD_BASE_DATA_OFFSET: u32 = 0x000001;
pub const TFHD_SAMPLE_DESCRIPTION_INDEX: u32 = 0x000002;
pub const TFHD_DEFAULT_SAMPLE_DURATION: u32 = 0x000008;
pub const TFHD_DEFAULT_SAMPLE_SIZE: u32 = 0x000010;
pub const TFHD_DEFAULT_SAMPLE_FLAGS: u32 = 0x000020;
pub const TFHD_DURATION_IS_EMPTY: u32 = 0x010000;

/// Payload-relative offset of an optional tfhd field under `flags`, `None`
/// when the field is not selected.
fn tfhd_field_offset(flags: u32, field: u32) -> Option<usize> {
    if flags & field == 0 {
        return None;
    }
    let mut off = 8; // version/flags + track_id
    for &(bit, width) in &[
        (TFHD_BASE_DATA_OFFSET, 8usize),
        (TFHD_SAMPLE_DESCRIPTION_INDEX, 4),
        (TFHD_DEFAULT_SAMPLE_DURATION, 4),
        (TFHD_DEFAULT_SAMPLE_SIZE, 4),
        (TFHD_DEFAULT_SAMPLE_FLAGS, 4),
    ] {
        if bit == field {
            return Some(off);
        }
        if flags & bit != 0 {
            off += width;
        }
    }
    None
}

fn absent_field(len: usize) -> BoxError {
    BoxError::IndexOutOfRange { index: len, len }
}

full_box!(
    /// Track Fragment Header Box. All fields except `track_id` are optional
    /// and selected by the flags; set the flags before assigning fields, in
    /// layout order.
    Tfhd, b"tfhd");

impl Tfhd {
    pub fn new() -> Self {
        Self { b: BoxBuf::with_payload(Self::TAG, 8) }
    }
}

impl Default for Tfhd {
    fn default() -> Self { Self::new() }
}

impl<B: BoxRead> Tfhd<B> {
    pub fn track_id(&self) -> Result<u32> {
        let h = self.header_len();
        self.get_u32(h + 4)
    }

    fn optional(&self, field: u32, width: usize) -> Result<u64> {
        let flags = self.flags()?;
        match tfhd_field_offset(flags, field) {
            Some(off) => self.get_uint(self.header_len() + off, width),
            None => Err(absent_field(self.as_bytes().len())),
        }
    }

    pub fn base_data_offset(&self) -> Result<u64> {
        self.optional(TFHD_BASE_DATA_OFFSET, 8)
    }

    pub fn sample_description_index(&self) -> Result<u32> {
        Ok(self.optional(TFHD_SAMPLE_DESCRIPTION_INDEX, 4)? as u32)
    }

    pub fn default_sample_duration(&self) -> Result<u32> {
        Ok(self.optional(TFHD_DEFAULT_SAMPLE_DURATION, 4)? as u32)
    }

    pub fn default_sample_size(&self) -> Result<u32> {
        Ok(self.optional(TFHD_DEFAULT_SAMPLE_SIZE, 4)? as u32)
    }

    pub fn default_sample_flags(&self) -> Result<u32> {
        Ok(self.optional(TFHD_DEFAULT_SAMPLE_FLAGS, 4)? as u32)
    }

    pub fn to_pretty_string(&self, indent: usize) -> String {
        let ind = " ".repeat(indent);
        let mut out = format!("{ind}[tfhd] Track Fragment Header Box ({})\n", self.boxed_size());
        out.push_str(&format!("{ind}  flags: {:#08x}\n", self.flags().unwrap_or(0)));
        out.push_str(&format!("{ind}  track_id: {}\n", self.track_id().unwrap_or(0)));
        if let Ok(v) = self.base_data_offset() {
            out.push_str(&format!("{ind}  base_data_offset: {v}\n"));
        }
        if let Ok(v) = self.sample_description_index() {
            out.push_str(&format!("{ind}  sample_description_index: {v}\n"));
        }
        if let Ok(v) = self.default_sample_duration() {
            out.push_str(&format!("{ind}  default_sample_duration: {v}\n"));
        }
        if let Ok(v) = self.default_sample_size() {
            out.push_str(&format!("{ind}  default_sample_size: {v}\n"));
        }
        if let Ok(v) = self.default_sample_flags() {
            out.push_str(&format!("{ind}  default_sample_flags: {:#010x}\n", v));
        }
        out
    }
}

impl<B: BoxWrite> Tfhd<B> {
    pub fn set_track_id(&mut self, v: u32) -> Result<()> {
        let h = self.header_len();
        self.set_u32(h + 4, v)
    }

    fn set_optional(&mut self, field: u32, width: usize, v: u64) -> Result<()> {
        let flags = self.flags()?;
        let off = match tfhd_field_offset(flags, field) {
            Some(off) => off,
            None => return Err(absent_field(self.as_bytes().len())),
        };
        let h = self.header_len();
        let need = h + off + width;
        let len = self.as_bytes().len();
        if need > len {
            self.reserve(len, 0, need - len)?;
        }
        self.set_uint(h + off, width, v)
    }

    pub fn set_base_data_offset(&mut self, v: u64) -> Result<()> {
        self.set_optional(TFHD_BASE_DATA_OFFSET, 8, v)
    }

    pub fn set_sample_description_index(&mut self, v: u32) -> Result<()> {
        self.set_optional(TFHD_SAMPLE_DESCRIPTION_INDEX, 4, v as u64)
    }

    pub fn set_default_sample_duration(&mut self, v: u32) -> Result<()> {
        self.set_optional(TFHD_DEFAULT_SAMPLE_DURATION, 4, v as u64)
    }

    pub fn set_default_sample_size(&mut self, v: u32) -> Result<()> {
        self.set_optional(TFHD_DEFAULT_SAMPLE_SIZE, 4, v as u64)
    }

    pub fn set_default_sample_flags(&mut self, v: u32) -> Result<()> {
        self.set_optional(TFHD_DEFAULT_SAMPLE_FLAGS, 4, v as u64)
    }
}

pub const TRUN_DATA_OFFSET: u32 = 0x000001;
pub const TRUN_FIRST_SAMPLE_FLAGS: u32 = 0x000004;
pub const TRUN_SAMPLE_DURATION: u32 = 0x000100;
pub const TRUN_SAMPLE_SIZE: u32 = 0x000200;
pub const TRUN_SAMPLE_FLAGS: u32 = 0x000400;
pub const TRUN_SAMPLE_OFFSETS: u32 = 0x000800;

pub const SAMPLE_NOT_IPICTURE: u32 = 0x0100_0000;
pub const SAMPLE_IS_IPICTURE: u32 = 0x0200_0000;
pub const SAMPLE_NOT_DISPOSABLE: u32 = 0x0040_0000;
pub const SAMPLE_IS_DISPOSABLE: u32 = 0x0080_0000;
pub const SAMPLE_IS_REDUNDANT: u32 = 0x0010_0000;
pub const SAMPLE_NOT_REDUNDANT: u32 = 0x0020_0000;
pub const SAMPLE_NOT_KEYFRAME: u32 = 0x0001_0000;
pub const SAMPLE_IS_KEYFRAME: u32 = 0x0000_0000;

/// Human-readable rendering of a per-sample flag word.
pub fn pretty_sample_flags(flags: u32) -> String {
    let mut parts = Vec::new();
    if flags & SAMPLE_IS_IPICTURE != 0 { parts.push("ipicture"); }
    if flags & SAMPLE_NOT_IPICTURE != 0 { parts.push("no-ipicture"); }
    if flags & SAMPLE_IS_DISPOSABLE != 0 { parts.push("disposable"); }
    if flags & SAMPLE_NOT_DISPOSABLE != 0 { parts.push("no-disposable"); }
    if flags & SAMPLE_IS_REDUNDANT != 0 { parts.push("redundant"); }
    if flags & SAMPLE_NOT_REDUNDANT != 0 { parts.push("no-redundant"); }
    if flags & SAMPLE_NOT_KEYFRAME != 0 { parts.push("no-keyframe"); } else { parts.push("keyframe"); }
    parts.join(" ")
}

/// One trun sample record; fields not selected by the run's flags read as
/// zero and are skipped on write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrunSample {
    pub duration: u32,
    pub size: u32,
    pub flags: u32,
    pub composition_offset: u32,
}

/// Per-sample record width for a given flag word: four bytes per selected
/// per-sample field.
pub fn trun_sample_stride(flags: u32) -> usize {
    4 * (flags & 0x0F00).count_ones() as usize
}

/// Payload-relative offset of the first sample record.
fn trun_head_len(flags: u32) -> usize {
    let mut head = 8; // version/flags + sample_count
    if flags & TRUN_DATA_OFFSET != 0 { head += 4; }
    if flags & TRUN_FIRST_SAMPLE_FLAGS != 0 { head += 4; }
    head
}

full_box!(
    /// Track Fragment Run Box: one shared flag word selects which optional
    /// per-sample fields are present; all records share one stride.
    Trun, b"trun");

impl Trun {
    pub fn new() -> Self {
        Self { b: BoxBuf::with_payload(Self::TAG, 8) }
    }
}

impl Default for Trun {
    fn default() -> Self { Self::new() }
}

impl<B: BoxRead> Trun<B> {
    pub fn sample_count(&self) -> Result<u32> {
        let h = self.header_len();
        self.get_u32(h + 4)
    }

    pub fn data_offset(&self) -> Result<u32> {
        let flags = self.flags()?;
        if flags & TRUN_DATA_OFFSET == 0 {
            return Err(absent_field(self.as_bytes().len()));
        }
        self.get_u32(self.header_len() + 8)
    }

    pub fn first_sample_flags(&self) -> Result<u32> {
        let flags = self.flags()?;
        if flags & TRUN_FIRST_SAMPLE_FLAGS == 0 {
            return Err(absent_field(self.as_bytes().len()));
        }
        let off = 8 + if flags & TRUN_DATA_OFFSET != 0 { 4 } else { 0 };
        self.get_u32(self.header_len() + off)
    }

    pub fn sample(&self, index: u32) -> Result<TrunSample> {
        let flags = self.flags()?;
        let count = self.sample_count()?;
        if index >= count { return Err(oob(index as usize, count as usize)); }
        let stride = trun_sample_stride(flags);
        let mut off = self.header_len() + trun_head_len(flags) + index as usize * stride;
        let mut s = TrunSample::default();
        if flags & TRUN_SAMPLE_DURATION != 0 {
            s.duration = self.get_u32(off)?;
            off += 4;
        }
        if flags & TRUN_SAMPLE_SIZE != 0 {
            s.size = self.get_u32(off)?;
            off += 4;
        }
        if flags & TRUN_SAMPLE_FLAGS != 0 {
            s.flags = self.get_u32(off)?;
            off += 4;
        }
        if flags & TRUN_SAMPLE_OFFSETS != 0 {
            s.composition_offset = self.get_u32(off)?;
        }
        Ok(s)
    }

    pub fn to_pretty_string(&self, indent: usize) -> String {
        let ind = " ".repeat(indent);
        let count = self.sample_count().unwrap_or(0);
        let mut out = format!("{ind}[trun] Track Fragment Run Box ({})\n", self.boxed_size());
        out.push_str(&format!("{ind}  flags: {:#08x}\n", self.flags().unwrap_or(0)));
        out.push_str(&format!("{ind}  sample_count: {count}\n"));
        if let Ok(v) = self.data_offset() {
            out.push_str(&format!("{ind}  data_offset: {v}\n"));
        }
        if let Ok(v) = self.first_sample_flags() {
            out.push_str(&format!("{ind}  first_sample_flags: {}\n", pretty_sample_flags(v)));
        }
        for i in 0..count {
            if let Ok(s) = self.sample(i) {
                out.push_str(&format!(
                    "{ind}  [{i}] duration: {} size: {} flags: {:#010x} offset: {}\n",
                    s.duration, s.size, s.flags, s.composition_offset
                ));
            }
        }
        out
    }
}

impl<B: BoxWrite> Trun<B> {
    pub fn set_data_offset(&mut self, v: u32) -> Result<()> {
        let flags = self.flags()?;
        if flags & TRUN_DATA_OFFSET == 0 {
            return Err(absent_field(self.as_bytes().len()));
        }
        let h = self.header_len();
        let need = h + 12;
        let len = self.as_bytes().len();
        if need > len {
            self.reserve(len, 0, need - len)?;
        }
        self.set_u32(h + 8, v)
    }

    pub fn set_first_sample_flags(&mut self, v: u32) -> Result<()> {
        let flags = self.flags()?;
        if flags & TRUN_FIRST_SAMPLE_FLAGS == 0 {
            return Err(absent_field(self.as_bytes().len()));
        }
        let off = 8 + if flags & TRUN_DATA_OFFSET != 0 { 4 } else { 0 };
        let h = self.header_len();
        let need = h + off + 4;
        let len = self.as_bytes().len();
        if need > len {
            self.reserve(len, 0, need - len)?;
        }
        self.set_u32(h + off, v)
    }

    /// Write sample record `index`, growing the run (zero-filled) and
    /// bumping the count when writing at or past the current end.
    pub fn set_sample(&mut self, index: u32, sample: TrunSample) -> Result<()> {
        let flags = self.flags()?;
        let count = self.sample_count()?;
        let stride = trun_sample_stride(flags);
        let head = trun_head_len(flags);
        let h = self.header_len();
        if index >= count {
            let need = h + head + (index as usize + 1) * stride;
            let len = self.as_bytes().len();
            if need > len {
                self.reserve(len, 0, need - len)?;
            }
            self.set_u32(h + 4, index + 1)?;
        }
        let mut off = h + head + index as usize * stride;
        if flags & TRUN_SAMPLE_DURATION != 0 {
            self.set_u32(off, sample.duration)?;
            off += 4;
        }
        if flags & TRUN_SAMPLE_SIZE != 0 {
            self.set_u32(off, sample.size)?;
            off += 4;
        }
        if flags & TRUN_SAMPLE_FLAGS != 0 {
            self.set_u32(off, sample.flags)?;
            off += 4;
        }
        if flags & TRUN_SAMPLE_OFFSETS != 0 {
            self.set_u32(off, sample.composition_offset)?;
        }
        Ok(())
    }
}

/// One random-access entry; on the wire the last three fields use the
/// byte widths configured by the box's length-size selectors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TfraEntry {
    pub time: u64,
    pub moof_offset: u64,
    pub traf_number: u32,
    pub trun_number: u32,
    pub sample_number: u32,
}

full_box!(
    /// Track Fragment Random Access Box. Record stride is recomputed from
    /// the three length-size selectors and the version, never hardcoded.
    Tfra, b"tfra");

impl Tfra {
    pub fn new() -> Self {
        Self { b: BoxBuf::with_payload(Self::TAG, 16) }
    }
}

impl Default for Tfra {
    fn default() -> Self { Self::new() }
}

impl<B: BoxRead> Tfra<B> {
    pub fn track_id(&self) -> Result<u32> {
        let h = self.header_len();
        self.get_u32(h + 4)
    }

    pub fn length_size_of_traf_num(&self) -> Result<u8> {
        let h = self.header_len();
        Ok(((self.get_u32(h + 8)? >> 4) & 3) as u8)
    }

    pub fn length_size_of_trun_num(&self) -> Result<u8> {
        let h = self.header_len();
        Ok(((self.get_u32(h + 8)? >> 2) & 3) as u8)
    }

    pub fn length_size_of_sample_num(&self) -> Result<u8> {
        let h = self.header_len();
        Ok((self.get_u32(h + 8)? & 3) as u8)
    }

    pub fn number_of_entry(&self) -> Result<u32> {
        let h = self.header_len();
        self.get_u32(h + 12)
    }

    /// Wire size of one entry under the current version and selectors.
    pub fn entry_size(&self) -> Result<usize> {
        let wide = if self.version()? >= 1 { 8 } else { 4 };
        let traf = self.length_size_of_traf_num()? as usize + 1;
        let trun = self.length_size_of_trun_num()? as usize + 1;
        let sample = self.length_size_of_sample_num()? as usize + 1;
        Ok(2 * wide + traf + trun + sample)
    }

    pub fn entry(&self, index: u32) -> Result<TfraEntry> {
        let count = self.number_of_entry()?;
        if index >= count { return Err(oob(index as usize, count as usize)); }
        let wide = if self.version()? >= 1 { 8 } else { 4 };
        let traf = self.length_size_of_traf_num()? as usize + 1;
        let trun = self.length_size_of_trun_num()? as usize + 1;
        let sample = self.length_size_of_sample_num()? as usize + 1;
        let stride = 2 * wide + traf + trun + sample;
        let mut off = self.header_len() + 16 + index as usize * stride;
        let time = self.get_uint(off, wide)?;
        off += wide;
        let moof_offset = self.get_uint(off, wide)?;
        off += wide;
        let traf_number = self.get_uint(off, traf)? as u32;
        off += traf;
        let trun_number = self.get_uint(off, trun)? as u32;
        off += trun;
        let sample_number = self.get_uint(off, sample)? as u32;
        Ok(TfraEntry { time, moof_offset, traf_number, trun_number, sample_number })
    }

    pub fn to_pretty_string(&self, indent: usize) -> String {
        let ind = " ".repeat(indent);
        let count = self.number_of_entry().unwrap_or(0);
        let mut out = format!("{ind}[tfra] Track Fragment Random Access Box ({})\n", self.boxed_size());
        out.push_str(&format!("{ind}  track_id: {}\n", self.track_id().unwrap_or(0)));
        out.push_str(&format!("{ind}  number_of_entry: {count}\n"));
        for i in 0..count {
            if let Ok(e) = self.entry(i) {
                out.push_str(&format!(
                    "{ind}  [{i}] time: {} moof_offset: {} traf: {} trun: {} sample: {}\n",
                    e.time, e.moof_offset, e.traf_number, e.trun_number, e.sample_number
                ));
            }
        }
        out
    }
}

impl<B: BoxWrite> Tfra<B> {
    pub fn set_track_id(&mut self, v: u32) -> Result<()> {
        let h = self.header_len();
        self.set_u32(h + 4, v)
    }

    fn set_selector(&mut self, shift: u32, v: u8) -> Result<()> {
        let h = self.header_len();
        let s = self.get_u32(h + 8)?;
        self.set_u32(h + 8, (s & !(3u32 << shift)) | (((v & 3) as u32) << shift))
    }

    pub fn set_length_size_of_traf_num(&mut self, v: u8) -> Result<()> {
        self.set_selector(4, v)
    }

    pub fn set_length_size_of_trun_num(&mut self, v: u8) -> Result<()> {
        self.set_selector(2, v)
    }

    pub fn set_length_size_of_sample_num(&mut self, v: u8) -> Result<()> {
        self.set_selector(0, v)
    }

    pub fn set_number_of_entry(&mut self, v: u32) -> Result<()> {
        let h = self.header_len();
        self.set_u32(h + 12, v)
    }

    pub fn set_entry(&mut self, index: u32, entry: TfraEntry) -> Result<()> {
        let count = self.number_of_entry()?;
        let stride = self.entry_size()?;
        let wide = if self.version()? >= 1 { 8 } else { 4 };
        let traf = self.length_size_of_traf_num()? as usize + 1;
        let trun = self.length_size_of_trun_num()? as usize + 1;
        let sample = self.length_size_of_sample_num()? as usize + 1;
        let h = self.header_len();
        if index >= count {
            let need = h + 16 + (index as usize + 1) * stride;
            let len = self.as_bytes().len();
            if need > len {
                self.reserve(len, 0, need - len)?;
            }
            self.set_u32(h + 12, index + 1)?;
        }
        let mut off = h + 16 + index as usize * stride;
        self.set_uint(off, wide, entry.time)?;
        off += wide;
        self.set_uint(off, wide, entry.moof_offset)?;
        off += wide;
        self.set_uint(off, traf, entry.traf_number as u64)?;
        off += traf;
        self.set_uint(off, trun, entry.trun_number as u64)?;
        off += trun;
        self.set_uint(off, sample, entry.sample_number as u64)
    }
}

full_box!(
    /// Movie Fragment Random Access Offset Box: total size of the
    /// enclosing mfra.
    Mfro, b"mfro");

impl Mfro {
    pub fn new() -> Self {
        Self { b: BoxBuf::with_payload(Self::TAG, 8) }
    }
}

impl Default for Mfro {
    fn default() -> Self { Self::new() }
}

impl<B: BoxRead> Mfro<B> {
    pub fn mfra_size(&self) -> Result<u32> {
        let h = self.header_len();
        self.get_u32(h + 4)
    }

    pub fn to_pretty_string(&self, indent: usize) -> String {
        let ind = " ".repeat(indent);
        format!(
            "{ind}[mfro] Movie Fragment Random Access Offset Box ({})\n{ind}  mfra_size: {}\n",
            self.boxed_size(),
            self.mfra_size().unwrap_or(0)
        )
    }
}

impl<B: BoxWrite> Mfro<B> {
    pub fn set_mfra_size(&mut self, v: u32) -> Result<()> {
        let h = self.header_len();
        self.set_u32(h + 4, v)
    }
}
