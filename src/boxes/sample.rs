//! Sample description and sample table boxes: the counted fixed-stride
//! tables driving per-sample timing/size lookups, plus the codec
//! configuration record.

use crate::boxed::{BoxBuf, BoxRead, BoxView, BoxWrite, FourCC, oob};
use crate::container::child_spans;
use crate::error::{BoxError, Result};

use super::lossy_str;

full_box!(
    /// Sample Description Box: counted list of sample-entry boxes.
    Stsd, b"stsd");

impl Stsd {
    pub fn new() -> Self {
        Self { b: BoxBuf::with_payload(Self::TAG, 8) }
    }
}

impl Default for Stsd {
    fn default() -> Self { Self::new() }
}

impl<B: BoxRead> Stsd<B> {
    pub fn entry_count(&self) -> Result<u32> {
        let h = self.header_len();
        self.get_u32(h + 4)
    }

    pub fn entry(&self, index: u32) -> Result<BoxView<'_>> {
        let h = self.header_len();
        let spans = child_spans(self.as_bytes(), h + 8);
        match spans.get(index as usize) {
            Some(&(off, _)) => self.get_box(off),
            None => Err(oob(index as usize, spans.len())),
        }
    }

    pub fn to_pretty_string(&self, indent: usize) -> String {
        let ind = " ".repeat(indent);
        let mut out = format!("{ind}[stsd] Sample Description Box ({})\n", self.boxed_size());
        out.push_str(&format!("{ind}  entry_count: {}\n", self.entry_count().unwrap_or(0)));
        for i in 0.. {
            match self.entry(i) {
                Ok(child) => out.push_str(&crate::pretty::box_to_string(&child, indent + 2)),
                Err(_) => break,
            }
        }
        out
    }
}

impl<B: BoxWrite> Stsd<B> {
    /// Replace entry `index`; `index == count` appends and bumps the count.
    pub fn set_entry(&mut self, child: &impl BoxRead, index: u32) -> Result<()> {
        let h = self.header_len();
        let spans = child_spans(self.as_bytes(), h + 8);
        let count = spans.len() as u32;
        if index < count {
            let (off, _) = spans[index as usize];
            self.set_box(child, off)
        } else if index == count {
            let end = self.as_bytes().len();
            self.set_box(child, end)?;
            self.set_u32(h + 4, count + 1)
        } else {
            Err(oob(index as usize, spans.len()))
        }
    }
}

/// Visual sample entry (avc1 and friends). The tag varies per codec, so the
/// wrapper accepts any type and callers pick the constructor.
pub struct VisualSampleEntry<B = BoxBuf> {
    b: B,
}

impl VisualSampleEntry {
    pub fn new(tag: FourCC) -> Self {
        let mut v = Self { b: BoxBuf::with_payload(tag, 78) };
        let h = v.header_len();
        let _ = v.set_u16(h + 6, 1); // data_reference_index
        let _ = v.set_u32(h + 28, 0x0048_0000); // 72 dpi
        let _ = v.set_u32(h + 32, 0x0048_0000);
        let _ = v.set_u16(h + 40, 1); // frame_count
        let _ = v.set_u16(h + 74, 0x0018); // depth
        let _ = v.set_u16(h + 76, 0xFFFF); // pre_defined = -1
        v
    }

    pub fn avc1() -> Self {
        Self::new(FourCC(*b"avc1"))
    }
}

impl<B: BoxRead> VisualSampleEntry<B> {
    pub fn from_box(b: B) -> Self {
        Self { b }
    }

    pub fn into_inner(self) -> B { self.b }

    pub fn data_reference_index(&self) -> Result<u16> {
        let h = self.header_len();
        self.get_u16(h + 6)
    }

    pub fn width(&self) -> Result<u16> {
        let h = self.header_len();
        self.get_u16(h + 24)
    }

    pub fn height(&self) -> Result<u16> {
        let h = self.header_len();
        self.get_u16(h + 26)
    }

    pub fn horiz_resolution(&self) -> Result<u32> {
        let h = self.header_len();
        self.get_u32(h + 28)
    }

    pub fn vert_resolution(&self) -> Result<u32> {
        let h = self.header_len();
        self.get_u32(h + 32)
    }

    pub fn frame_count(&self) -> Result<u16> {
        let h = self.header_len();
        self.get_u16(h + 40)
    }

    /// Pascal-style compressor name, at most 31 characters.
    pub fn compressor_name(&self) -> Result<String> {
        let h = self.header_len();
        let len = (self.get_u8(h + 42)? as usize).min(31);
        let b = self.as_bytes();
        if h + 43 + len > b.len() { return Err(BoxError::MalformedInput("compressor name overruns record")); }
        Ok(lossy_str(&b[h + 43..h + 43 + len]))
    }

    pub fn depth(&self) -> Result<u16> {
        let h = self.header_len();
        self.get_u16(h + 74)
    }

    /// Extension boxes (clap, pasp, codec configuration) following the
    /// fixed fields.
    pub fn extension(&self, index: u32) -> Result<BoxView<'_>> {
        let h = self.header_len();
        let spans = child_spans(self.as_bytes(), h + 78);
        match spans.get(index as usize) {
            Some(&(off, _)) => self.get_box(off),
            None => Err(oob(index as usize, spans.len())),
        }
    }

    fn find_extension(&self, tag: FourCC) -> Option<BoxView<'_>> {
        let h = self.header_len();
        let bytes = self.as_bytes();
        child_spans(bytes, h + 78)
            .into_iter()
            .filter_map(|(off, len)| BoxView::new(&bytes[off..off + len]).ok())
            .find(|v| v.box_type() == tag)
    }

    pub fn clap(&self) -> Option<BoxView<'_>> {
        self.find_extension(FourCC(*b"clap"))
    }

    pub fn pasp(&self) -> Option<BoxView<'_>> {
        self.find_extension(FourCC(*b"pasp"))
    }

    pub fn avc_config(&self) -> Option<AvcC<BoxView<'_>>> {
        self.find_extension(FourCC(*b"avcC"))
            .and_then(|v| AvcC::from_box(v).ok())
    }

    pub fn to_pretty_string(&self, indent: usize) -> String {
        let ind = " ".repeat(indent);
        let mut out = format!(
            "{ind}[{}] Visual Sample Entry ({})\n{ind}  data_reference_index: {}\n{ind}  width: {} height: {}\n",
            self.box_type(),
            self.boxed_size(),
            self.data_reference_index().unwrap_or(0),
            self.width().unwrap_or(0),
            self.height().unwrap_or(0)
        );
        for i in 0.. {
            match self.extension(i) {
                Ok(child) => out.push_str(&crate::pretty::box_to_string(&child, indent + 2)),
                Err(_) => break,
            }
        }
        out
    }
}

impl<B: BoxWrite> VisualSampleEntry<B> {
    pub fn set_data_reference_index(&mut self, v: u16) -> Result<()> {
        let h = self.header_len();
        self.set_u16(h + 6, v)
    }

    pub fn set_width(&mut self, v: u16) -> Result<()> {
        let h = self.header_len();
        self.set_u16(h + 24, v)
    }

    pub fn set_height(&mut self, v: u16) -> Result<()> {
        let h = self.header_len();
        self.set_u16(h + 26, v)
    }

    pub fn set_horiz_resolution(&mut self, v: u32) -> Result<()> {
        let h = self.header_len();
        self.set_u32(h + 28, v)
    }

    pub fn set_vert_resolution(&mut self, v: u32) -> Result<()> {
        let h = self.header_len();
        self.set_u32(h + 32, v)
    }

    pub fn set_frame_count(&mut self, v: u16) -> Result<()> {
        let h = self.header_len();
        self.set_u16(h + 40, v)
    }

    pub fn set_compressor_name(&mut self, name: &str) -> Result<()> {
        let h = self.header_len();
        let bytes = name.as_bytes();
        let len = bytes.len().min(31);
        self.set_u8(h + 42, len as u8)?;
        for i in 0..31 {
            self.set_u8(h + 43 + i, if i < len { bytes[i] } else { 0 })?;
        }
        Ok(())
    }

    pub fn set_depth(&mut self, v: u16) -> Result<()> {
        let h = self.header_len();
        self.set_u16(h + 74, v)
    }

    /// Append an extension box after the fixed fields.
    pub fn append_extension(&mut self, child: &impl BoxRead) -> Result<()> {
        let end = self.as_bytes().len();
        self.set_box(child, end)
    }
}

impl<B: BoxRead> BoxRead for VisualSampleEntry<B> {
    fn as_bytes(&self) -> &[u8] { self.b.as_bytes() }
}

impl<B: BoxWrite> BoxWrite for VisualSampleEntry<B> {
    fn as_bytes_mut(&mut self) -> &mut [u8] { self.b.as_bytes_mut() }

    fn reserve(&mut self, position: usize, current: usize, wanted: usize) -> Result<()> {
        self.b.reserve(position, current, wanted)
    }
}

/// Audio sample entry (mp4a and friends).
pub struct AudioSampleEntry<B = BoxBuf> {
    b: B,
}

impl AudioSampleEntry {
    pub fn new(tag: FourCC) -> Self {
        let mut a = Self { b: BoxBuf::with_payload(tag, 28) };
        let h = a.header_len();
        let _ = a.set_u16(h + 6, 1); // data_reference_index
        let _ = a.set_u16(h + 16, 2); // channel_count
        let _ = a.set_u16(h + 18, 16); // sample_size
        a
    }

    pub fn mp4a() -> Self {
        Self::new(FourCC(*b"mp4a"))
    }
}

impl<B: BoxRead> AudioSampleEntry<B> {
    pub fn from_box(b: B) -> Self {
        Self { b }
    }

    pub fn into_inner(self) -> B { self.b }

    pub fn data_reference_index(&self) -> Result<u16> {
        let h = self.header_len();
        self.get_u16(h + 6)
    }

    pub fn channel_count(&self) -> Result<u16> {
        let h = self.header_len();
        self.get_u16(h + 16)
    }

    pub fn sample_size(&self) -> Result<u16> {
        let h = self.header_len();
        self.get_u16(h + 18)
    }

    pub fn pre_defined(&self) -> Result<u16> {
        let h = self.header_len();
        self.get_u16(h + 20)
    }

    /// Sample rate, stored as 16.16 fixed point on the wire.
    pub fn sample_rate(&self) -> Result<u32> {
        let h = self.header_len();
        Ok(self.get_u32(h + 24)? >> 16)
    }

    pub fn to_pretty_string(&self, indent: usize) -> String {
        let ind = " ".repeat(indent);
        format!(
            "{ind}[{}] Audio Sample Entry ({})\n{ind}  channel_count: {}\n{ind}  sample_size: {}\n{ind}  sample_rate: {}\n",
            self.box_type(),
            self.boxed_size(),
            self.channel_count().unwrap_or(0),
            self.sample_size().unwrap_or(0),
            self.sample_rate().unwrap_or(0)
        )
    }
}

impl<B: BoxWrite> AudioSampleEntry<B> {
    pub fn set_data_reference_index(&mut self, v: u16) -> Result<()> {
        let h = self.header_len();
        self.set_u16(h + 6, v)
    }

    pub fn set_channel_count(&mut self, v: u16) -> Result<()> {
        let h = self.header_len();
        self.set_u16(h + 16, v)
    }

    pub fn set_sample_size(&mut self, v: u16) -> Result<()> {
        let h = self.header_len();
        self.set_u16(h + 18, v)
    }

    pub fn set_pre_defined(&mut self, v: u16) -> Result<()> {
        let h = self.header_len();
        self.set_u16(h + 20, v)
    }

    pub fn set_sample_rate(&mut self, v: u32) -> Result<()> {
        let h = self.header_len();
        self.set_u32(h + 24, v << 16)
    }
}

impl<B: BoxRead> BoxRead for AudioSampleEntry<B> {
    fn as_bytes(&self) -> &[u8] { self.b.as_bytes() }
}

impl<B: BoxWrite> BoxWrite for AudioSampleEntry<B> {
    fn as_bytes_mut(&mut self) -> &mut [u8] { self.b.as_bytes_mut() }

    fn reserve(&mut self, position: usize, current: usize, wanted: usize) -> Result<()> {
        self.b.reserve(position, current, wanted)
    }
}

box_wrapper!(
    /// Clean Aperture Box.
    Clap, b"clap");

impl Clap {
    pub fn new() -> Self {
        Self { b: BoxBuf::with_payload(Self::TAG, 32) }
    }
}

impl Default for Clap {
    fn default() -> Self { Self::new() }
}

impl<B: BoxRead> Clap<B> {
    pub fn width_n(&self) -> Result<u32> { let h = self.header_len(); self.get_u32(h) }
    pub fn width_d(&self) -> Result<u32> { let h = self.header_len(); self.get_u32(h + 4) }
    pub fn height_n(&self) -> Result<u32> { let h = self.header_len(); self.get_u32(h + 8) }
    pub fn height_d(&self) -> Result<u32> { let h = self.header_len(); self.get_u32(h + 12) }
    pub fn horiz_off_n(&self) -> Result<u32> { let h = self.header_len(); self.get_u32(h + 16) }
    pub fn horiz_off_d(&self) -> Result<u32> { let h = self.header_len(); self.get_u32(h + 20) }
    pub fn vert_off_n(&self) -> Result<u32> { let h = self.header_len(); self.get_u32(h + 24) }
    pub fn vert_off_d(&self) -> Result<u32> { let h = self.header_len(); self.get_u32(h + 28) }

    pub fn to_pretty_string(&self, indent: usize) -> String {
        let ind = " ".repeat(indent);
        format!(
            "{ind}[clap] Clean Aperture Box ({})\n{ind}  width: {}/{} height: {}/{}\n",
            self.boxed_size(),
            self.width_n().unwrap_or(0),
            self.width_d().unwrap_or(0),
            self.height_n().unwrap_or(0),
            self.height_d().unwrap_or(0)
        )
    }
}

impl<B: BoxWrite> Clap<B> {
    pub fn set_width_n(&mut self, v: u32) -> Result<()> { let h = self.header_len(); self.set_u32(h, v) }
    pub fn set_width_d(&mut self, v: u32) -> Result<()> { let h = self.header_len(); self.set_u32(h + 4, v) }
    pub fn set_height_n(&mut self, v: u32) -> Result<()> { let h = self.header_len(); self.set_u32(h + 8, v) }
    pub fn set_height_d(&mut self, v: u32) -> Result<()> { let h = self.header_len(); self.set_u32(h + 12, v) }
    pub fn set_horiz_off_n(&mut self, v: u32) -> Result<()> { let h = self.header_len(); self.set_u32(h + 16, v) }
    pub fn set_horiz_off_d(&mut self, v: u32) -> Result<()> { let h = self.header_len(); self.set_u32(h + 20, v) }
    pub fn set_vert_off_n(&mut self, v: u32) -> Result<()> { let h = self.header_len(); self.set_u32(h + 24, v) }
    pub fn set_vert_off_d(&mut self, v: u32) -> Result<()> { let h = self.header_len(); self.set_u32(h + 28, v) }
}

box_wrapper!(
    /// Pixel Aspect Ratio Box.
    Pasp, b"pasp");

impl Pasp {
    pub fn new() -> Self {
        let mut p = Self { b: BoxBuf::with_payload(Self::TAG, 8) };
        let h = p.header_len();
        let _ = p.set_u32(h, 1);
        let _ = p.set_u32(h + 4, 1);
        p
    }
}

impl Default for Pasp {
    fn default() -> Self { Self::new() }
}

impl<B: BoxRead> Pasp<B> {
    pub fn h_spacing(&self) -> Result<u32> { let h = self.header_len(); self.get_u32(h) }
    pub fn v_spacing(&self) -> Result<u32> { let h = self.header_len(); self.get_u32(h + 4) }

    pub fn to_pretty_string(&self, indent: usize) -> String {
        let ind = " ".repeat(indent);
        format!(
            "{ind}[pasp] Pixel Aspect Ratio Box ({})\n{ind}  spacing: {}:{}\n",
            self.boxed_size(),
            self.h_spacing().unwrap_or(0),
            self.v_spacing().unwrap_or(0)
        )
    }
}

impl<B: BoxWrite> Pasp<B> {
    pub fn set_h_spacing(&mut self, v: u32) -> Result<()> { let h = self.header_len(); self.set_u32(h, v) }
    pub fn set_v_spacing(&mut self, v: u32) -> Result<()> { let h = self.header_len(); self.set_u32(h + 4, v) }
}

box_wrapper!(
    /// AVC Decoder Configuration Record (avcC): one length-prefixed SPS and
    /// one PPS plus profile/level bytes.
    AvcC, b"avcC");

impl AvcC {
    pub fn new() -> Self {
        let mut a = Self { b: BoxBuf::with_payload(Self::TAG, 11) };
        let h = a.header_len();
        let _ = a.set_u8(h, 1); // configurationVersion
        let _ = a.set_u8(h + 4, 0xFF); // 4-byte NAL lengths
        let _ = a.set_u8(h + 5, 0xE1); // one SPS
        let _ = a.set_u8(h + 8, 1); // one PPS
        a
    }
}

impl Default for AvcC {
    fn default() -> Self { Self::new() }
}

impl<B: BoxRead> AvcC<B> {
    pub fn configuration_version(&self) -> Result<u8> {
        let h = self.header_len();
        self.get_u8(h)
    }

    pub fn profile(&self) -> Result<u8> {
        let h = self.header_len();
        self.get_u8(h + 1)
    }

    pub fn compatible_profiles(&self) -> Result<u8> {
        let h = self.header_len();
        self.get_u8(h + 2)
    }

    pub fn level(&self) -> Result<u8> {
        let h = self.header_len();
        self.get_u8(h + 3)
    }

    pub fn sps_number(&self) -> Result<u8> {
        let h = self.header_len();
        Ok(self.get_u8(h + 5)? & 0x1F)
    }

    pub fn sps_len(&self) -> Result<u16> {
        let h = self.header_len();
        self.get_u16(h + 6)
    }

    pub fn sps(&self) -> Result<&[u8]> {
        let h = self.header_len();
        let len = self.sps_len()? as usize;
        let b = self.as_bytes();
        if h + 8 + len > b.len() {
            return Err(BoxError::MalformedInput("SPS overruns record"));
        }
        Ok(&b[h + 8..h + 8 + len])
    }

    pub fn pps_number(&self) -> Result<u8> {
        let h = self.header_len();
        let sps = self.sps_len()? as usize;
        self.get_u8(h + 8 + sps)
    }

    pub fn pps_len(&self) -> Result<u16> {
        let h = self.header_len();
        let sps = self.sps_len()? as usize;
        self.get_u16(h + 9 + sps)
    }

    pub fn pps(&self) -> Result<&[u8]> {
        let h = self.header_len();
        let sps = self.sps_len()? as usize;
        let len = self.pps_len()? as usize;
        let b = self.as_bytes();
        if h + 11 + sps + len > b.len() {
            return Err(BoxError::MalformedInput("PPS overruns record"));
        }
        Ok(&b[h + 11 + sps..h + 11 + sps + len])
    }

    /// Re-emit the stored parameter sets as an Annex-B elementary-stream
    /// fragment with 4-byte start codes.
    pub fn as_annex_b(&self) -> Result<Vec<u8>> {
        let sps = self.sps()?;
        let pps = self.pps()?;
        let mut out = Vec::with_capacity(sps.len() + pps.len() + 8);
        out.extend_from_slice(&[0, 0, 0, 1]);
        out.extend_from_slice(sps);
        out.extend_from_slice(&[0, 0, 0, 1]);
        out.extend_from_slice(pps);
        Ok(out)
    }

    pub fn to_pretty_string(&self, indent: usize) -> String {
        let ind = " ".repeat(indent);
        let mut out = format!("{ind}[avcC] AVC Configuration Box ({})\n", self.boxed_size());
        out.push_str(&format!("{ind}  profile: {} level: {}\n", self.profile().unwrap_or(0), self.level().unwrap_or(0)));
        out.push_str(&format!("{ind}  sps: {}\n", self.sps().map(hex::encode).unwrap_or_default()));
        out.push_str(&format!("{ind}  pps: {}\n", self.pps().map(hex::encode).unwrap_or_default()));
        out
    }
}

impl<B: BoxWrite> AvcC<B> {
    pub fn set_configuration_version(&mut self, v: u8) -> Result<()> {
        let h = self.header_len();
        self.set_u8(h, v)
    }

    pub fn set_profile(&mut self, v: u8) -> Result<()> {
        let h = self.header_len();
        self.set_u8(h + 1, v)
    }

    pub fn set_compatible_profiles(&mut self, v: u8) -> Result<()> {
        let h = self.header_len();
        self.set_u8(h + 2, v)
    }

    pub fn set_level(&mut self, v: u8) -> Result<()> {
        let h = self.header_len();
        self.set_u8(h + 3, v)
    }

    pub fn set_sps_number(&mut self, n: u8) -> Result<()> {
        let h = self.header_len();
        self.set_u8(h + 5, 0xE0 | (n & 0x1F))
    }

    pub fn set_sps(&mut self, data: &[u8]) -> Result<()> {
        let h = self.header_len();
        let current = self.sps_len()? as usize;
        self.reserve(h + 8, current, data.len())?;
        self.as_bytes_mut()[h + 8..h + 8 + data.len()].copy_from_slice(data);
        self.set_u16(h + 6, data.len() as u16)
    }

    pub fn set_pps_number(&mut self, n: u8) -> Result<()> {
        let h = self.header_len();
        let sps = self.sps_len()? as usize;
        self.set_u8(h + 8 + sps, n)
    }

    pub fn set_pps(&mut self, data: &[u8]) -> Result<()> {
        let h = self.header_len();
        let sps = self.sps_len()? as usize;
        let current = self.pps_len()? as usize;
        self.reserve(h + 11 + sps, current, data.len())?;
        self.as_bytes_mut()[h + 11 + sps..h + 11 + sps + data.len()].copy_from_slice(data);
        self.set_u16(h + 9 + sps, data.len() as u16)
    }

    /// Replace the whole configuration record payload.
    pub fn set_payload(&mut self, data: &[u8]) -> Result<()> {
        let h = self.header_len();
        self.set_string(data, h)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SttsEntry {
    pub sample_count: u32,
    pub sample_delta: u32,
}

full_box!(
    /// Decoding Time-to-Sample Box: run-length (count, delta) pairs.
    Stts, b"stts");

impl Stts {
    pub fn new() -> Self {
        Self { b: BoxBuf::with_payload(Self::TAG, 8) }
    }
}

impl Default for Stts {
    fn default() -> Self { Self::new() }
}

impl<B: BoxRead> Stts<B> {
    pub fn entry_count(&self) -> Result<u32> {
        let h = self.header_len();
        self.get_u32(h + 4)
    }

    pub fn entry(&self, index: u32) -> Result<SttsEntry> {
        let count = self.entry_count()?;
        if index >= count { return Err(oob(index as usize, count as usize)); }
        let off = self.header_len() + 8 + index as usize * 8;
        Ok(SttsEntry {
            sample_count: self.get_u32(off)?,
            sample_delta: self.get_u32(off + 4)?,
        })
    }

    pub fn to_pretty_string(&self, indent: usize) -> String {
        let ind = " ".repeat(indent);
        let count = self.entry_count().unwrap_or(0);
        let mut out = format!("{ind}[stts] Decoding Time-to-Sample Box ({})\n", self.boxed_size());
        out.push_str(&format!("{ind}  entry_count: {count}\n"));
        for i in 0..count {
            if let Ok(e) = self.entry(i) {
                out.push_str(&format!("{ind}  [{i}] count: {} delta: {}\n", e.sample_count, e.sample_delta));
            }
        }
        out
    }
}

impl<B: BoxWrite> Stts<B> {
    /// Write entry `index`, growing the table (zero-filled) and bumping the
    /// count when writing at or past the current end.
    pub fn set_entry(&mut self, index: u32, entry: SttsEntry) -> Result<()> {
        let h = self.header_len();
        let count = self.entry_count()?;
        if index >= count {
            let need = h + 8 + (index as usize + 1) * 8;
            let len = self.as_bytes().len();
            if need > len {
                self.reserve(len, 0, need - len)?;
            }
            self.set_u32(h + 4, index + 1)?;
        }
        let off = h + 8 + index as usize * 8;
        self.set_u32(off, entry.sample_count)?;
        self.set_u32(off + 4, entry.sample_delta)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CttsEntry {
    pub sample_count: u32,
    pub sample_offset: u32,
}

full_box!(
    /// Composition Time-to-Sample Box.
    Ctts, b"ctts");

impl Ctts {
    pub fn new() -> Self {
        Self { b: BoxBuf::with_payload(Self::TAG, 8) }
    }
}

impl Default for Ctts {
    fn default() -> Self { Self::new() }
}

impl<B: BoxRead> Ctts<B> {
    pub fn entry_count(&self) -> Result<u32> {
        let h = self.header_len();
        self.get_u32(h + 4)
    }

    pub fn entry(&self, index: u32) -> Result<CttsEntry> {
        let count = self.entry_count()?;
        if index >= count { return Err(oob(index as usize, count as usize)); }
        let off = self.header_len() + 8 + index as usize * 8;
        Ok(CttsEntry {
            sample_count: self.get_u32(off)?,
            sample_offset: self.get_u32(off + 4)?,
        })
    }

    pub fn to_pretty_string(&self, indent: usize) -> String {
        let ind = " ".repeat(indent);
        let count = self.entry_count().unwrap_or(0);
        let mut out = format!("{ind}[ctts] Composition Time-to-Sample Box ({})\n", self.boxed_size());
        out.push_str(&format!("{ind}  entry_count: {count}\n"));
        for i in 0..count {
            if let Ok(e) = self.entry(i) {
                out.push_str(&format!("{ind}  [{i}] count: {} offset: {}\n", e.sample_count, e.sample_offset));
            }
        }
        out
    }
}

impl<B: BoxWrite> Ctts<B> {
    pub fn set_entry(&mut self, index: u32, entry: CttsEntry) -> Result<()> {
        let h = self.header_len();
        let count = self.entry_count()?;
        if index >= count {
            let need = h + 8 + (index as usize + 1) * 8;
            let len = self.as_bytes().len();
            if need > len {
                self.reserve(len, 0, need - len)?;
            }
            self.set_u32(h + 4, index + 1)?;
        }
        let off = h + 8 + index as usize * 8;
        self.set_u32(off, entry.sample_count)?;
        self.set_u32(off + 4, entry.sample_offset)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StscEntry {
    pub first_chunk: u32,
    pub samples_per_chunk: u32,
    pub sample_description_index: u32,
}

full_box!(
    /// Sample-to-Chunk Box.
    Stsc, b"stsc");

impl Stsc {
    pub fn new() -> Self {
        Self { b: BoxBuf::with_payload(Self::TAG, 8) }
    }
}

impl Default for Stsc {
    fn default() -> Self { Self::new() }
}

impl<B: BoxRead> Stsc<B> {
    pub fn entry_count(&self) -> Result<u32> {
        let h = self.header_len();
        self.get_u32(h + 4)
    }

    pub fn entry(&self, index: u32) -> Result<StscEntry> {
        let count = self.entry_count()?;
        if index >= count { return Err(oob(index as usize, count as usize)); }
        let off = self.header_len() + 8 + index as usize * 12;
        Ok(StscEntry {
            first_chunk: self.get_u32(off)?,
            samples_per_chunk: self.get_u32(off + 4)?,
            sample_description_index: self.get_u32(off + 8)?,
        })
    }

    pub fn to_pretty_string(&self, indent: usize) -> String {
        let ind = " ".repeat(indent);
        let count = self.entry_count().unwrap_or(0);
        let mut out = format!("{ind}[stsc] Sample-to-Chunk Box ({})\n", self.boxed_size());
        out.push_str(&format!("{ind}  entry_count: {count}\n"));
        for i in 0..count {
            if let Ok(e) = self.entry(i) {
                out.push_str(&format!(
                    "{ind}  [{i}] first_chunk: {} samples_per_chunk: {} description: {}\n",
                    e.first_chunk, e.samples_per_chunk, e.sample_description_index
                ));
            }
        }
        out
    }
}

impl<B: BoxWrite> Stsc<B> {
    pub fn set_entry(&mut self, index: u32, entry: StscEntry) -> Result<()> {
        let h = self.header_len();
        let count = self.entry_count()?;
        if index >= count {
            let need = h + 8 + (index as usize + 1) * 12;
            let len = self.as_bytes().len();
            if need > len {
                self.reserve(len, 0, need - len)?;
            }
            self.set_u32(h + 4, index + 1)?;
        }
        let off = h + 8 + index as usize * 12;
        self.set_u32(off, entry.first_chunk)?;
        self.set_u32(off + 4, entry.samples_per_chunk)?;
        self.set_u32(off + 8, entry.sample_description_index)
    }
}

full_box!(
    /// Chunk Offset Box (32-bit).
    Stco, b"stco");

impl Stco {
    pub fn new() -> Self {
        Self { b: BoxBuf::with_payload(Self::TAG, 8) }
    }
}

impl Default for Stco {
    fn default() -> Self { Self::new() }
}

impl<B: BoxRead> Stco<B> {
    pub fn entry_count(&self) -> Result<u32> {
        let h = self.header_len();
        self.get_u32(h + 4)
    }

    pub fn chunk_offset(&self, index: u32) -> Result<u32> {
        let count = self.entry_count()?;
        if index >= count { return Err(oob(index as usize, count as usize)); }
        self.get_u32(self.header_len() + 8 + index as usize * 4)
    }

    pub fn to_pretty_string(&self, indent: usize) -> String {
        let ind = " ".repeat(indent);
        let count = self.entry_count().unwrap_or(0);
        let mut out = format!("{ind}[stco] Chunk Offset Box ({})\n", self.boxed_size());
        out.push_str(&format!("{ind}  entry_count: {count}\n"));
        for i in 0..count {
            if let Ok(v) = self.chunk_offset(i) {
                out.push_str(&format!("{ind}  [{i}] offset: {v}\n"));
            }
        }
        out
    }
}

impl<B: BoxWrite> Stco<B> {
    pub fn set_chunk_offset(&mut self, index: u32, v: u32) -> Result<()> {
        let h = self.header_len();
        let count = self.entry_count()?;
        if index >= count {
            let need = h + 8 + (index as usize + 1) * 4;
            let len = self.as_bytes().len();
            if need > len {
                self.reserve(len, 0, need - len)?;
            }
            self.set_u32(h + 4, index + 1)?;
        }
        self.set_u32(h + 8 + index as usize * 4, v)
    }
}

full_box!(
    /// Sample Size Box: fixed size or one size per sample.
    Stsz, b"stsz");

impl Stsz {
    pub fn new() -> Self {
        Self { b: BoxBuf::with_payload(Self::TAG, 12) }
    }
}

impl Default for Stsz {
    fn default() -> Self { Self::new() }
}

impl<B: BoxRead> Stsz<B> {
    /// Fixed sample size; 0 means per-sample sizes follow.
    pub fn sample_size(&self) -> Result<u32> {
        let h = self.header_len();
        self.get_u32(h + 4)
    }

    pub fn sample_count(&self) -> Result<u32> {
        let h = self.header_len();
        self.get_u32(h + 8)
    }

    pub fn entry_size(&self, index: u32) -> Result<u32> {
        let count = self.sample_count()?;
        if index >= count { return Err(oob(index as usize, count as usize)); }
        self.get_u32(self.header_len() + 12 + index as usize * 4)
    }

    pub fn to_pretty_string(&self, indent: usize) -> String {
        let ind = " ".repeat(indent);
        let count = self.sample_count().unwrap_or(0);
        let mut out = format!("{ind}[stsz] Sample Size Box ({})\n", self.boxed_size());
        out.push_str(&format!("{ind}  sample_size: {}\n", self.sample_size().unwrap_or(0)));
        out.push_str(&format!("{ind}  sample_count: {count}\n"));
        for i in 0..count {
            if let Ok(v) = self.entry_size(i) {
                out.push_str(&format!("{ind}  [{i}] size: {v}\n"));
            }
        }
        out
    }
}

impl<B: BoxWrite> Stsz<B> {
    pub fn set_sample_size(&mut self, v: u32) -> Result<()> {
        let h = self.header_len();
        self.set_u32(h + 4, v)
    }

    pub fn set_sample_count(&mut self, v: u32) -> Result<()> {
        let h = self.header_len();
        self.set_u32(h + 8, v)
    }

    pub fn set_entry_size(&mut self, index: u32, v: u32) -> Result<()> {
        let h = self.header_len();
        let count = self.sample_count()?;
        if index >= count {
            let need = h + 12 + (index as usize + 1) * 4;
            let len = self.as_bytes().len();
            if need > len {
                self.reserve(len, 0, need - len)?;
            }
            self.set_u32(h + 8, index + 1)?;
        }
        self.set_u32(h + 12 + index as usize * 4, v)
    }
}

full_box!(
    /// Sync Sample Box: keyframe sample numbers.
    Stss, b"stss");

impl Stss {
    pub fn new() -> Self {
        Self { b: BoxBuf::with_payload(Self::TAG, 8) }
    }
}

impl Default for Stss {
    fn default() -> Self { Self::new() }
}

impl<B: BoxRead> Stss<B> {
    pub fn entry_count(&self) -> Result<u32> {
        let h = self.header_len();
        self.get_u32(h + 4)
    }

    pub fn sample_number(&self, index: u32) -> Result<u32> {
        let count = self.entry_count()?;
        if index >= count { return Err(oob(index as usize, count as usize)); }
        self.get_u32(self.header_len() + 8 + index as usize * 4)
    }

    pub fn to_pretty_string(&self, indent: usize) -> String {
        let ind = " ".repeat(indent);
        let count = self.entry_count().unwrap_or(0);
        let mut out = format!("{ind}[stss] Sync Sample Box ({})\n", self.boxed_size());
        out.push_str(&format!("{ind}  entry_count: {count}\n"));
        for i in 0..count {
            if let Ok(v) = self.sample_number(i) {
                out.push_str(&format!("{ind}  [{i}] sample: {v}\n"));
            }
        }
        out
    }
}

impl<B: BoxWrite> Stss<B> {
    pub fn set_sample_number(&mut self, index: u32, v: u32) -> Result<()> {
        let h = self.header_len();
        let count = self.entry_count()?;
        if index >= count {
            let need = h + 8 + (index as usize + 1) * 4;
            let len = self.as_bytes().len();
            if need > len {
                self.reserve(len, 0, need - len)?;
            }
            self.set_u32(h + 4, index + 1)?;
        }
        self.set_u32(h + 8 + index as usize * 4, v)
    }
}

full_box!(
    /// Sample Dependency Type Box: one dependency byte per sample.
    Sdtp, b"sdtp");

impl Sdtp {
    pub fn new() -> Self {
        Self { b: BoxBuf::with_payload(Self::TAG, 4) }
    }
}

impl Default for Sdtp {
    fn default() -> Self { Self::new() }
}

impl<B: BoxRead> Sdtp<B> {
    pub fn value_count(&self) -> u32 {
        self.payload_size().saturating_sub(4) as u32
    }

    pub fn value(&self, index: u32) -> Result<u8> {
        let count = self.value_count();
        if index >= count { return Err(oob(index as usize, count as usize)); }
        self.get_u8(self.header_len() + 4 + index as usize)
    }

    pub fn to_pretty_string(&self, indent: usize) -> String {
        let ind = " ".repeat(indent);
        let mut out = format!("{ind}[sdtp] Sample Dependency Type Box ({})\n", self.boxed_size());
        for i in 0..self.value_count() {
            if let Ok(v) = self.value(i) {
                out.push_str(&format!("{ind}  [{i}] {v:#04x}\n"));
            }
        }
        out
    }
}

impl<B: BoxWrite> Sdtp<B> {
    pub fn set_value(&mut self, index: u32, v: u8) -> Result<()> {
        let h = self.header_len();
        let need = h + 4 + index as usize + 1;
        let len = self.as_bytes().len();
        if need > len {
            self.reserve(len, 0, need - len)?;
        }
        self.set_u8(h + 4 + index as usize, v)
    }
}
