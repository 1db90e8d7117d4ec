//! File-level and movie-structure boxes: ftyp, the moov tree containers and
//! the header boxes that live inside them.

use crate::boxed::{BoxBuf, BoxRead, BoxView, BoxWrite, FourCC};
use crate::container::child_spans;
use crate::error::Result;
use crate::full::{VersionFlags, VersionFlagsMut};

use super::{cstr_len, lossy_str};

box_wrapper!(
    /// File Type Box: major/minor brand plus compatible-brand list.
    Ftyp, b"ftyp");

impl Ftyp {
    pub fn new() -> Self {
        Self { b: BoxBuf::with_payload(Self::TAG, 8) }
    }
}

impl Default for Ftyp {
    fn default() -> Self { Self::new() }
}

impl<B: BoxRead> Ftyp<B> {
    pub fn major_brand(&self) -> Result<FourCC> {
        let h = self.header_len();
        Ok(FourCC(self.get_u32(h)?.to_be_bytes()))
    }

    pub fn minor_version(&self) -> Result<u32> {
        let h = self.header_len();
        self.get_u32(h + 4)
    }

    pub fn compatible_brands_count(&self) -> u32 {
        (self.payload_size().saturating_sub(8) / 4) as u32
    }

    pub fn compatible_brand(&self, index: u32) -> Result<FourCC> {
        if index >= self.compatible_brands_count() {
            return Err(crate::boxed::oob(index as usize, self.compatible_brands_count() as usize));
        }
        let h = self.header_len();
        Ok(FourCC(self.get_u32(h + 8 + 4 * index as usize)?.to_be_bytes()))
    }

    pub fn to_pretty_string(&self, indent: usize) -> String {
        let ind = " ".repeat(indent);
        let mut out = format!("{ind}[ftyp] File Type Box ({})\n", self.boxed_size());
        out.push_str(&format!("{ind}  major_brand: {}\n", self.major_brand().unwrap_or(FourCC([0; 4]))));
        out.push_str(&format!("{ind}  minor_version: {}\n", self.minor_version().unwrap_or(0)));
        for i in 0..self.compatible_brands_count() {
            if let Ok(cc) = self.compatible_brand(i) {
                out.push_str(&format!("{ind}  compatible_brand: {cc}\n"));
            }
        }
        out
    }
}

impl<B: BoxWrite> Ftyp<B> {
    pub fn set_major_brand(&mut self, cc: FourCC) -> Result<()> {
        let h = self.header_len();
        self.set_u32(h, u32::from_be_bytes(cc.0))
    }

    pub fn set_minor_version(&mut self, v: u32) -> Result<()> {
        let h = self.header_len();
        self.set_u32(h + 4, v)
    }

    /// Writes brand slot `index`, growing the list (zero-filled) as needed.
    pub fn set_compatible_brand(&mut self, index: u32, cc: FourCC) -> Result<()> {
        let h = self.header_len();
        let off = h + 8 + 4 * index as usize;
        let len = self.as_bytes().len();
        if off + 4 > len {
            self.reserve(len, 0, off + 4 - len)?;
        }
        self.set_u32(off, u32::from_be_bytes(cc.0))
    }
}

container_box!(
    /// Movie Box, root of the track/header tree.
    Moov, b"moov", "Movie Box");
container_box!(Trak, b"trak", "Track Box");
container_box!(Mdia, b"mdia", "Media Box");
container_box!(Minf, b"minf", "Media Information Box");
container_box!(Dinf, b"dinf", "Data Information Box");
container_box!(Stbl, b"stbl", "Sample Table Box");
container_box!(Edts, b"edts", "Edit Box");
container_box!(Udta, b"udta", "User Data Box");

full_box!(
    /// Movie Header Box. Timestamps and duration widen to 64 bits at
    /// version 1, which shifts every later field.
    Mvhd, b"mvhd");

impl Mvhd {
    pub fn new() -> Self {
        let mut m = Self { b: BoxBuf::with_payload(Self::TAG, 100) };
        let h = m.header_len();
        let _ = m.set_u32(h + 20, 0x0001_0000); // rate 1.0
        let _ = m.set_u16(h + 24, 0x0100); // volume 1.0
        let _ = m.set_u32(h + 36, 0x0001_0000);
        let _ = m.set_u32(h + 52, 0x0001_0000);
        let _ = m.set_u32(h + 68, 0x4000_0000);
        m
    }
}

impl Default for Mvhd {
    fn default() -> Self { Self::new() }
}

impl<B: BoxRead> Mvhd<B> {
    fn wide(&self) -> Result<bool> {
        Ok(self.version()? >= 1)
    }

    /// Record offset of the fields following the timing block.
    fn tail(&self) -> Result<usize> {
        Ok(self.header_len() + if self.wide()? { 32 } else { 20 })
    }

    pub fn creation_time(&self) -> Result<u64> {
        let h = self.header_len();
        if self.wide()? { self.get_u64(h + 4) } else { Ok(self.get_u32(h + 4)? as u64) }
    }

    pub fn modification_time(&self) -> Result<u64> {
        let h = self.header_len();
        if self.wide()? { self.get_u64(h + 12) } else { Ok(self.get_u32(h + 8)? as u64) }
    }

    pub fn time_scale(&self) -> Result<u32> {
        let h = self.header_len();
        if self.wide()? { self.get_u32(h + 20) } else { self.get_u32(h + 12) }
    }

    pub fn duration(&self) -> Result<u64> {
        let h = self.header_len();
        if self.wide()? { self.get_u64(h + 24) } else { Ok(self.get_u32(h + 16)? as u64) }
    }

    pub fn rate(&self) -> Result<u32> {
        self.get_u32(self.tail()?)
    }

    pub fn volume(&self) -> Result<u16> {
        self.get_u16(self.tail()? + 4)
    }

    pub fn matrix_count(&self) -> u32 { 9 }

    pub fn matrix(&self, index: u32) -> Result<i32> {
        if index >= 9 { return Err(crate::boxed::oob(index as usize, 9)); }
        Ok(self.get_u32(self.tail()? + 16 + 4 * index as usize)? as i32)
    }

    pub fn next_track_id(&self) -> Result<u32> {
        self.get_u32(self.tail()? + 76)
    }

    pub fn to_pretty_string(&self, indent: usize) -> String {
        let ind = " ".repeat(indent);
        let mut out = format!("{ind}[mvhd] Movie Header Box ({})\n", self.boxed_size());
        out.push_str(&format!("{ind}  version: {}\n", self.version().unwrap_or(0)));
        out.push_str(&format!("{ind}  creation_time: {}\n", self.creation_time().unwrap_or(0)));
        out.push_str(&format!("{ind}  modification_time: {}\n", self.modification_time().unwrap_or(0)));
        out.push_str(&format!("{ind}  time_scale: {}\n", self.time_scale().unwrap_or(0)));
        out.push_str(&format!("{ind}  duration: {}\n", self.duration().unwrap_or(0)));
        out.push_str(&format!("{ind}  rate: {:#010x}\n", self.rate().unwrap_or(0)));
        out.push_str(&format!("{ind}  volume: {:#06x}\n", self.volume().unwrap_or(0)));
        out.push_str(&format!("{ind}  next_track_id: {}\n", self.next_track_id().unwrap_or(0)));
        out
    }
}

impl<B: BoxWrite> Mvhd<B> {
    pub fn set_creation_time(&mut self, t: u64) -> Result<()> {
        let h = self.header_len();
        if self.wide()? { self.set_u64(h + 4, t) } else { self.set_u32(h + 4, t as u32) }
    }

    pub fn set_modification_time(&mut self, t: u64) -> Result<()> {
        let h = self.header_len();
        if self.wide()? { self.set_u64(h + 12, t) } else { self.set_u32(h + 8, t as u32) }
    }

    pub fn set_time_scale(&mut self, v: u32) -> Result<()> {
        let h = self.header_len();
        if self.wide()? { self.set_u32(h + 20, v) } else { self.set_u32(h + 12, v) }
    }

    pub fn set_duration(&mut self, d: u64) -> Result<()> {
        let h = self.header_len();
        if self.wide()? { self.set_u64(h + 24, d) } else { self.set_u32(h + 16, d as u32) }
    }

    pub fn set_rate(&mut self, v: u32) -> Result<()> {
        let off = self.tail()?;
        self.set_u32(off, v)
    }

    pub fn set_volume(&mut self, v: u16) -> Result<()> {
        let off = self.tail()? + 4;
        self.set_u16(off, v)
    }

    pub fn set_matrix(&mut self, index: u32, v: i32) -> Result<()> {
        if index >= 9 { return Err(crate::boxed::oob(index as usize, 9)); }
        let off = self.tail()? + 16 + 4 * index as usize;
        self.set_u32(off, v as u32)
    }

    pub fn set_next_track_id(&mut self, v: u32) -> Result<()> {
        let off = self.tail()? + 76;
        self.set_u32(off, v)
    }
}

full_box!(
    /// Track Header Box.
    Tkhd, b"tkhd");

impl Tkhd {
    pub fn new() -> Self {
        let mut t = Self { b: BoxBuf::with_payload(Self::TAG, 84) };
        let _ = t.set_flags(0x000007); // enabled, in movie, in preview
        let h = t.header_len();
        let _ = t.set_u16(h + 36, 0x0100); // volume
        let _ = t.set_u32(h + 40, 0x0001_0000);
        let _ = t.set_u32(h + 56, 0x0001_0000);
        let _ = t.set_u32(h + 72, 0x4000_0000);
        t
    }
}

impl Default for Tkhd {
    fn default() -> Self { Self::new() }
}

impl<B: BoxRead> Tkhd<B> {
    fn wide(&self) -> Result<bool> {
        Ok(self.version()? >= 1)
    }

    fn tail(&self) -> Result<usize> {
        Ok(self.header_len() + if self.wide()? { 36 } else { 24 })
    }

    pub fn creation_time(&self) -> Result<u64> {
        let h = self.header_len();
        if self.wide()? { self.get_u64(h + 4) } else { Ok(self.get_u32(h + 4)? as u64) }
    }

    pub fn modification_time(&self) -> Result<u64> {
        let h = self.header_len();
        if self.wide()? { self.get_u64(h + 12) } else { Ok(self.get_u32(h + 8)? as u64) }
    }

    pub fn track_id(&self) -> Result<u32> {
        let h = self.header_len();
        if self.wide()? { self.get_u32(h + 20) } else { self.get_u32(h + 12) }
    }

    pub fn duration(&self) -> Result<u64> {
        let h = self.header_len();
        if self.wide()? { self.get_u64(h + 28) } else { Ok(self.get_u32(h + 20)? as u64) }
    }

    pub fn layer(&self) -> Result<u16> {
        self.get_u16(self.tail()? + 8)
    }

    pub fn alternate_group(&self) -> Result<u16> {
        self.get_u16(self.tail()? + 10)
    }

    pub fn volume(&self) -> Result<u16> {
        self.get_u16(self.tail()? + 12)
    }

    pub fn matrix_count(&self) -> u32 { 9 }

    pub fn matrix(&self, index: u32) -> Result<i32> {
        if index >= 9 { return Err(crate::boxed::oob(index as usize, 9)); }
        Ok(self.get_u32(self.tail()? + 16 + 4 * index as usize)? as i32)
    }

    /// 16.16 fixed-point width.
    pub fn width(&self) -> Result<u32> {
        self.get_u32(self.tail()? + 52)
    }

    pub fn height(&self) -> Result<u32> {
        self.get_u32(self.tail()? + 56)
    }

    pub fn to_pretty_string(&self, indent: usize) -> String {
        let ind = " ".repeat(indent);
        let mut out = format!("{ind}[tkhd] Track Header Box ({})\n", self.boxed_size());
        out.push_str(&format!("{ind}  version: {}\n", self.version().unwrap_or(0)));
        out.push_str(&format!("{ind}  flags: {:#08x}\n", self.flags().unwrap_or(0)));
        out.push_str(&format!("{ind}  track_id: {}\n", self.track_id().unwrap_or(0)));
        out.push_str(&format!("{ind}  duration: {}\n", self.duration().unwrap_or(0)));
        out.push_str(&format!("{ind}  layer: {}\n", self.layer().unwrap_or(0)));
        out.push_str(&format!("{ind}  volume: {:#06x}\n", self.volume().unwrap_or(0)));
        out.push_str(&format!(
            "{ind}  width: {} height: {}\n",
            self.width().unwrap_or(0) >> 16,
            self.height().unwrap_or(0) >> 16
        ));
        out
    }
}

impl<B: BoxWrite> Tkhd<B> {
    pub fn set_creation_time(&mut self, t: u64) -> Result<()> {
        let h = self.header_len();
        if self.wide()? { self.set_u64(h + 4, t) } else { self.set_u32(h + 4, t as u32) }
    }

    pub fn set_modification_time(&mut self, t: u64) -> Result<()> {
        let h = self.header_len();
        if self.wide()? { self.set_u64(h + 12, t) } else { self.set_u32(h + 8, t as u32) }
    }

    pub fn set_track_id(&mut self, v: u32) -> Result<()> {
        let h = self.header_len();
        if self.wide()? { self.set_u32(h + 20, v) } else { self.set_u32(h + 12, v) }
    }

    pub fn set_duration(&mut self, d: u64) -> Result<()> {
        let h = self.header_len();
        if self.wide()? { self.set_u64(h + 28, d) } else { self.set_u32(h + 20, d as u32) }
    }

    pub fn set_layer(&mut self, v: u16) -> Result<()> {
        let off = self.tail()? + 8;
        self.set_u16(off, v)
    }

    pub fn set_alternate_group(&mut self, v: u16) -> Result<()> {
        let off = self.tail()? + 10;
        self.set_u16(off, v)
    }

    pub fn set_volume(&mut self, v: u16) -> Result<()> {
        let off = self.tail()? + 12;
        self.set_u16(off, v)
    }

    pub fn set_matrix(&mut self, index: u32, v: i32) -> Result<()> {
        if index >= 9 { return Err(crate::boxed::oob(index as usize, 9)); }
        let off = self.tail()? + 16 + 4 * index as usize;
        self.set_u32(off, v as u32)
    }

    pub fn set_width(&mut self, v: u32) -> Result<()> {
        let off = self.tail()? + 52;
        self.set_u32(off, v)
    }

    pub fn set_height(&mut self, v: u32) -> Result<()> {
        let off = self.tail()? + 56;
        self.set_u32(off, v)
    }
}

full_box!(
    /// Media Header Box.
    Mdhd, b"mdhd");

impl Mdhd {
    pub fn new() -> Self {
        let mut m = Self { b: BoxBuf::with_payload(Self::TAG, 24) };
        let h = m.header_len();
        let _ = m.set_u16(h + 20, 0x55C4); // language "und"
        m
    }
}

impl Default for Mdhd {
    fn default() -> Self { Self::new() }
}

impl<B: BoxRead> Mdhd<B> {
    fn wide(&self) -> Result<bool> {
        Ok(self.version()? >= 1)
    }

    fn tail(&self) -> Result<usize> {
        Ok(self.header_len() + if self.wide()? { 32 } else { 20 })
    }

    pub fn creation_time(&self) -> Result<u64> {
        let h = self.header_len();
        if self.wide()? { self.get_u64(h + 4) } else { Ok(self.get_u32(h + 4)? as u64) }
    }

    pub fn modification_time(&self) -> Result<u64> {
        let h = self.header_len();
        if self.wide()? { self.get_u64(h + 12) } else { Ok(self.get_u32(h + 8)? as u64) }
    }

    pub fn time_scale(&self) -> Result<u32> {
        let h = self.header_len();
        if self.wide()? { self.get_u32(h + 20) } else { self.get_u32(h + 12) }
    }

    pub fn duration(&self) -> Result<u64> {
        let h = self.header_len();
        if self.wide()? { self.get_u64(h + 24) } else { Ok(self.get_u32(h + 16)? as u64) }
    }

    /// Packed 3x5-bit ISO-639-2 language code.
    pub fn language(&self) -> Result<u16> {
        self.get_u16(self.tail()?)
    }

    /// Decoded language code, `"und"` for zero.
    pub fn language_code(&self) -> String {
        let code = self.language().unwrap_or(0);
        if code == 0 {
            return "und".to_string();
        }
        let c1 = ((code >> 10) & 0x1F) as u8 + 0x60;
        let c2 = ((code >> 5) & 0x1F) as u8 + 0x60;
        let c3 = (code & 0x1F) as u8 + 0x60;
        format!("{}{}{}", c1 as char, c2 as char, c3 as char)
    }

    pub fn to_pretty_string(&self, indent: usize) -> String {
        let ind = " ".repeat(indent);
        let mut out = format!("{ind}[mdhd] Media Header Box ({})\n", self.boxed_size());
        out.push_str(&format!("{ind}  version: {}\n", self.version().unwrap_or(0)));
        out.push_str(&format!("{ind}  time_scale: {}\n", self.time_scale().unwrap_or(0)));
        out.push_str(&format!("{ind}  duration: {}\n", self.duration().unwrap_or(0)));
        out.push_str(&format!("{ind}  language: {}\n", self.language_code()));
        out
    }
}

impl<B: BoxWrite> Mdhd<B> {
    pub fn set_creation_time(&mut self, t: u64) -> Result<()> {
        let h = self.header_len();
        if self.wide()? { self.set_u64(h + 4, t) } else { self.set_u32(h + 4, t as u32) }
    }

    pub fn set_modification_time(&mut self, t: u64) -> Result<()> {
        let h = self.header_len();
        if self.wide()? { self.set_u64(h + 12, t) } else { self.set_u32(h + 8, t as u32) }
    }

    pub fn set_time_scale(&mut self, v: u32) -> Result<()> {
        let h = self.header_len();
        if self.wide()? { self.set_u32(h + 20, v) } else { self.set_u32(h + 12, v) }
    }

    pub fn set_duration(&mut self, d: u64) -> Result<()> {
        let h = self.header_len();
        if self.wide()? { self.set_u64(h + 24, d) } else { self.set_u32(h + 16, d as u32) }
    }

    pub fn set_language(&mut self, code: u16) -> Result<()> {
        let off = self.tail()?;
        self.set_u16(off, code)
    }
}

full_box!(
    /// Handler Reference Box: handler type plus a human-readable name.
    Hdlr, b"hdlr");

impl Hdlr {
    pub fn new() -> Self {
        Self { b: BoxBuf::with_payload(Self::TAG, 25) }
    }
}

impl Default for Hdlr {
    fn default() -> Self { Self::new() }
}

impl<B: BoxRead> Hdlr<B> {
    pub fn pre_defined(&self) -> Result<u32> {
        let h = self.header_len();
        self.get_u32(h + 4)
    }

    pub fn handler_type(&self) -> Result<FourCC> {
        let h = self.header_len();
        Ok(FourCC(self.get_u32(h + 8)?.to_be_bytes()))
    }

    pub fn name(&self) -> Result<String> {
        let h = self.header_len();
        let mut bytes = self.get_string(h + 24)?;
        while bytes.last() == Some(&0) {
            bytes = &bytes[..bytes.len() - 1];
        }
        Ok(lossy_str(bytes))
    }

    pub fn to_pretty_string(&self, indent: usize) -> String {
        let ind = " ".repeat(indent);
        format!(
            "{ind}[hdlr] Handler Reference Box ({})\n{ind}  handler_type: {}\n{ind}  name: {}\n",
            self.boxed_size(),
            self.handler_type().unwrap_or(FourCC([0; 4])),
            self.name().unwrap_or_default()
        )
    }
}

impl<B: BoxWrite> Hdlr<B> {
    pub fn set_pre_defined(&mut self, v: u32) -> Result<()> {
        let h = self.header_len();
        self.set_u32(h + 4, v)
    }

    pub fn set_handler_type(&mut self, cc: FourCC) -> Result<()> {
        let h = self.header_len();
        self.set_u32(h + 8, u32::from_be_bytes(cc.0))
    }

    pub fn set_name(&mut self, name: &str) -> Result<()> {
        let h = self.header_len();
        let mut data = name.as_bytes().to_vec();
        data.push(0);
        self.set_string(&data, h + 24)
    }
}

full_box!(
    /// Video Media Header Box.
    Vmhd, b"vmhd");

impl Vmhd {
    pub fn new() -> Self {
        let mut v = Self { b: BoxBuf::with_payload(Self::TAG, 12) };
        let _ = v.set_flags(0x000001);
        v
    }
}

impl Default for Vmhd {
    fn default() -> Self { Self::new() }
}

impl<B: BoxRead> Vmhd<B> {
    pub fn graphics_mode(&self) -> Result<u16> {
        let h = self.header_len();
        self.get_u16(h + 4)
    }

    pub fn op_color_count(&self) -> u32 { 3 }

    pub fn op_color(&self, index: u32) -> Result<u16> {
        if index >= 3 { return Err(crate::boxed::oob(index as usize, 3)); }
        let h = self.header_len();
        self.get_u16(h + 6 + 2 * index as usize)
    }

    pub fn to_pretty_string(&self, indent: usize) -> String {
        let ind = " ".repeat(indent);
        format!(
            "{ind}[vmhd] Video Media Header Box ({})\n{ind}  graphics_mode: {}\n{ind}  op_color: {} {} {}\n",
            self.boxed_size(),
            self.graphics_mode().unwrap_or(0),
            self.op_color(0).unwrap_or(0),
            self.op_color(1).unwrap_or(0),
            self.op_color(2).unwrap_or(0)
        )
    }
}

impl<B: BoxWrite> Vmhd<B> {
    pub fn set_graphics_mode(&mut self, v: u16) -> Result<()> {
        let h = self.header_len();
        self.set_u16(h + 4, v)
    }

    pub fn set_op_color(&mut self, index: u32, v: u16) -> Result<()> {
        if index >= 3 { return Err(crate::boxed::oob(index as usize, 3)); }
        let h = self.header_len();
        self.set_u16(h + 6 + 2 * index as usize, v)
    }
}

full_box!(
    /// Sound Media Header Box.
    Smhd, b"smhd");

impl Smhd {
    pub fn new() -> Self {
        Self { b: BoxBuf::with_payload(Self::TAG, 8) }
    }
}

impl Default for Smhd {
    fn default() -> Self { Self::new() }
}

impl<B: BoxRead> Smhd<B> {
    pub fn balance(&self) -> Result<i16> {
        let h = self.header_len();
        Ok(self.get_u16(h + 4)? as i16)
    }

    pub fn to_pretty_string(&self, indent: usize) -> String {
        let ind = " ".repeat(indent);
        format!(
            "{ind}[smhd] Sound Media Header Box ({})\n{ind}  balance: {}\n",
            self.boxed_size(),
            self.balance().unwrap_or(0)
        )
    }
}

impl<B: BoxWrite> Smhd<B> {
    pub fn set_balance(&mut self, v: i16) -> Result<()> {
        let h = self.header_len();
        self.set_u16(h + 4, v as u16)
    }
}

full_box!(
    /// Hint Media Header Box.
    Hmhd, b"hmhd");

impl Hmhd {
    pub fn new() -> Self {
        Self { b: BoxBuf::with_payload(Self::TAG, 20) }
    }
}

impl Default for Hmhd {
    fn default() -> Self { Self::new() }
}

impl<B: BoxRead> Hmhd<B> {
    pub fn max_pdu_size(&self) -> Result<u16> {
        let h = self.header_len();
        self.get_u16(h + 4)
    }

    pub fn avg_pdu_size(&self) -> Result<u16> {
        let h = self.header_len();
        self.get_u16(h + 6)
    }

    pub fn max_bit_rate(&self) -> Result<u32> {
        let h = self.header_len();
        self.get_u32(h + 8)
    }

    pub fn avg_bit_rate(&self) -> Result<u32> {
        let h = self.header_len();
        self.get_u32(h + 12)
    }

    pub fn to_pretty_string(&self, indent: usize) -> String {
        let ind = " ".repeat(indent);
        format!(
            "{ind}[hmhd] Hint Media Header Box ({})\n{ind}  max_pdu_size: {} avg_pdu_size: {}\n{ind}  max_bit_rate: {} avg_bit_rate: {}\n",
            self.boxed_size(),
            self.max_pdu_size().unwrap_or(0),
            self.avg_pdu_size().unwrap_or(0),
            self.max_bit_rate().unwrap_or(0),
            self.avg_bit_rate().unwrap_or(0)
        )
    }
}

impl<B: BoxWrite> Hmhd<B> {
    pub fn set_max_pdu_size(&mut self, v: u16) -> Result<()> {
        let h = self.header_len();
        self.set_u16(h + 4, v)
    }

    pub fn set_avg_pdu_size(&mut self, v: u16) -> Result<()> {
        let h = self.header_len();
        self.set_u16(h + 6, v)
    }

    pub fn set_max_bit_rate(&mut self, v: u32) -> Result<()> {
        let h = self.header_len();
        self.set_u32(h + 8, v)
    }

    pub fn set_avg_bit_rate(&mut self, v: u32) -> Result<()> {
        let h = self.header_len();
        self.set_u32(h + 12, v)
    }
}

full_box!(
    /// Null Media Header Box: version/flags only.
    Nmhd, b"nmhd");

impl Nmhd {
    pub fn new() -> Self {
        Self { b: BoxBuf::with_payload(Self::TAG, 4) }
    }
}

impl Default for Nmhd {
    fn default() -> Self { Self::new() }
}

impl<B: BoxRead> Nmhd<B> {
    pub fn to_pretty_string(&self, indent: usize) -> String {
        let ind = " ".repeat(indent);
        format!("{ind}[nmhd] Null Media Header Box ({})\n", self.boxed_size())
    }
}

full_box!(
    /// Data entry URL box. Flag bit 1 marks self-contained media.
    Url, b"url ");

impl Url {
    pub fn new() -> Self {
        Self { b: BoxBuf::with_payload(Self::TAG, 4) }
    }
}

impl Default for Url {
    fn default() -> Self { Self::new() }
}

impl<B: BoxRead> Url<B> {
    pub fn location(&self) -> Result<String> {
        let h = self.header_len();
        let bytes = self.get_string(h + 4)?;
        let len = cstr_len(bytes, 0);
        Ok(lossy_str(&bytes[..len]))
    }

    pub fn to_pretty_string(&self, indent: usize) -> String {
        let ind = " ".repeat(indent);
        format!(
            "{ind}[url ] Data Entry URL Box ({})\n{ind}  location: {}\n",
            self.boxed_size(),
            self.location().unwrap_or_default()
        )
    }
}

impl<B: BoxWrite> Url<B> {
    pub fn set_location(&mut self, location: &str) -> Result<()> {
        let h = self.header_len();
        let mut data = location.as_bytes().to_vec();
        data.push(0);
        self.set_string(&data, h + 4)
    }
}

full_box!(
    /// Data entry URN box: name plus location, both NUL-terminated.
    Urn, b"urn ");

impl Urn {
    pub fn new() -> Self {
        Self { b: BoxBuf::with_payload(Self::TAG, 6) }
    }
}

impl Default for Urn {
    fn default() -> Self { Self::new() }
}

impl<B: BoxRead> Urn<B> {
    fn name_span(&self) -> Result<(usize, usize)> {
        let h = self.header_len();
        let bytes = self.as_bytes();
        Ok((h + 4, cstr_len(bytes, h + 4)))
    }

    pub fn name(&self) -> Result<String> {
        let (start, len) = self.name_span()?;
        Ok(lossy_str(&self.as_bytes()[start..start + len]))
    }

    pub fn location(&self) -> Result<String> {
        let (start, len) = self.name_span()?;
        let loc_start = start + len + 1;
        let bytes = self.as_bytes();
        if loc_start >= bytes.len() { return Ok(String::new()); }
        let loc_len = cstr_len(bytes, loc_start);
        Ok(lossy_str(&bytes[loc_start..loc_start + loc_len]))
    }

    pub fn to_pretty_string(&self, indent: usize) -> String {
        let ind = " ".repeat(indent);
        format!(
            "{ind}[urn ] Data Entry URN Box ({})\n{ind}  name: {}\n{ind}  location: {}\n",
            self.boxed_size(),
            self.name().unwrap_or_default(),
            self.location().unwrap_or_default()
        )
    }
}

impl<B: BoxWrite> Urn<B> {
    pub fn set_name(&mut self, name: &str) -> Result<()> {
        let (start, len) = self.name_span()?;
        self.reserve(start, len, name.len())?;
        self.as_bytes_mut()[start..start + name.len()].copy_from_slice(name.as_bytes());
        Ok(())
    }

    pub fn set_location(&mut self, location: &str) -> Result<()> {
        let (start, len) = self.name_span()?;
        let loc_start = start + len + 1;
        let mut data = location.as_bytes().to_vec();
        data.push(0);
        self.set_string(&data, loc_start.min(self.as_bytes().len()))
    }
}

full_box!(
    /// Data Reference Box: counted list of url/urn entry boxes.
    Dref, b"dref");

impl Dref {
    pub fn new() -> Self {
        Self { b: BoxBuf::with_payload(Self::TAG, 8) }
    }
}

impl Default for Dref {
    fn default() -> Self { Self::new() }
}

impl<B: BoxRead> Dref<B> {
    pub fn entry_count(&self) -> Result<u32> {
        let h = self.header_len();
        self.get_u32(h + 4)
    }

    pub fn data_entry(&self, index: u32) -> Result<BoxView<'_>> {
        let h = self.header_len();
        let spans = child_spans(self.as_bytes(), h + 8);
        match spans.get(index as usize) {
            Some(&(off, _)) => self.get_box(off),
            None => Err(crate::boxed::oob(index as usize, spans.len())),
        }
    }

    pub fn to_pretty_string(&self, indent: usize) -> String {
        let ind = " ".repeat(indent);
        let mut out = format!("{ind}[dref] Data Reference Box ({})\n", self.boxed_size());
        out.push_str(&format!("{ind}  entry_count: {}\n", self.entry_count().unwrap_or(0)));
        for i in 0.. {
            match self.data_entry(i) {
                Ok(child) => out.push_str(&crate::pretty::box_to_string(&child, indent + 2)),
                Err(_) => break,
            }
        }
        out
    }
}

impl<B: BoxWrite> Dref<B> {
    /// Replace entry `index` or append when `index` equals the current
    /// number of physical entries; appending bumps the count field.
    pub fn set_data_entry(&mut self, child: &impl BoxRead, index: u32) -> Result<()> {
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
            Err(crate::boxed::oob(index as usize, spans.len()))
        }
    }
}
