//! Adobe HDS bootstrap boxes: abst with its nested segment/fragment run
//! tables, and the afra random-access index. These payloads mix counted
//! NUL-terminated string lists with nested boxes, so field offsets are
//! computed by walking, and any length-changing write shifts the tail.

use crate::boxed::{BoxBuf, BoxRead, BoxView, BoxWrite, oob};
use crate::error::Result;
use crate::full::{VersionFlags, VersionFlagsMut};

use super::{cstr_len, lossy_str};

/// Walk `n` NUL-terminated strings starting at `off`, returning the offset
/// just past them (clamped to the end of `bytes`).
fn skip_cstrings(bytes: &[u8], mut off: usize, n: u32) -> usize {
    for _ in 0..n {
        off += cstr_len(bytes, off) + 1;
        if off >= bytes.len() {
            return bytes.len().min(off);
        }
    }
    off
}

full_box!(
    /// HDS Bootstrap Info Box: global stream description plus nested
    /// segment- and fragment-run tables.
    Abst, b"abst");

impl Abst {
    pub fn new() -> Self {
        let mut a = Self { b: BoxBuf::with_payload(Self::TAG, 36) };
        let h = a.header_len();
        let _ = a.set_u32(h + 9, 1000); // time_scale
        a
    }
}

impl Default for Abst {
    fn default() -> Self { Self::new() }
}

impl<B: BoxRead> Abst<B> {
    pub fn bootstrap_info_version(&self) -> Result<u32> {
        let h = self.header_len();
        self.get_u32(h + 4)
    }

    pub fn profile(&self) -> Result<u8> {
        let h = self.header_len();
        Ok(self.get_u8(h + 8)? >> 6)
    }

    pub fn live(&self) -> Result<bool> {
        let h = self.header_len();
        Ok(self.get_u8(h + 8)? & 0x20 != 0)
    }

    pub fn update(&self) -> Result<bool> {
        let h = self.header_len();
        Ok(self.get_u8(h + 8)? & 0x10 != 0)
    }

    pub fn time_scale(&self) -> Result<u32> {
        let h = self.header_len();
        self.get_u32(h + 9)
    }

    pub fn current_media_time(&self) -> Result<u64> {
        let h = self.header_len();
        self.get_u64(h + 13)
    }

    pub fn smpte_time_code_offset(&self) -> Result<u64> {
        let h = self.header_len();
        self.get_u64(h + 21)
    }

    fn movie_identifier_off(&self) -> usize {
        self.header_len() + 29
    }

    pub fn movie_identifier(&self) -> Result<String> {
        let off = self.movie_identifier_off();
        let b = self.as_bytes();
        if off > b.len() { return Err(oob(off, b.len())); }
        Ok(lossy_str(&b[off..off + cstr_len(b, off)]))
    }

    fn server_count_off(&self) -> usize {
        let b = self.as_bytes();
        let off = self.movie_identifier_off();
        off + cstr_len(b, off) + 1
    }

    pub fn server_entry_count(&self) -> Result<u32> {
        Ok(self.get_u8(self.server_count_off())? as u32)
    }

    /// Offset of server entry `index`; `index == count` lands just past the
    /// last entry.
    fn server_entry_off(&self, index: u32) -> Result<usize> {
        let count = self.server_entry_count()?.min(index);
        Ok(skip_cstrings(self.as_bytes(), self.server_count_off() + 1, count))
    }

    pub fn server_entry(&self, index: u32) -> Result<String> {
        let count = self.server_entry_count()?;
        if index >= count { return Err(oob(index as usize, count as usize)); }
        let off = self.server_entry_off(index)?;
        let b = self.as_bytes();
        Ok(lossy_str(&b[off..off + cstr_len(b, off)]))
    }

    fn quality_count_off(&self) -> Result<usize> {
        let count = self.server_entry_count()?;
        Ok(skip_cstrings(self.as_bytes(), self.server_count_off() + 1, count))
    }

    pub fn quality_entry_count(&self) -> Result<u32> {
        Ok(self.get_u8(self.quality_count_off()?)? as u32)
    }

    fn quality_entry_off(&self, index: u32) -> Result<usize> {
        let base = self.quality_count_off()?;
        let count = self.quality_entry_count()?.min(index);
        Ok(skip_cstrings(self.as_bytes(), base + 1, count))
    }

    pub fn quality_entry(&self, index: u32) -> Result<String> {
        let count = self.quality_entry_count()?;
        if index >= count { return Err(oob(index as usize, count as usize)); }
        let off = self.quality_entry_off(index)?;
        let b = self.as_bytes();
        Ok(lossy_str(&b[off..off + cstr_len(b, off)]))
    }

    fn drm_off(&self) -> Result<usize> {
        let base = self.quality_count_off()?;
        let count = self.quality_entry_count()?;
        Ok(skip_cstrings(self.as_bytes(), base + 1, count))
    }

    pub fn drm_data(&self) -> Result<String> {
        let off = self.drm_off()?;
        let b = self.as_bytes();
        Ok(lossy_str(&b[off.min(b.len())..off.min(b.len()) + cstr_len(b, off)]))
    }

    fn meta_off(&self) -> Result<usize> {
        let off = self.drm_off()?;
        Ok(off + cstr_len(self.as_bytes(), off) + 1)
    }

    pub fn meta_data(&self) -> Result<String> {
        let off = self.meta_off()?;
        let b = self.as_bytes();
        Ok(lossy_str(&b[off.min(b.len())..off.min(b.len()) + cstr_len(b, off)]))
    }

    fn segment_count_off(&self) -> Result<usize> {
        let off = self.meta_off()?;
        Ok(off + cstr_len(self.as_bytes(), off) + 1)
    }

    /// Skip `n` nested boxes starting at `off`.
    fn skip_boxes(&self, mut off: usize, n: u32) -> Result<usize> {
        for _ in 0..n {
            off += self.get_box(off)?.as_bytes().len();
        }
        Ok(off)
    }

    pub fn segment_run_table_count(&self) -> Result<u32> {
        Ok(self.get_u8(self.segment_count_off()?)? as u32)
    }

    fn segment_run_table_off(&self, index: u32) -> Result<usize> {
        let base = self.segment_count_off()?;
        let count = self.segment_run_table_count()?.min(index);
        self.skip_boxes(base + 1, count)
    }

    pub fn segment_run_table(&self, index: u32) -> Result<Asrt<BoxView<'_>>> {
        let count = self.segment_run_table_count()?;
        if index >= count { return Err(oob(index as usize, count as usize)); }
        let off = self.segment_run_table_off(index)?;
        Asrt::from_box(self.get_box(off)?)
    }

    fn fragment_count_off(&self) -> Result<usize> {
        let base = self.segment_count_off()?;
        let count = self.segment_run_table_count()?;
        self.skip_boxes(base + 1, count)
    }

    pub fn fragment_run_table_count(&self) -> Result<u32> {
        Ok(self.get_u8(self.fragment_count_off()?)? as u32)
    }

    fn fragment_run_table_off(&self, index: u32) -> Result<usize> {
        let base = self.fragment_count_off()?;
        let count = self.fragment_run_table_count()?.min(index);
        self.skip_boxes(base + 1, count)
    }

    pub fn fragment_run_table(&self, index: u32) -> Result<Afrt<BoxView<'_>>> {
        let count = self.fragment_run_table_count()?;
        if index >= count { return Err(oob(index as usize, count as usize)); }
        let off = self.fragment_run_table_off(index)?;
        Afrt::from_box(self.get_box(off)?)
    }

    pub fn to_pretty_string(&self, indent: usize) -> String {
        let ind = " ".repeat(indent);
        let mut out = format!("{ind}[abst] Bootstrap Info Box ({})\n", self.boxed_size());
        out.push_str(&format!("{ind}  version: {}\n", self.version().unwrap_or(0)));
        out.push_str(&format!("{ind}  bootstrap_info_version: {}\n", self.bootstrap_info_version().unwrap_or(0)));
        out.push_str(&format!("{ind}  profile: {}\n", self.profile().unwrap_or(0)));
        out.push_str(&format!("{ind}  live: {}\n", self.live().unwrap_or(false)));
        out.push_str(&format!("{ind}  update: {}\n", self.update().unwrap_or(false)));
        out.push_str(&format!("{ind}  time_scale: {}\n", self.time_scale().unwrap_or(0)));
        out.push_str(&format!("{ind}  current_media_time: {}\n", self.current_media_time().unwrap_or(0)));
        out.push_str(&format!("{ind}  movie_identifier: {}\n", self.movie_identifier().unwrap_or_default()));
        let servers = self.server_entry_count().unwrap_or(0);
        for i in 0..servers {
            out.push_str(&format!("{ind}  server_entry: {}\n", self.server_entry(i).unwrap_or_default()));
        }
        let qualities = self.quality_entry_count().unwrap_or(0);
        for i in 0..qualities {
            out.push_str(&format!("{ind}  quality_entry: {}\n", self.quality_entry(i).unwrap_or_default()));
        }
        for i in 0..self.segment_run_table_count().unwrap_or(0) {
            if let Ok(t) = self.segment_run_table(i) {
                out.push_str(&t.to_pretty_string(indent + 2));
            }
        }
        for i in 0..self.fragment_run_table_count().unwrap_or(0) {
            if let Ok(t) = self.fragment_run_table(i) {
                out.push_str(&t.to_pretty_string(indent + 2));
            }
        }
        out
    }
}

impl<B: BoxWrite> Abst<B> {
    fn replace_cstr(&mut self, off: usize, s: &str) -> Result<()> {
        let current = cstr_len(self.as_bytes(), off);
        self.reserve(off, current, s.len())?;
        self.as_bytes_mut()[off..off + s.len()].copy_from_slice(s.as_bytes());
        Ok(())
    }

    fn insert_cstr(&mut self, off: usize, s: &str) -> Result<()> {
        self.reserve(off, 0, s.len() + 1)?;
        self.as_bytes_mut()[off..off + s.len()].copy_from_slice(s.as_bytes());
        Ok(())
    }

    pub fn set_bootstrap_info_version(&mut self, v: u32) -> Result<()> {
        let h = self.header_len();
        self.set_u32(h + 4, v)
    }

    pub fn set_profile(&mut self, profile: u8) -> Result<()> {
        let h = self.header_len();
        let b = self.get_u8(h + 8)?;
        self.set_u8(h + 8, (b & 0x3F) | ((profile & 3) << 6))
    }

    pub fn set_live(&mut self, live: bool) -> Result<()> {
        let h = self.header_len();
        let b = self.get_u8(h + 8)?;
        self.set_u8(h + 8, if live { b | 0x20 } else { b & !0x20 })
    }

    pub fn set_update(&mut self, update: bool) -> Result<()> {
        let h = self.header_len();
        let b = self.get_u8(h + 8)?;
        self.set_u8(h + 8, if update { b | 0x10 } else { b & !0x10 })
    }

    pub fn set_time_scale(&mut self, v: u32) -> Result<()> {
        let h = self.header_len();
        self.set_u32(h + 9, v)
    }

    pub fn set_current_media_time(&mut self, v: u64) -> Result<()> {
        let h = self.header_len();
        self.set_u64(h + 13, v)
    }

    pub fn set_smpte_time_code_offset(&mut self, v: u64) -> Result<()> {
        let h = self.header_len();
        self.set_u64(h + 21, v)
    }

    pub fn set_movie_identifier(&mut self, s: &str) -> Result<()> {
        let off = self.movie_identifier_off();
        self.replace_cstr(off, s)
    }

    /// Replace server entry `index`; `index == count` appends and bumps the
    /// count byte.
    pub fn set_server_entry(&mut self, index: u32, entry: &str) -> Result<()> {
        let count = self.server_entry_count()?;
        if index > count { return Err(oob(index as usize, count as usize)); }
        let off = self.server_entry_off(index)?;
        if index < count {
            self.replace_cstr(off, entry)
        } else {
            self.insert_cstr(off, entry)?;
            let count_off = self.server_count_off();
            self.set_u8(count_off, (count + 1) as u8)
        }
    }

    pub fn set_quality_entry(&mut self, index: u32, entry: &str) -> Result<()> {
        let count = self.quality_entry_count()?;
        if index > count { return Err(oob(index as usize, count as usize)); }
        let off = self.quality_entry_off(index)?;
        if index < count {
            self.replace_cstr(off, entry)
        } else {
            self.insert_cstr(off, entry)?;
            let count_off = self.quality_count_off()?;
            self.set_u8(count_off, (count + 1) as u8)
        }
    }

    pub fn set_drm_data(&mut self, s: &str) -> Result<()> {
        let off = self.drm_off()?;
        self.replace_cstr(off, s)
    }

    pub fn set_meta_data(&mut self, s: &str) -> Result<()> {
        let off = self.meta_off()?;
        self.replace_cstr(off, s)
    }

    /// Replace segment run table `index`; `index == count` appends and
    /// bumps the count byte.
    pub fn set_segment_run_table<C: BoxRead>(&mut self, index: u32, table: &Asrt<C>) -> Result<()> {
        let count = self.segment_run_table_count()?;
        if index > count { return Err(oob(index as usize, count as usize)); }
        let off = self.segment_run_table_off(index)?;
        if index < count {
            self.set_box(table, off)
        } else {
            let bytes = table.as_bytes();
            self.reserve(off, 0, bytes.len())?;
            self.as_bytes_mut()[off..off + bytes.len()].copy_from_slice(bytes);
            let count_off = self.segment_count_off()?;
            self.set_u8(count_off, (count + 1) as u8)
        }
    }

    pub fn set_fragment_run_table<C: BoxRead>(&mut self, index: u32, table: &Afrt<C>) -> Result<()> {
        let count = self.fragment_run_table_count()?;
        if index > count { return Err(oob(index as usize, count as usize)); }
        let off = self.fragment_run_table_off(index)?;
        if index < count {
            self.set_box(table, off)
        } else {
            let bytes = table.as_bytes();
            self.reserve(off, 0, bytes.len())?;
            self.as_bytes_mut()[off..off + bytes.len()].copy_from_slice(bytes);
            let count_off = self.fragment_count_off()?;
            self.set_u8(count_off, (count + 1) as u8)
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SegmentRun {
    pub first_segment: u32,
    pub fragments_per_segment: u32,
}

full_box!(
    /// HDS Segment Run Table Box.
    Asrt, b"asrt");

impl Asrt {
    pub fn new() -> Self {
        Self { b: BoxBuf::with_payload(Self::TAG, 9) }
    }
}

impl Default for Asrt {
    fn default() -> Self { Self::new() }
}

impl<B: BoxRead> Asrt<B> {
    /// The flags field doubles as the update indicator.
    pub fn update(&self) -> Result<u32> {
        self.flags()
    }

    pub fn quality_entry_count(&self) -> Result<u32> {
        let h = self.header_len();
        Ok(self.get_u8(h + 4)? as u32)
    }

    fn quality_entry_off(&self, index: u32) -> Result<usize> {
        let h = self.header_len();
        let count = self.quality_entry_count()?.min(index);
        Ok(skip_cstrings(self.as_bytes(), h + 5, count))
    }

    pub fn quality_entry(&self, index: u32) -> Result<String> {
        let count = self.quality_entry_count()?;
        if index >= count { return Err(oob(index as usize, count as usize)); }
        let off = self.quality_entry_off(index)?;
        let b = self.as_bytes();
        Ok(lossy_str(&b[off..off + cstr_len(b, off)]))
    }

    fn run_count_off(&self) -> Result<usize> {
        let h = self.header_len();
        let count = self.quality_entry_count()?;
        Ok(skip_cstrings(self.as_bytes(), h + 5, count))
    }

    pub fn segment_run_entry_count(&self) -> Result<u32> {
        self.get_u32(self.run_count_off()?)
    }

    pub fn segment_run(&self, index: u32) -> Result<SegmentRun> {
        let count = self.segment_run_entry_count()?;
        if index >= count { return Err(oob(index as usize, count as usize)); }
        let off = self.run_count_off()? + 4 + index as usize * 8;
        Ok(SegmentRun {
            first_segment: self.get_u32(off)?,
            fragments_per_segment: self.get_u32(off + 4)?,
        })
    }

    pub fn to_pretty_string(&self, indent: usize) -> String {
        let ind = " ".repeat(indent);
        let mut out = format!("{ind}[asrt] Segment Run Table Box ({})\n", self.boxed_size());
        out.push_str(&format!("{ind}  update: {}\n", self.update().unwrap_or(0)));
        for i in 0..self.quality_entry_count().unwrap_or(0) {
            out.push_str(&format!("{ind}  quality_entry: {}\n", self.quality_entry(i).unwrap_or_default()));
        }
        let count = self.segment_run_entry_count().unwrap_or(0);
        out.push_str(&format!("{ind}  segment_run_entry_count: {count}\n"));
        for i in 0..count {
            if let Ok(r) = self.segment_run(i) {
                out.push_str(&format!(
                    "{ind}  [{i}] first_segment: {} fragments_per_segment: {}\n",
                    r.first_segment, r.fragments_per_segment
                ));
            }
        }
        out
    }
}

impl<B: BoxWrite> Asrt<B> {
    pub fn set_update(&mut self, v: u32) -> Result<()> {
        self.set_flags(v)
    }

    pub fn set_quality_entry(&mut self, index: u32, entry: &str) -> Result<()> {
        let count = self.quality_entry_count()?;
        if index > count { return Err(oob(index as usize, count as usize)); }
        let off = self.quality_entry_off(index)?;
        if index < count {
            let current = cstr_len(self.as_bytes(), off);
            self.reserve(off, current, entry.len())?;
            self.as_bytes_mut()[off..off + entry.len()].copy_from_slice(entry.as_bytes());
            Ok(())
        } else {
            self.reserve(off, 0, entry.len() + 1)?;
            self.as_bytes_mut()[off..off + entry.len()].copy_from_slice(entry.as_bytes());
            let h = self.header_len();
            self.set_u8(h + 4, (count + 1) as u8)
        }
    }

    /// Write run entry `index`, growing the table (zero-filled) and bumping
    /// the count when writing at or past the current end.
    pub fn set_segment_run(&mut self, index: u32, run: SegmentRun) -> Result<()> {
        let base = self.run_count_off()?;
        let count = self.segment_run_entry_count()?;
        if index >= count {
            let need = base + 4 + (index as usize + 1) * 8;
            let len = self.as_bytes().len();
            if need > len {
                self.reserve(len, 0, need - len)?;
            }
            self.set_u32(base, index + 1)?;
        }
        let off = base + 4 + index as usize * 8;
        self.set_u32(off, run.first_segment)?;
        self.set_u32(off + 4, run.fragments_per_segment)
    }
}

/// One fragment run entry. A zero duration marks a discontinuity and
/// carries an extra indicator byte on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FragmentRun {
    pub first_fragment: u32,
    pub first_timestamp: u64,
    pub duration: u32,
    pub discontinuity: u8,
}

full_box!(
    /// HDS Fragment Run Table Box.
    Afrt, b"afrt");

impl Afrt {
    pub fn new() -> Self {
        let mut a = Self { b: BoxBuf::with_payload(Self::TAG, 13) };
        let h = a.header_len();
        let _ = a.set_u32(h + 4, 1000); // time_scale
        a
    }
}

impl Default for Afrt {
    fn default() -> Self { Self::new() }
}

impl<B: BoxRead> Afrt<B> {
    pub fn update(&self) -> Result<u32> {
        self.flags()
    }

    pub fn time_scale(&self) -> Result<u32> {
        let h = self.header_len();
        self.get_u32(h + 4)
    }

    pub fn quality_entry_count(&self) -> Result<u32> {
        let h = self.header_len();
        Ok(self.get_u8(h + 8)? as u32)
    }

    fn quality_entry_off(&self, index: u32) -> Result<usize> {
        let h = self.header_len();
        let count = self.quality_entry_count()?.min(index);
        Ok(skip_cstrings(self.as_bytes(), h + 9, count))
    }

    pub fn quality_entry(&self, index: u32) -> Result<String> {
        let count = self.quality_entry_count()?;
        if index >= count { return Err(oob(index as usize, count as usize)); }
        let off = self.quality_entry_off(index)?;
        let b = self.as_bytes();
        Ok(lossy_str(&b[off..off + cstr_len(b, off)]))
    }

    fn run_count_off(&self) -> Result<usize> {
        let h = self.header_len();
        let count = self.quality_entry_count()?;
        Ok(skip_cstrings(self.as_bytes(), h + 9, count))
    }

    pub fn fragment_run_count(&self) -> Result<u32> {
        self.get_u32(self.run_count_off()?)
    }

    /// Offset of run entry `index`; entries are 16 bytes, 17 when the
    /// duration is zero (discontinuity indicator follows).
    fn fragment_run_off(&self, index: u32) -> Result<usize> {
        let mut off = self.run_count_off()? + 4;
        for _ in 0..index {
            let duration = self.get_u32(off + 12)?;
            off += if duration == 0 { 17 } else { 16 };
        }
        Ok(off)
    }

    pub fn fragment_run(&self, index: u32) -> Result<FragmentRun> {
        let count = self.fragment_run_count()?;
        if index >= count { return Err(oob(index as usize, count as usize)); }
        let off = self.fragment_run_off(index)?;
        let duration = self.get_u32(off + 12)?;
        Ok(FragmentRun {
            first_fragment: self.get_u32(off)?,
            first_timestamp: self.get_u64(off + 4)?,
            duration,
            discontinuity: if duration == 0 { self.get_u8(off + 16)? } else { 0 },
        })
    }

    pub fn to_pretty_string(&self, indent: usize) -> String {
        let ind = " ".repeat(indent);
        let mut out = format!("{ind}[afrt] Fragment Run Table Box ({})\n", self.boxed_size());
        out.push_str(&format!("{ind}  update: {}\n", self.update().unwrap_or(0)));
        out.push_str(&format!("{ind}  time_scale: {}\n", self.time_scale().unwrap_or(0)));
        for i in 0..self.quality_entry_count().unwrap_or(0) {
            out.push_str(&format!("{ind}  quality_entry: {}\n", self.quality_entry(i).unwrap_or_default()));
        }
        let count = self.fragment_run_count().unwrap_or(0);
        out.push_str(&format!("{ind}  fragment_run_count: {count}\n"));
        for i in 0..count {
            if let Ok(r) = self.fragment_run(i) {
                out.push_str(&format!(
                    "{ind}  [{i}] first_fragment: {} first_timestamp: {} duration: {} discontinuity: {}\n",
                    r.first_fragment, r.first_timestamp, r.duration, r.discontinuity
                ));
            }
        }
        out
    }
}

impl<B: BoxWrite> Afrt<B> {
    pub fn set_update(&mut self, v: u32) -> Result<()> {
        self.set_flags(v)
    }

    pub fn set_time_scale(&mut self, v: u32) -> Result<()> {
        let h = self.header_len();
        self.set_u32(h + 4, v)
    }

    pub fn set_quality_entry(&mut self, index: u32, entry: &str) -> Result<()> {
        let count = self.quality_entry_count()?;
        if index > count { return Err(oob(index as usize, count as usize)); }
        let off = self.quality_entry_off(index)?;
        if index < count {
            let current = cstr_len(self.as_bytes(), off);
            self.reserve(off, current, entry.len())?;
            self.as_bytes_mut()[off..off + entry.len()].copy_from_slice(entry.as_bytes());
            Ok(())
        } else {
            self.reserve(off, 0, entry.len() + 1)?;
            self.as_bytes_mut()[off..off + entry.len()].copy_from_slice(entry.as_bytes());
            let h = self.header_len();
            self.set_u8(h + 8, (count + 1) as u8)
        }
    }

    /// Replace run entry `index` (entry width may change when the duration
    /// flips to or from zero); `index == count` appends and bumps the count.
    pub fn set_fragment_run(&mut self, index: u32, run: FragmentRun) -> Result<()> {
        let count = self.fragment_run_count()?;
        if index > count { return Err(oob(index as usize, count as usize)); }
        let off = self.fragment_run_off(index)?;
        let wanted = if run.duration == 0 { 17 } else { 16 };
        let current = if index < count {
            let duration = self.get_u32(off + 12)?;
            if duration == 0 { 17 } else { 16 }
        } else {
            0
        };
        self.reserve(off, current, wanted)?;
        self.set_u32(off, run.first_fragment)?;
        self.set_u64(off + 4, run.first_timestamp)?;
        self.set_u32(off + 12, run.duration)?;
        if run.duration == 0 {
            self.set_u8(off + 16, run.discontinuity)?;
        }
        if index == count {
            let base = self.run_count_off()?;
            self.set_u32(base, count + 1)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AfraEntry {
    pub time: u64,
    pub offset: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlobalAfraEntry {
    pub time: u64,
    pub segment: u32,
    pub fragment: u32,
    pub afra_offset: u64,
    pub offset_from_afra: u64,
}

full_box!(
    /// HDS Fragment Random Access Box. Three selector bits choose the byte
    /// widths of ID and offset fields; strides are derived from them.
    Afra, b"afra");

impl Afra {
    pub fn new() -> Self {
        let mut a = Self { b: BoxBuf::with_payload(Self::TAG, 13) };
        let h = a.header_len();
        let _ = a.set_u32(h + 5, 1000); // time_scale
        a
    }
}

impl Default for Afra {
    fn default() -> Self { Self::new() }
}

impl<B: BoxRead> Afra<B> {
    pub fn long_ids(&self) -> Result<bool> {
        let h = self.header_len();
        Ok(self.get_u8(h + 4)? & 0x80 != 0)
    }

    pub fn long_offsets(&self) -> Result<bool> {
        let h = self.header_len();
        Ok(self.get_u8(h + 4)? & 0x40 != 0)
    }

    pub fn global_entries(&self) -> Result<bool> {
        let h = self.header_len();
        Ok(self.get_u8(h + 4)? & 0x20 != 0)
    }

    pub fn time_scale(&self) -> Result<u32> {
        let h = self.header_len();
        self.get_u32(h + 5)
    }

    pub fn entry_count(&self) -> Result<u32> {
        let h = self.header_len();
        self.get_u32(h + 9)
    }

    fn id_width(&self) -> Result<usize> {
        Ok(if self.long_ids()? { 4 } else { 2 })
    }

    fn offset_width(&self) -> Result<usize> {
        Ok(if self.long_offsets()? { 8 } else { 4 })
    }

    fn entry_stride(&self) -> Result<usize> {
        Ok(8 + self.offset_width()?)
    }

    pub fn entry(&self, index: u32) -> Result<AfraEntry> {
        let count = self.entry_count()?;
        if index >= count { return Err(oob(index as usize, count as usize)); }
        let ow = self.offset_width()?;
        let off = self.header_len() + 13 + index as usize * (8 + ow);
        Ok(AfraEntry {
            time: self.get_u64(off)?,
            offset: self.get_uint(off + 8, ow)?,
        })
    }

    fn global_base(&self) -> Result<usize> {
        let stride = self.entry_stride()?;
        let count = self.entry_count()? as usize;
        Ok(self.header_len() + 13 + count * stride)
    }

    pub fn global_entry_count(&self) -> Result<u32> {
        if !self.global_entries()? {
            return Ok(0);
        }
        self.get_u32(self.global_base()?)
    }

    fn global_stride(&self) -> Result<usize> {
        Ok(8 + 2 * self.id_width()? + 2 * self.offset_width()?)
    }

    pub fn global_entry(&self, index: u32) -> Result<GlobalAfraEntry> {
        let count = self.global_entry_count()?;
        if index >= count { return Err(oob(index as usize, count as usize)); }
        let iw = self.id_width()?;
        let ow = self.offset_width()?;
        let stride = 8 + 2 * iw + 2 * ow;
        let mut off = self.global_base()? + 4 + index as usize * stride;
        let time = self.get_u64(off)?;
        off += 8;
        let segment = self.get_uint(off, iw)? as u32;
        off += iw;
        let fragment = self.get_uint(off, iw)? as u32;
        off += iw;
        let afra_offset = self.get_uint(off, ow)?;
        off += ow;
        let offset_from_afra = self.get_uint(off, ow)?;
        Ok(GlobalAfraEntry { time, segment, fragment, afra_offset, offset_from_afra })
    }

    pub fn to_pretty_string(&self, indent: usize) -> String {
        let ind = " ".repeat(indent);
        let count = self.entry_count().unwrap_or(0);
        let mut out = format!("{ind}[afra] Fragment Random Access Box ({})\n", self.boxed_size());
        out.push_str(&format!(
            "{ind}  long_ids: {} long_offsets: {} global_entries: {}\n",
            self.long_ids().unwrap_or(false),
            self.long_offsets().unwrap_or(false),
            self.global_entries().unwrap_or(false)
        ));
        out.push_str(&format!("{ind}  time_scale: {}\n", self.time_scale().unwrap_or(0)));
        out.push_str(&format!("{ind}  entry_count: {count}\n"));
        for i in 0..count {
            if let Ok(e) = self.entry(i) {
                out.push_str(&format!("{ind}  [{i}] time: {} offset: {}\n", e.time, e.offset));
            }
        }
        let globals = self.global_entry_count().unwrap_or(0);
        for i in 0..globals {
            if let Ok(e) = self.global_entry(i) {
                out.push_str(&format!(
                    "{ind}  global [{i}] time: {} segment: {} fragment: {} afra_offset: {} offset_from_afra: {}\n",
                    e.time, e.segment, e.fragment, e.afra_offset, e.offset_from_afra
                ));
            }
        }
        out
    }
}

impl<B: BoxWrite> Afra<B> {
    fn set_selector_bit(&mut self, bit: u8, on: bool) -> Result<()> {
        let h = self.header_len();
        let b = self.get_u8(h + 4)?;
        self.set_u8(h + 4, if on { b | bit } else { b & !bit })
    }

    pub fn set_long_ids(&mut self, on: bool) -> Result<()> {
        self.set_selector_bit(0x80, on)
    }

    pub fn set_long_offsets(&mut self, on: bool) -> Result<()> {
        self.set_selector_bit(0x40, on)
    }

    pub fn set_global_entries(&mut self, on: bool) -> Result<()> {
        self.set_selector_bit(0x20, on)
    }

    pub fn set_time_scale(&mut self, v: u32) -> Result<()> {
        let h = self.header_len();
        self.set_u32(h + 5, v)
    }

    /// Write entry `index`, growing the local entry table in place (the
    /// global section, if any, shifts back) and bumping the count.
    pub fn set_entry(&mut self, index: u32, entry: AfraEntry) -> Result<()> {
        let stride = self.entry_stride()?;
        let ow = self.offset_width()?;
        let count = self.entry_count()?;
        let h = self.header_len();
        if index >= count {
            let pos = h + 13 + count as usize * stride;
            let add = (index as usize + 1 - count as usize) * stride;
            self.reserve(pos, 0, add)?;
            self.set_u32(h + 9, index + 1)?;
        }
        let off = h + 13 + index as usize * stride;
        self.set_u64(off, entry.time)?;
        self.set_uint(off + 8, ow, entry.offset)
    }

    pub fn set_global_entry(&mut self, index: u32, entry: GlobalAfraEntry) -> Result<()> {
        let iw = self.id_width()?;
        let ow = self.offset_width()?;
        let stride = self.global_stride()?;
        let base = self.global_base()?;
        // make sure the count field itself exists
        let len = self.as_bytes().len();
        if base + 4 > len {
            self.reserve(len, 0, base + 4 - len)?;
        }
        let count = self.get_u32(base)?;
        if index >= count {
            let need = base + 4 + (index as usize + 1) * stride;
            let len = self.as_bytes().len();
            if need > len {
                self.reserve(len, 0, need - len)?;
            }
            self.set_u32(base, index + 1)?;
        }
        let mut off = base + 4 + index as usize * stride;
        self.set_u64(off, entry.time)?;
        off += 8;
        self.set_uint(off, iw, entry.segment as u64)?;
        off += iw;
        self.set_uint(off, iw, entry.fragment as u64)?;
        off += iw;
        self.set_uint(off, ow, entry.afra_offset)?;
        off += ow;
        self.set_uint(off, ow, entry.offset_from_afra)
    }
}
