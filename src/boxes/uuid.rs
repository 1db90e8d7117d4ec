//! UUID-tagged vendor extension boxes. The 4CC is the fixed sentinel
//! `uuid`; the first 16 payload bytes select the extension's semantics.

use crate::boxed::{BoxBuf, BoxRead, BoxWrite, FourCC, oob};
use crate::error::{BoxError, Result};

/// Smooth-streaming track fragment reference extension (tfrf).
pub const UUID_TFRF: [u8; 16] = [
    0xd4, 0x80, 0x7e, 0xf2, 0xca, 0x39, 0x46, 0x95,
    0x8e, 0x54, 0x26, 0xcb, 0x9e, 0x46, 0xa7, 0x9f,
];

box_wrapper!(
    /// Generic UUID box: 16-byte extension identifier followed by
    /// vendor-defined payload.
    UuidBox, b"uuid");

impl UuidBox {
    pub fn new() -> Self {
        Self { b: BoxBuf::with_payload(Self::TAG, 16) }
    }
}

impl Default for UuidBox {
    fn default() -> Self { Self::new() }
}

impl<B: BoxRead> UuidBox<B> {
    pub fn uuid(&self) -> Result<[u8; 16]> {
        let h = self.header_len();
        let b = self.as_bytes();
        if h + 16 > b.len() { return Err(oob(h + 16, b.len())); }
        let mut u = [0u8; 16];
        u.copy_from_slice(&b[h..h + 16]);
        Ok(u)
    }

    /// Canonical lowercase hex rendering, dashed.
    pub fn uuid_string(&self) -> Result<String> {
        let u = self.uuid()?;
        Ok(format!(
            "{}-{}-{}-{}-{}",
            hex::encode(&u[0..4]),
            hex::encode(&u[4..6]),
            hex::encode(&u[6..8]),
            hex::encode(&u[8..10]),
            hex::encode(&u[10..16])
        ))
    }

    pub fn to_pretty_string(&self, indent: usize) -> String {
        let ind = " ".repeat(indent);
        format!(
            "{ind}[uuid] Vendor Extension Box ({})\n{ind}  uuid: {}\n",
            self.boxed_size(),
            self.uuid_string().unwrap_or_default()
        )
    }
}

impl<B: BoxWrite> UuidBox<B> {
    pub fn set_uuid(&mut self, uuid: &[u8; 16]) -> Result<()> {
        let h = self.header_len();
        let b = self.as_bytes_mut();
        if h + 16 > b.len() { return Err(oob(h + 16, b.len())); }
        b[h..h + 16].copy_from_slice(uuid);
        Ok(())
    }

    /// Parse a hex UUID string, dashes optional.
    pub fn set_uuid_string(&mut self, s: &str) -> Result<()> {
        let compact: String = s.chars().filter(|c| *c != '-').collect();
        let bytes = hex::decode(&compact)
            .map_err(|_| BoxError::MalformedInput("invalid UUID string"))?;
        let uuid: [u8; 16] = bytes
            .try_into()
            .map_err(|_| BoxError::MalformedInput("UUID must be 16 bytes"))?;
        self.set_uuid(&uuid)
    }
}

/// Track fragment reference extension: parallel absolute-time/duration
/// entries describing upcoming fragments. Version 1 uses 64-bit values.
pub struct Tfrf<B = BoxBuf> {
    b: B,
}

impl Tfrf {
    pub fn new() -> Self {
        let mut t = Self { b: BoxBuf::with_payload(FourCC(*b"uuid"), 21) };
        {
            let b = t.b.as_bytes_mut();
            b[8..24].copy_from_slice(&UUID_TFRF);
        }
        let h = t.header_len();
        let _ = t.set_u8(h + 16, 1); // version 1: 64-bit entries
        t
    }
}

impl Default for Tfrf {
    fn default() -> Self { Self::new() }
}

impl<B: BoxRead> Tfrf<B> {
    /// Wrap an existing record, checking the tag and extension UUID.
    pub fn from_box(b: B) -> Result<Self> {
        let tag = FourCC(*b"uuid");
        if b.box_type() != tag {
            return Err(BoxError::WrongType { expected: tag, found: b.box_type() });
        }
        let h = b.header_len();
        let bytes = b.as_bytes();
        if h + 16 > bytes.len() || bytes[h..h + 16] != UUID_TFRF {
            return Err(BoxError::MalformedInput("not a tfrf extension box"));
        }
        Ok(Self { b })
    }

    pub fn into_inner(self) -> B { self.b }

    pub fn version(&self) -> Result<u8> {
        self.get_u8(self.header_len() + 16)
    }

    pub fn flags(&self) -> Result<u32> {
        self.get_u24(self.header_len() + 17)
    }

    pub fn fragment_count(&self) -> Result<u32> {
        Ok(self.get_u8(self.header_len() + 20)? as u32)
    }

    fn entry_width(&self) -> Result<usize> {
        Ok(if self.version()? >= 1 { 8 } else { 4 })
    }

    pub fn time(&self, index: u32) -> Result<u64> {
        let count = self.fragment_count()?;
        if index >= count { return Err(oob(index as usize, count as usize)); }
        let w = self.entry_width()?;
        self.get_uint(self.header_len() + 21 + index as usize * 2 * w, w)
    }

    pub fn duration(&self, index: u32) -> Result<u64> {
        let count = self.fragment_count()?;
        if index >= count { return Err(oob(index as usize, count as usize)); }
        let w = self.entry_width()?;
        self.get_uint(self.header_len() + 21 + index as usize * 2 * w + w, w)
    }

    pub fn to_pretty_string(&self, indent: usize) -> String {
        let ind = " ".repeat(indent);
        let count = self.fragment_count().unwrap_or(0);
        let mut out = format!("{ind}[uuid] Track Fragment Reference Box ({})\n", self.boxed_size());
        out.push_str(&format!("{ind}  fragment_count: {count}\n"));
        for i in 0..count {
            out.push_str(&format!(
                "{ind}  [{i}] time: {} duration: {}\n",
                self.time(i).unwrap_or(0),
                self.duration(i).unwrap_or(0)
            ));
        }
        out
    }
}

impl<B: BoxWrite> Tfrf<B> {
    pub fn set_version(&mut self, v: u8) -> Result<()> {
        let h = self.header_len();
        self.set_u8(h + 16, v)
    }

    pub fn set_flags(&mut self, flags: u32) -> Result<()> {
        let h = self.header_len();
        self.set_u24(h + 17, flags)
    }

    pub fn set_fragment_count(&mut self, count: u8) -> Result<()> {
        let h = self.header_len();
        self.set_u8(h + 20, count)
    }

    fn ensure_entry(&mut self, index: u32) -> Result<usize> {
        let count = self.fragment_count()?;
        let w = self.entry_width()?;
        let h = self.header_len();
        if index >= count {
            let need = h + 21 + (index as usize + 1) * 2 * w;
            let len = self.as_bytes().len();
            if need > len {
                self.reserve(len, 0, need - len)?;
            }
            self.set_u8(h + 20, (index + 1) as u8)?;
        }
        Ok(w)
    }

    pub fn set_time(&mut self, index: u32, time: u64) -> Result<()> {
        let w = self.ensure_entry(index)?;
        let off = self.header_len() + 21 + index as usize * 2 * w;
        self.set_uint(off, w, time)
    }

    pub fn set_duration(&mut self, index: u32, duration: u64) -> Result<()> {
        let w = self.ensure_entry(index)?;
        let off = self.header_len() + 21 + index as usize * 2 * w + w;
        self.set_uint(off, w, duration)
    }
}

impl<B: BoxRead> BoxRead for Tfrf<B> {
    fn as_bytes(&self) -> &[u8] { self.b.as_bytes() }
}

impl<B: BoxWrite> BoxWrite for Tfrf<B> {
    fn as_bytes_mut(&mut self) -> &mut [u8] { self.b.as_bytes_mut() }

    fn reserve(&mut self, position: usize, current: usize, wanted: usize) -> Result<()> {
        self.b.reserve(position, current, wanted)
    }
}
