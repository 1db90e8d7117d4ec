use std::fmt;

use crate::error::{BoxError, Result};

/// Four-character box type tag.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    pub fn from_str(s: &str) -> Option<Self> {
        let b = s.as_bytes();
        if b.len() == 4 {
            Some(FourCC([b[0], b[1], b[2], b[3]]))
        } else { None }
    }
    pub fn as_str_lossy(&self) -> String {
        self.0.iter().map(|&c| if (32..=126).contains(&c) { c as char } else { '.' })
            .collect()
    }
}
impl fmt::Debug for FourCC { fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.as_str_lossy()) } }
impl fmt::Display for FourCC { fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.as_str_lossy()) } }

/// Length of the plain `size + type` header.
pub const HEADER_LEN: usize = 8;
/// Header length when the 64-bit size extension (`size == 1`) is in use.
pub const EXT_HEADER_LEN: usize = 16;

pub(crate) fn oob(index: usize, len: usize) -> BoxError {
    BoxError::IndexOutOfRange { index, len }
}

/// Validate that `bytes` frames exactly one record: the declared size must
/// match the byte length, except for the streaming convention `size == 0`
/// (record extends to the end of the input).
fn check_frame(bytes: &[u8]) -> Result<()> {
    if bytes.len() < HEADER_LEN {
        return Err(BoxError::MalformedInput("truncated box header"));
    }
    match u32::from_be_bytes(bytes[0..4].try_into().unwrap()) {
        0 => Ok(()),
        1 => {
            if bytes.len() < EXT_HEADER_LEN {
                return Err(BoxError::MalformedInput("truncated extended size"));
            }
            let ext = u64::from_be_bytes(bytes[8..16].try_into().unwrap());
            if ext != bytes.len() as u64 {
                return Err(BoxError::MalformedInput("size field does not match data length"));
            }
            Ok(())
        }
        n => {
            if n as u64 != bytes.len() as u64 {
                return Err(BoxError::MalformedInput("size field does not match data length"));
            }
            Ok(())
        }
    }
}

/// Read access to a single size-prefixed record.
///
/// All offsets are relative to the start of the record, not the payload;
/// schema code adds [`BoxRead::header_len`] itself. Integers are big-endian.
pub trait BoxRead {
    /// The whole record, header included.
    fn as_bytes(&self) -> &[u8];

    /// Declared total size. `size == 0` (streaming convention) reports the
    /// physical length, `size == 1` the 64-bit extension field.
    fn boxed_size(&self) -> u64 {
        let b = self.as_bytes();
        match u32::from_be_bytes(b[0..4].try_into().unwrap()) {
            0 => b.len() as u64,
            1 => u64::from_be_bytes(b[8..16].try_into().unwrap()),
            n => n as u64,
        }
    }

    fn header_len(&self) -> usize {
        let b = self.as_bytes();
        if u32::from_be_bytes(b[0..4].try_into().unwrap()) == 1 { EXT_HEADER_LEN } else { HEADER_LEN }
    }

    fn payload_size(&self) -> u64 {
        self.boxed_size().saturating_sub(self.header_len() as u64)
    }

    fn box_type(&self) -> FourCC {
        let b = self.as_bytes();
        FourCC([b[4], b[5], b[6], b[7]])
    }

    fn is_type(&self, tag: FourCC) -> bool {
        self.box_type() == tag
    }

    fn payload(&self) -> &[u8] {
        let b = self.as_bytes();
        &b[self.header_len().min(b.len())..]
    }

    fn get_u8(&self, index: usize) -> Result<u8> {
        let b = self.as_bytes();
        if index >= b.len() { return Err(oob(index, b.len())); }
        Ok(b[index])
    }

    fn get_u16(&self, index: usize) -> Result<u16> {
        let b = self.as_bytes();
        if index + 2 > b.len() { return Err(oob(index + 2, b.len())); }
        Ok(u16::from_be_bytes(b[index..index + 2].try_into().unwrap()))
    }

    fn get_u24(&self, index: usize) -> Result<u32> {
        let b = self.as_bytes();
        if index + 3 > b.len() { return Err(oob(index + 3, b.len())); }
        Ok(((b[index] as u32) << 16) | ((b[index + 1] as u32) << 8) | (b[index + 2] as u32))
    }

    fn get_u32(&self, index: usize) -> Result<u32> {
        let b = self.as_bytes();
        if index + 4 > b.len() { return Err(oob(index + 4, b.len())); }
        Ok(u32::from_be_bytes(b[index..index + 4].try_into().unwrap()))
    }

    fn get_u64(&self, index: usize) -> Result<u64> {
        let b = self.as_bytes();
        if index + 8 > b.len() { return Err(oob(index + 8, b.len())); }
        Ok(u64::from_be_bytes(b[index..index + 8].try_into().unwrap()))
    }

    /// Big-endian unsigned integer of arbitrary width (1..=8 bytes), used by
    /// tables whose field widths come from selector fields.
    fn get_uint(&self, index: usize, width: usize) -> Result<u64> {
        debug_assert!((1..=8).contains(&width));
        let b = self.as_bytes();
        if index + width > b.len() { return Err(oob(index + width, b.len())); }
        let mut v = 0u64;
        for &byte in &b[index..index + width] {
            v = (v << 8) | byte as u64;
        }
        Ok(v)
    }

    /// Raw bytes from `index` to the end of the record. Terminator and
    /// length conventions are schema business, not handled here.
    fn get_string(&self, index: usize) -> Result<&[u8]> {
        let b = self.as_bytes();
        if index > b.len() { return Err(oob(index, b.len())); }
        Ok(&b[index..])
    }

    /// View over the nested record starting at `index`, sized by the header
    /// found there and bounded by this record's end.
    fn get_box(&self, index: usize) -> Result<BoxView<'_>> {
        let b = self.as_bytes();
        if index + HEADER_LEN > b.len() { return Err(oob(index + HEADER_LEN, b.len())); }
        let avail = b.len() - index;
        let child_len = match u32::from_be_bytes(b[index..index + 4].try_into().unwrap()) {
            0 => avail as u64,
            1 => {
                if avail < EXT_HEADER_LEN {
                    return Err(BoxError::MalformedInput("truncated extended size"));
                }
                u64::from_be_bytes(b[index + 8..index + 16].try_into().unwrap())
            }
            n => n as u64,
        };
        if child_len < HEADER_LEN as u64 || child_len > avail as u64 {
            return Err(BoxError::MalformedInput("nested box overruns record"));
        }
        BoxView::new(&b[index..index + child_len as usize])
    }

    /// Default rendering: type, size and a hex dump of the payload. Schema
    /// wrappers provide their own field-level rendering.
    fn to_pretty_string(&self, indent: usize) -> String {
        crate::pretty::raw_box_string(self.as_bytes(), indent)
    }
}

/// Write access to a record. Same-length writes work on any carrier;
/// anything that changes the record's length funnels through [`BoxWrite::reserve`],
/// which only owned records implement.
pub trait BoxWrite: BoxRead {
    fn as_bytes_mut(&mut self) -> &mut [u8];

    fn set_u8(&mut self, index: usize, v: u8) -> Result<()> {
        let b = self.as_bytes_mut();
        if index >= b.len() { return Err(oob(index, b.len())); }
        b[index] = v;
        Ok(())
    }

    fn set_u16(&mut self, index: usize, v: u16) -> Result<()> {
        let b = self.as_bytes_mut();
        if index + 2 > b.len() { return Err(oob(index + 2, b.len())); }
        b[index..index + 2].copy_from_slice(&v.to_be_bytes());
        Ok(())
    }

    fn set_u24(&mut self, index: usize, v: u32) -> Result<()> {
        let b = self.as_bytes_mut();
        if index + 3 > b.len() { return Err(oob(index + 3, b.len())); }
        b[index] = (v >> 16) as u8;
        b[index + 1] = (v >> 8) as u8;
        b[index + 2] = v as u8;
        Ok(())
    }

    fn set_u32(&mut self, index: usize, v: u32) -> Result<()> {
        let b = self.as_bytes_mut();
        if index + 4 > b.len() { return Err(oob(index + 4, b.len())); }
        b[index..index + 4].copy_from_slice(&v.to_be_bytes());
        Ok(())
    }

    fn set_u64(&mut self, index: usize, v: u64) -> Result<()> {
        let b = self.as_bytes_mut();
        if index + 8 > b.len() { return Err(oob(index + 8, b.len())); }
        b[index..index + 8].copy_from_slice(&v.to_be_bytes());
        Ok(())
    }

    fn set_uint(&mut self, index: usize, width: usize, v: u64) -> Result<()> {
        debug_assert!((1..=8).contains(&width));
        let b = self.as_bytes_mut();
        if index + width > b.len() { return Err(oob(index + width, b.len())); }
        for (i, slot) in b[index..index + width].iter_mut().enumerate() {
            *slot = (v >> (8 * (width - 1 - i))) as u8;
        }
        Ok(())
    }

    /// Change the length of the range `[position, position + current)` to
    /// `wanted` bytes, shifting the tail and updating the record's own size
    /// field. Borrowed overlays support only the degenerate same-length
    /// case; anything else fails with [`BoxError::ImmutableBuffer`].
    fn reserve(&mut self, position: usize, current: usize, wanted: usize) -> Result<()> {
        let len = self.as_bytes().len();
        if position + current > len { return Err(oob(position + current, len)); }
        if current == wanted { Ok(()) } else { Err(BoxError::ImmutableBuffer) }
    }

    /// Replace everything from `index` to the record's end with `data`,
    /// growing or shrinking the record to fit.
    fn set_string(&mut self, data: &[u8], index: usize) -> Result<()> {
        let len = self.as_bytes().len();
        if index > len { return Err(oob(index, len)); }
        self.reserve(index, len - index, data.len())?;
        self.as_bytes_mut()[index..index + data.len()].copy_from_slice(data);
        Ok(())
    }

    /// Overwrite the nested record at `index` (resizing as needed), or
    /// append when `index` is exactly the current end.
    fn set_box(&mut self, child: &impl BoxRead, index: usize) -> Result<()> {
        let len = self.as_bytes().len();
        if index > len { return Err(oob(index, len)); }
        let current = if index == len { 0 } else { self.get_box(index)?.as_bytes().len() };
        let new = child.as_bytes();
        self.reserve(index, current, new.len())?;
        self.as_bytes_mut()[index..index + new.len()].copy_from_slice(new);
        Ok(())
    }
}

/// Read-only overlay of a record inside memory owned by someone else,
/// typically a sub-range of a container's payload. The borrow ties the
/// view's lifetime to the owner, so a view cannot outlive a resize.
#[derive(Copy, Clone)]
pub struct BoxView<'a> {
    data: &'a [u8],
}

impl<'a> BoxView<'a> {
    pub fn new(bytes: &'a [u8]) -> Result<Self> {
        check_frame(bytes)?;
        Ok(BoxView { data: bytes })
    }

    /// Copy this view into an owned, growable record.
    pub fn to_buf(&self) -> Result<BoxBuf> {
        BoxBuf::from_bytes(self.data.to_vec())
    }
}

impl BoxRead for BoxView<'_> {
    fn as_bytes(&self) -> &[u8] { self.data }
}

impl fmt::Debug for BoxView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoxView")
            .field("type", &self.box_type())
            .field("size", &self.boxed_size())
            .finish()
    }
}

/// Mutable overlay of a record in foreign memory. Reads and same-length
/// writes work; growth fails with [`BoxError::ImmutableBuffer`].
pub struct BoxMut<'a> {
    data: &'a mut [u8],
}

impl<'a> BoxMut<'a> {
    pub fn new(bytes: &'a mut [u8]) -> Result<Self> {
        check_frame(bytes)?;
        Ok(BoxMut { data: bytes })
    }
}

impl BoxRead for BoxMut<'_> {
    fn as_bytes(&self) -> &[u8] { self.data }
}

impl BoxWrite for BoxMut<'_> {
    fn as_bytes_mut(&mut self) -> &mut [u8] { self.data }
}

/// An owned record over a growable buffer. The buffer length always equals
/// the declared size; every mutation keeps the two in sync.
#[derive(Clone)]
pub struct BoxBuf {
    data: Vec<u8>,
}

impl BoxBuf {
    /// Minimal empty record of the given type.
    pub fn new(tag: FourCC) -> BoxBuf {
        BoxBuf::with_payload(tag, 0)
    }

    /// Fresh record with `payload_len` zeroed payload bytes.
    pub fn with_payload(tag: FourCC, payload_len: usize) -> BoxBuf {
        let total = HEADER_LEN + payload_len;
        let mut data = vec![0u8; total];
        data[0..4].copy_from_slice(&(total as u32).to_be_bytes());
        data[4..8].copy_from_slice(&tag.0);
        BoxBuf { data }
    }

    /// Take ownership of a complete serialized record.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<BoxBuf> {
        check_frame(&bytes)?;
        let mut b = BoxBuf { data: bytes };
        b.normalize_size()?;
        Ok(b)
    }

    /// Replace this record's entire contents with `bytes`.
    pub fn read(&mut self, bytes: &[u8]) -> Result<()> {
        check_frame(bytes)?;
        self.data.clear();
        self.data.try_reserve(bytes.len()).map_err(|_| BoxError::Allocation(bytes.len()))?;
        self.data.extend_from_slice(bytes);
        self.normalize_size()
    }

    // A streaming-convention size of 0 is rewritten to the actual length so
    // the size/length invariant holds from here on.
    fn normalize_size(&mut self) -> Result<()> {
        if u32::from_be_bytes(self.data[0..4].try_into().unwrap()) == 0 {
            let len = self.data.len();
            if len > u32::MAX as usize {
                return Err(BoxError::UnsupportedSize);
            }
            self.data[0..4].copy_from_slice(&(len as u32).to_be_bytes());
        }
        Ok(())
    }

    /// Reset to an empty, zero-typed shell.
    pub fn clear(&mut self) {
        self.data.clear();
        self.data.resize(HEADER_LEN, 0);
        self.data[0..4].copy_from_slice(&(HEADER_LEN as u32).to_be_bytes());
    }

    pub fn set_type(&mut self, tag: FourCC) {
        self.data[4..8].copy_from_slice(&tag.0);
    }

    pub fn view(&self) -> BoxView<'_> {
        BoxView { data: &self.data }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    fn write_total_size(&mut self, total: u64) {
        if self.header_len() == EXT_HEADER_LEN {
            self.data[8..16].copy_from_slice(&total.to_be_bytes());
        } else {
            self.data[0..4].copy_from_slice(&(total as u32).to_be_bytes());
        }
    }
}

impl Default for BoxBuf {
    fn default() -> Self {
        BoxBuf::new(FourCC([0; 4]))
    }
}

impl fmt::Debug for BoxBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoxBuf")
            .field("type", &self.box_type())
            .field("size", &self.boxed_size())
            .finish()
    }
}

impl BoxRead for BoxBuf {
    fn as_bytes(&self) -> &[u8] { &self.data }
}

impl BoxWrite for BoxBuf {
    fn as_bytes_mut(&mut self) -> &mut [u8] { &mut self.data }

    fn reserve(&mut self, position: usize, current: usize, wanted: usize) -> Result<()> {
        let len = self.data.len();
        if position + current > len { return Err(oob(position + current, len)); }
        if current == wanted { return Ok(()); }
        let new_len = len - current + wanted;
        if self.header_len() == HEADER_LEN && new_len as u64 > u32::MAX as u64 {
            return Err(BoxError::UnsupportedSize);
        }
        if wanted > current {
            let grow = wanted - current;
            self.data.try_reserve(grow).map_err(|_| BoxError::Allocation(new_len))?;
            self.data.splice(position + current..position + current, std::iter::repeat(0u8).take(grow));
        } else {
            self.data.drain(position + wanted..position + current);
        }
        self.write_total_size(new_len as u64);
        Ok(())
    }
}
