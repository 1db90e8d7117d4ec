//! Framing layer: reads complete boxes from any byte stream into owned
//! records. Parse failures surface to the caller; nothing is retried.

use std::io::Read;

use byteorder::{BigEndian, ReadBytesExt};
use log::{debug, trace};

use crate::boxed::{BoxBuf, FourCC};
use crate::error::{BoxError, Result};

/// Read the next complete box from `r`. Returns `Ok(None)` on clean EOF at
/// a box boundary; EOF inside a record is `MalformedInput`.
pub fn read_box<R: Read>(r: &mut R) -> Result<Option<BoxBuf>> {
    let mut header = [0u8; 8];
    let mut filled = 0;
    while filled < header.len() {
        let n = r.read(&mut header[filled..])?;
        if n == 0 {
            if filled == 0 {
                return Ok(None);
            }
            return Err(BoxError::MalformedInput("truncated box header"));
        }
        filled += n;
    }

    let size32 = u32::from_be_bytes(header[0..4].try_into().unwrap());
    let mut data = header.to_vec();

    let total = match size32 {
        0 => {
            // streaming convention: the record runs to the end of the input
            r.read_to_end(&mut data)?;
            trace!("unknown-size box, consumed {} bytes to EOF", data.len());
            data.len() as u64
        }
        1 => {
            let ext = r.read_u64::<BigEndian>()?;
            if ext < 16 {
                return Err(BoxError::MalformedInput("extended size below header length"));
            }
            data.extend_from_slice(&ext.to_be_bytes());
            ext
        }
        n if n < 8 => {
            return Err(BoxError::MalformedInput("size field below header length"));
        }
        n => n as u64,
    };

    if size32 != 0 {
        let remaining = total as usize - data.len();
        data.try_reserve(remaining).map_err(|_| BoxError::Allocation(total as usize))?;
        let start = data.len();
        data.resize(total as usize, 0);
        r.read_exact(&mut data[start..])?;
    }

    debug!(
        "read {} box ({} bytes)",
        FourCC([header[4], header[5], header[6], header[7]]),
        total
    );
    BoxBuf::from_bytes(data).map(Some)
}

/// Drain `r`, collecting every box until clean EOF.
pub fn read_boxes<R: Read>(r: &mut R) -> Result<Vec<BoxBuf>> {
    let mut out = Vec::new();
    while let Some(b) = read_box(r)? {
        out.push(b);
    }
    Ok(out)
}
