use crate::boxed::{BoxRead, BoxWrite};
use crate::error::Result;

/// The 1-byte version / 3-byte flags prefix carried by "full" boxes.
/// Schema fields of such boxes start at `header_len() + 4`.
pub trait VersionFlags: BoxRead {
    fn version(&self) -> Result<u8> {
        self.get_u8(self.header_len())
    }

    fn flags(&self) -> Result<u32> {
        self.get_u24(self.header_len() + 1)
    }

    fn flag_set(&self, bit: u32) -> Result<bool> {
        Ok(self.flags()? & bit != 0)
    }
}

pub trait VersionFlagsMut: VersionFlags + BoxWrite {
    fn set_version(&mut self, v: u8) -> Result<()> {
        let h = self.header_len();
        self.set_u8(h, v)
    }

    fn set_flags(&mut self, flags: u32) -> Result<()> {
        let h = self.header_len();
        self.set_u24(h + 1, flags)
    }
}
