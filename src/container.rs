use crate::boxed::{BoxRead, BoxView, BoxWrite, EXT_HEADER_LEN, HEADER_LEN, oob};
use crate::error::{BoxError, Result};

/// Record-relative `(offset, length)` spans of the complete children packed
/// back-to-back from `start` to the end of the record. Scanning stops at the
/// first span that is truncated or overruns the record.
pub(crate) fn child_spans(record: &[u8], start: usize) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut pos = start;
    let end = record.len();
    while pos + HEADER_LEN <= end {
        let remaining = end - pos;
        let child_len = match u32::from_be_bytes(record[pos..pos + 4].try_into().unwrap()) {
            0 => remaining as u64,
            1 => {
                if remaining < EXT_HEADER_LEN { break; }
                u64::from_be_bytes(record[pos + 8..pos + 16].try_into().unwrap())
            }
            n => n as u64,
        };
        if child_len < HEADER_LEN as u64 || child_len > remaining as u64 { break; }
        spans.push((pos, child_len as usize));
        pos += child_len as usize;
    }
    spans
}

/// Views over every child of `b`, in file order.
pub fn children_of(b: &impl BoxRead) -> Vec<BoxView<'_>> {
    let bytes = b.as_bytes();
    child_spans(bytes, b.header_len())
        .into_iter()
        .filter_map(|(off, len)| BoxView::new(&bytes[off..off + len]).ok())
        .collect()
}

/// Ordered, positional traversal of a payload that is a back-to-back
/// concatenation of complete child records. Identity is the ordinal
/// position; nothing is cached, every call rescans.
pub trait ChildSequence: BoxRead {
    fn content_count(&self) -> u32 {
        child_spans(self.as_bytes(), self.header_len()).len() as u32
    }

    fn content(&self, index: u32) -> Result<BoxView<'_>> {
        let spans = child_spans(self.as_bytes(), self.header_len());
        match spans.get(index as usize) {
            Some(&(off, _)) => self.get_box(off),
            None => Err(oob(index as usize, spans.len())),
        }
    }
}

pub trait ChildSequenceMut: ChildSequence + BoxWrite {
    /// Replace child `index`, resizing its span to fit; `index == count`
    /// appends at the end of the payload.
    fn set_content(&mut self, child: &impl BoxRead, index: u32) -> Result<()> {
        let spans = child_spans(self.as_bytes(), self.header_len());
        let count = spans.len() as u32;
        if index < count {
            let (off, _) = spans[index as usize];
            self.set_box(child, off)
        } else if index == count {
            let end = self.as_bytes().len();
            self.set_box(child, end)
        } else {
            Err(BoxError::IndexOutOfRange { index: index as usize, len: spans.len() })
        }
    }

    fn append(&mut self, child: &impl BoxRead) -> Result<()> {
        let count = self.content_count();
        self.set_content(child, count)
    }
}
