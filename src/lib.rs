//! Mutable MP4/ISOBMFF box engine: parse, edit in place, grow or shrink,
//! and re-serialize size-prefixed records. The buffer is the serialized
//! form; there is no separate encode step. Includes the fragmented-MP4 box
//! catalog, the Adobe HDS bootstrap boxes and a diagnostic pretty-printer.

pub mod boxed;
pub mod boxes;
pub mod container;
pub mod error;
pub mod full;
pub mod pretty;
pub mod stream;

pub use boxed::{BoxBuf, BoxMut, BoxRead, BoxView, BoxWrite, FourCC};
pub use container::{ChildSequence, ChildSequenceMut, children_of};
pub use error::{BoxError, Result};
pub use full::{VersionFlags, VersionFlagsMut};
