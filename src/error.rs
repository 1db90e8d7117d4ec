use crate::boxed::FourCC;

#[derive(thiserror::Error, Debug)]
pub enum BoxError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed input: {0}")]
    MalformedInput(&'static str),
    #[error("record size requires the 64-bit size extension")]
    UnsupportedSize,
    #[error("box does not own its buffer")]
    ImmutableBuffer,
    #[error("offset {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("could not allocate {0} bytes")]
    Allocation(usize),
    #[error("expected box type {expected}, found {found}")]
    WrongType { expected: FourCC, found: FourCC },
}

pub type Result<T> = std::result::Result<T, BoxError>;
