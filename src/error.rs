//! Caller-visible error type and the numeric return codes it maps to.

/// Errors returned by [`crate::convert`].
///
/// Each variant corresponds to one of the negative return codes a C-style
/// caller would see; [`ConvertError::code`] recovers that number so a thin
/// FFI wrapper can expose the same contract the original library did.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("invalid arguments")]
    InvalidArguments,
    #[error("not a WMF file")]
    NotAWmf,
    #[error("header decode failure: {0}")]
    HeaderDecode(String),
    #[error("output sink acquisition failure")]
    SinkAcquisition,
    #[error("result allocation failure")]
    ResultAllocation,
}

impl ConvertError {
    pub fn code(&self) -> i32 {
        match self {
            ConvertError::InvalidArguments => -1,
            ConvertError::NotAWmf => -2,
            ConvertError::HeaderDecode(_) => -3,
            ConvertError::SinkAcquisition => -4,
            ConvertError::ResultAllocation => -5,
        }
    }
}
