use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveErrorCode {
    TruncatedHeader,
    InvalidOffset,
    TruncatedRecord,
    FieldOverflow,
    InvalidPortraitSize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveError {
    pub code: SaveErrorCode,
    pub message: String,
}

impl SaveError {
    pub fn new(code: SaveErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl Error for SaveError {}
