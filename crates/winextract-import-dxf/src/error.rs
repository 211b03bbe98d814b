use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("read DXF stream: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid group code {raw:?} at line {line}")]
    InvalidCode { line: usize, raw: String },
    #[error("missing value for group code {code} at line {line}")]
    MissingValue { line: usize, code: i32 },
}

#[derive(Debug, Error)]
pub enum DxfError {
    #[error("DXF parse failed: {0}")]
    Scan(#[from] ScanError),
}

pub type Result<T, E = DxfError> = std::result::Result<T, E>;
