use anyhow::{Context, Result};
use std::borrow::Cow;
use std::io::{BufRead, Cursor};
use std::path::Path;
use winextract_core::model::Document;

pub mod document;
pub mod error;
pub mod parse;
pub mod registry;
pub mod scanner;
pub mod tag;

pub use document::DocumentParser;
pub use error::{DxfError, ScanError};
pub use registry::EntityRegistry;
pub use scanner::Scanner;
pub use tag::Tag;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parses an ASCII DXF stream with the default entity registry.
pub fn load<R: BufRead>(reader: R) -> error::Result<Document> {
    let registry = EntityRegistry::default();
    DocumentParser::new(&registry).parse(reader)
}

pub fn load_str(text: &str) -> error::Result<Document> {
    load(Cursor::new(text.as_bytes()))
}

/// Text of a DXF file: UTF-8 (BOM stripped) when valid, GB18030 otherwise.
pub fn decode(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => {
            let (text, had_errors) = encoding_rs::GB18030.decode_without_bom_handling(bytes);
            if had_errors {
                log::warn!("input is neither UTF-8 nor GB18030; undecodable bytes replaced");
            }
            text
        }
    }
}

pub fn import_dxf(path: &Path) -> Result<Document> {
    let bytes = std::fs::read(path).with_context(|| format!("read DXF: {path:?}"))?;
    let text = decode(&bytes);
    load_str(&text).with_context(|| format!("load DXF: {path:?}"))
}
