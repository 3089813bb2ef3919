//! Plain text files, decoded as UTF-8 or Windows-1252.

use std::path::Path;

use async_trait::async_trait;
use encoding_rs::WINDOWS_1252;

use dossier_core::defaults::TEXT_SNIFF_BYTES;

use super::ExtractionAdapter;
use crate::failure::ExtractionFailure;

/// Decode bytes as UTF-8, falling back to Windows-1252 (a superset of
/// Latin-1 for printable text) when they are not valid UTF-8.
pub fn decode_text(data: &[u8]) -> String {
    match std::str::from_utf8(data) {
        Ok(text) => text.strip_prefix('\u{feff}').unwrap_or(text).to_string(),
        Err(_) => {
            let (text, _, _) = WINDOWS_1252.decode(data);
            text.into_owned()
        }
    }
}

/// Heuristic: a NUL byte in the leading window marks a binary file.
pub fn looks_textual(data: &[u8]) -> bool {
    let window = &data[..data.len().min(TEXT_SNIFF_BYTES)];
    !window.contains(&0)
}

/// Reads plain text files in full.
pub struct TextNativeAdapter;

#[async_trait]
impl ExtractionAdapter for TextNativeAdapter {
    async fn extract(&self, path: &Path) -> Result<String, ExtractionFailure> {
        let data = tokio::fs::read(path).await?;
        Ok(decode_text(&data))
    }

    fn name(&self) -> &str {
        "text_native"
    }
}
