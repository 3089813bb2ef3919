//! Word (`.docx`) paragraphs, read straight from the zip container.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;

use super::ExtractionAdapter;
use crate::failure::ExtractionFailure;

const DOCUMENT_PART: &str = "word/document.xml";

/// Non-blank paragraphs of a WordprocessingML body, one per line, in
/// document order.
pub fn paragraphs_from_xml(xml: &str) -> Result<String, ExtractionFailure> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut paragraph = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"p" => paragraph.clear(),
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"tab" => paragraph.push('\t'),
                b"br" | b"cr" => paragraph.push('\n'),
                _ => {}
            },
            Ok(Event::Text(ref t)) if in_text => {
                let text = t
                    .unescape()
                    .map_err(|e| ExtractionFailure::Docx(e.to_string()))?;
                paragraph.push_str(&text);
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    if !paragraph.trim().is_empty() {
                        out.push_str(&paragraph);
                        out.push('\n');
                    }
                    paragraph.clear();
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(ExtractionFailure::Docx(e.to_string())),
            _ => {}
        }
    }
    Ok(out)
}

fn read_document_part(path: &Path) -> Result<String, ExtractionFailure> {
    let file = File::open(path)?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| ExtractionFailure::Docx(e.to_string()))?;
    let mut part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| ExtractionFailure::Docx(format!("{}: {}", DOCUMENT_PART, e)))?;
    let mut xml = String::new();
    part.read_to_string(&mut xml)?;
    Ok(xml)
}

pub struct DocxAdapter;

#[async_trait]
impl ExtractionAdapter for DocxAdapter {
    async fn extract(&self, path: &Path) -> Result<String, ExtractionFailure> {
        let path: PathBuf = path.to_path_buf();
        tokio::task::spawn_blocking(move || {
            let xml = read_document_part(&path)?;
            paragraphs_from_xml(&xml)
        })
        .await
        .map_err(|e| ExtractionFailure::Docx(e.to_string()))?
    }

    fn name(&self) -> &str {
        "docx"
    }
}
