//! Text Extractor — turns a resume document into plain text, dispatching on file extension.
//!
//! - `.pdf`  → per-page text via `pdf-extract`, concatenated in page order with no separator.
//! - `.docx` → body paragraphs of `word/document.xml`, joined with `\n`.
//!
//! No OCR and no layout awareness. Any parse failure surfaces as `ExtractionFailure`.

use std::io::{Cursor, Read};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;

use crate::analysis::AnalysisError;

/// Document kinds the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Resolves the document kind from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, AnalysisError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "pdf" => Ok(DocumentKind::Pdf),
            "docx" => Ok(DocumentKind::Docx),
            "" => Err(AnalysisError::UnsupportedFormat(format!(
                "'{}' has no file extension",
                path.display()
            ))),
            other => Err(AnalysisError::UnsupportedFormat(format!(".{other}"))),
        }
    }
}

/// Extracts plain text from a `.pdf` or `.docx` file.
pub fn extract_text(path: &Path) -> Result<String, AnalysisError> {
    let kind = DocumentKind::from_path(path)?;
    let bytes = std::fs::read(path).map_err(|e| {
        AnalysisError::ExtractionFailure(format!("cannot read '{}': {e}", path.display()))
    })?;

    let text = match kind {
        DocumentKind::Pdf => extract_pdf(&bytes)?,
        DocumentKind::Docx => extract_docx(&bytes)?,
    };

    debug!(
        "Extracted {} chars from {:?} document {}",
        text.len(),
        kind,
        path.display()
    );
    Ok(text)
}

fn extract_pdf(bytes: &[u8]) -> Result<String, AnalysisError> {
    // pdf-extract panics on some malformed inputs instead of returning an error.
    let pages = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
        .map_err(|_| AnalysisError::ExtractionFailure("PDF parser aborted".to_string()))?
        .map_err(|e| AnalysisError::ExtractionFailure(format!("PDF parse error: {e}")))?;

    Ok(pages.concat())
}

fn extract_docx(bytes: &[u8]) -> Result<String, AnalysisError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| AnalysisError::ExtractionFailure(format!("not a DOCX container: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| AnalysisError::ExtractionFailure(format!("missing document part: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| AnalysisError::ExtractionFailure(format!("unreadable document part: {e}")))?;

    let paragraphs = body_paragraphs(&xml)?;
    Ok(paragraphs.join("\n"))
}

/// Collects the text of top-level body paragraphs. Paragraphs inside tables are skipped.
fn body_paragraphs(xml: &str) -> Result<Vec<String>, AnalysisError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current: Option<String> = None;
    let mut table_depth = 0usize;
    let mut paragraph_depth = 0usize;
    let mut run_depth = 0usize;
    let mut in_text = false;

    loop {
        let event = reader.read_event().map_err(|e| {
            AnalysisError::ExtractionFailure(format!(
                "malformed document XML at byte {}: {e}",
                reader.buffer_position()
            ))
        })?;

        match event {
            Event::Start(e) => match e.name().as_ref() {
                b"w:tbl" => table_depth += 1,
                b"w:p" => {
                    if paragraph_depth == 0 && table_depth == 0 {
                        current = Some(String::new());
                    }
                    paragraph_depth += 1;
                }
                b"w:r" => run_depth += 1,
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::End(e) => match e.name().as_ref() {
                b"w:tbl" => table_depth = table_depth.saturating_sub(1),
                b"w:p" => {
                    paragraph_depth = paragraph_depth.saturating_sub(1);
                    if paragraph_depth == 0 {
                        if let Some(p) = current.take() {
                            paragraphs.push(p);
                        }
                    }
                }
                b"w:r" => run_depth = run_depth.saturating_sub(1),
                b"w:t" => in_text = false,
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:p" if paragraph_depth == 0 && table_depth == 0 => {
                    paragraphs.push(String::new())
                }
                b"w:tab" if run_depth > 0 => {
                    if let Some(p) = current.as_mut() {
                        p.push('\t');
                    }
                }
                b"w:br" | b"w:cr" if run_depth > 0 => {
                    if let Some(p) = current.as_mut() {
                        p.push('\n');
                    }
                }
                _ => {}
            },
            Event::Text(t) if in_text => {
                if let Some(p) = current.as_mut() {
                    let text = t.unescape().map_err(|e| {
                        AnalysisError::ExtractionFailure(format!("bad text escape: {e}"))
                    })?;
                    p.push_str(&text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}


/// Minimal in-memory documents shared by extractor and router tests.
#[cfg(test)]
pub(crate) mod fixtures {
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    /// A DOCX container holding only `word/document.xml`.
    pub(crate) fn docx_bytes(document_xml: &str) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        zip.start_file("word/document.xml", options).unwrap();
        zip.write_all(document_xml.as_bytes()).unwrap();
        zip.finish().unwrap().into_inner()
    }

    /// A DOCX whose body is one paragraph per line of `text`.
    pub(crate) fn docx_with_text(text: &str) -> Vec<u8> {
        let paragraphs: String = text
            .lines()
            .map(|line| format!("<w:p><w:r><w:t>{line}</w:t></w:r></w:p>"))
            .collect();
        docx_bytes(&format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{paragraphs}</w:body></w:document>"#
        ))
    }

    /// A PDF with one Helvetica text line per page, xref offsets computed exactly.
    pub(crate) fn pdf_bytes(pages: &[&str]) -> Vec<u8> {
        // Objects: 1 catalog, 2 page tree, 3 font, then a (page, contents) pair per page.
        let page_ids: Vec<usize> = (0..pages.len()).map(|i| 4 + 2 * i).collect();
        let kids: Vec<String> = page_ids.iter().map(|id| format!("{id} 0 R")).collect();

        let mut objects = vec![
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                kids.join(" "),
                pages.len()
            ),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
        ];
        for (page_id, text) in page_ids.iter().zip(pages) {
            objects.push(format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
                 /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
                page_id + 1
            ));
            let content = format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET");
            objects.push(format!(
                "<< /Length {} >>\nstream\n{content}\nendstream",
                content.len()
            ));
        }

        let mut out = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
        }

        let xref_start = out.len();
        out.extend_from_slice(
            format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).as_bytes(),
        );
        for offset in offsets {
            out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
        }
        out.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_start}\n%%EOF\n",
                objects.len() + 1
            )
            .as_bytes(),
        );
        out
    }
}
