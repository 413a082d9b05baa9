//! Text loading for PDF, DOCX and plain-text résumés.

use std::fs;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use docx_rs::{DocumentChild, ParagraphChild, RunChild, TableCellContent, TableChild, TableRowChild};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Docx,
    #[serde(rename = "text")]
    PlainText,
}

impl DocumentKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "txt" | "text" | "md" => Some(Self::PlainText),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::PlainText => "text",
        }
    }
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("unsupported file type {extension:?}: {}", path.display())]
    Unsupported { path: PathBuf, extension: String },
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to extract PDF text from {}: {message}", path.display())]
    Pdf { path: PathBuf, message: String },
    #[error("failed to parse DOCX {}: {message}", path.display())]
    Docx { path: PathBuf, message: String },
    #[error("too little text ({chars} chars) in {}", path.display())]
    TooShort { path: PathBuf, chars: usize },
}

#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub kind: DocumentKind,
    pub text: String,
}

pub fn is_supported(path: &Path) -> bool {
    DocumentKind::from_path(path).is_some()
}

pub fn load_text(path: &Path, min_chars: usize) -> Result<LoadedDocument, DocumentError> {
    let kind = DocumentKind::from_path(path).ok_or_else(|| DocumentError::Unsupported {
        path: path.to_path_buf(),
        extension: path
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_default(),
    })?;

    let text = match kind {
        DocumentKind::Pdf => read_pdf(path)?,
        DocumentKind::Docx => read_docx(path)?,
        DocumentKind::PlainText => fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?,
    };

    let chars = text.trim().chars().count();
    if chars < min_chars {
        return Err(DocumentError::TooShort {
            path: path.to_path_buf(),
            chars,
        });
    }

    debug!(path = %path.display(), kind = kind.as_str(), chars, "loaded document text");
    Ok(LoadedDocument { kind, text })
}

fn read_pdf(path: &Path) -> Result<String, DocumentError> {
    let bytes = fs::read(path).map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    // pdf-extract panics on some malformed inputs.
    let extracted = catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(&bytes)))
        .map_err(|_| DocumentError::Pdf {
            path: path.to_path_buf(),
            message: "extractor panicked".to_string(),
        })?;

    extracted.map_err(|err| DocumentError::Pdf {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

fn read_docx(path: &Path) -> Result<String, DocumentError> {
    let bytes = fs::read(path).map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let docx = docx_rs::read_docx(&bytes).map_err(|err| DocumentError::Docx {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;

    let mut text = String::new();
    for child in &docx.document.children {
        push_document_child(child, &mut text);
    }
    Ok(text)
}

fn push_document_child(child: &DocumentChild, out: &mut String) {
    match child {
        DocumentChild::Paragraph(paragraph) => {
            push_paragraph_children(&paragraph.children, out);
            out.push('\n');
        }
        DocumentChild::Table(table) => {
            for row in &table.rows {
                let TableChild::TableRow(row) = row;
                let mut cells = Vec::new();
                for cell in &row.cells {
                    let TableRowChild::TableCell(cell) = cell;
                    let mut cell_text = String::new();
                    for content in &cell.children {
                        if let TableCellContent::Paragraph(paragraph) = content {
                            if !cell_text.is_empty() {
                                cell_text.push(' ');
                            }
                            push_paragraph_children(&paragraph.children, &mut cell_text);
                        }
                    }
                    if !cell_text.trim().is_empty() {
                        cells.push(cell_text.trim().to_string());
                    }
                }
                if !cells.is_empty() {
                    out.push_str(&cells.join(" | "));
                    out.push('\n');
                }
            }
        }
        _ => {}
    }
}

fn push_paragraph_children(children: &[ParagraphChild], out: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    match run_child {
                        RunChild::Text(text) => out.push_str(&text.text),
                        RunChild::Tab(_) => out.push('\t'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => push_paragraph_children(&link.children, out),
            _ => {}
        }
    }
}
