//! Catalog of conversion tools exposed by the server, one page per tool.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use documorph_core::FormData;
use thiserror::Error;

const PDF: &[&str] = &["pdf"];
const IMAGES: &[&str] = &["png", "jpg", "jpeg"];
const OFFICE: &[&str] = &["doc", "docx", "xls", "xlsx", "ppt", "pptx"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Tool {
    Merge,
    Split,
    Compress,
    PdfToWord,
    PdfToImages,
    ImagesToPdf,
    OfficeToPdf,
    Watermark,
    Rotate,
    Protect,
    Unlock,
    ExtractText,
    Sign,
    ExtractImages,
    PdfToExcel,
    PdfToHtml,
    PdfOcr,
    ReorderPages,
}

/// Static description of one tool's upload form.
#[derive(Debug, Clone, Copy)]
pub struct ToolSpec {
    pub page_path: &'static str,
    /// `files` for multi-upload pages, `file` otherwise.
    pub file_field: &'static str,
    pub multiple: bool,
    pub accepts: &'static [&'static str],
    /// Second upload slot, e.g. the signature image.
    pub secondary: Option<(&'static str, &'static [&'static str])>,
    pub defaults: &'static [(&'static str, &'static str)],
    pub required: &'static [&'static str],
}

impl ToolSpec {
    const fn single(page_path: &'static str, accepts: &'static [&'static str]) -> Self {
        Self {
            page_path,
            file_field: "file",
            multiple: false,
            accepts,
            secondary: None,
            defaults: &[],
            required: &[],
        }
    }

    const fn multiple(page_path: &'static str, accepts: &'static [&'static str]) -> Self {
        Self {
            page_path,
            file_field: "files",
            multiple: true,
            accepts,
            secondary: None,
            defaults: &[],
            required: &[],
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ToolError {
    #[error("{tool} needs at least one file")]
    NoFiles { tool: &'static str },
    #[error("{tool} takes {expected} file(s), got {actual}")]
    WrongFileCount {
        tool: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("{path}: expected one of {accepted}")]
    UnsupportedExtension { path: String, accepted: String },
    #[error("{path}: file not found")]
    MissingFile { path: String },
    #[error("{tool} requires --field {field}=...")]
    MissingField {
        tool: &'static str,
        field: &'static str,
    },
}

impl Tool {
    pub fn name(self) -> &'static str {
        self.spec().page_path.trim_start_matches('/')
    }

    pub fn spec(self) -> ToolSpec {
        match self {
            Tool::Merge => ToolSpec::multiple("/merge", PDF),
            Tool::Split => ToolSpec::single("/split", PDF),
            Tool::Compress => ToolSpec {
                defaults: &[("quality", "screen")],
                ..ToolSpec::single("/compress", PDF)
            },
            Tool::PdfToWord => ToolSpec::single("/pdf-to-word", PDF),
            Tool::PdfToImages => ToolSpec {
                defaults: &[("fmt", "png")],
                ..ToolSpec::single("/pdf-to-images", PDF)
            },
            Tool::ImagesToPdf => ToolSpec::multiple("/images-to-pdf", IMAGES),
            Tool::OfficeToPdf => ToolSpec::single("/office-to-pdf", OFFICE),
            Tool::Watermark => ToolSpec {
                secondary: Some(("watermark", PDF)),
                ..ToolSpec::single("/watermark", PDF)
            },
            Tool::Rotate => ToolSpec {
                defaults: &[("angle", "90")],
                ..ToolSpec::single("/rotate", PDF)
            },
            Tool::Protect => ToolSpec {
                required: &["password"],
                ..ToolSpec::single("/protect", PDF)
            },
            Tool::Unlock => ToolSpec {
                required: &["password"],
                ..ToolSpec::single("/unlock", PDF)
            },
            Tool::ExtractText => ToolSpec::single("/extract-text", PDF),
            Tool::Sign => ToolSpec {
                secondary: Some(("image", IMAGES)),
                defaults: &[("scale", "0.25")],
                ..ToolSpec::single("/sign", PDF)
            },
            Tool::ExtractImages => ToolSpec::single("/extract-images", PDF),
            Tool::PdfToExcel => ToolSpec::single("/pdf-to-excel", PDF),
            Tool::PdfToHtml => ToolSpec::single("/pdf-to-html", PDF),
            Tool::PdfOcr => ToolSpec {
                defaults: &[("lang", "eng")],
                ..ToolSpec::single("/pdf-ocr", PDF)
            },
            Tool::ReorderPages => ToolSpec {
                required: &["order"],
                ..ToolSpec::single("/reorder-pages", PDF)
            },
        }
    }

    /// Validates the inputs and assembles the form a browser would submit.
    pub fn build_form(
        self,
        files: &[PathBuf],
        overrides: &[(String, String)],
    ) -> Result<FormData, ToolError> {
        let spec = self.spec();
        let tool = self.name();

        if files.is_empty() {
            return Err(ToolError::NoFiles { tool });
        }
        let expected = if spec.multiple {
            files.len()
        } else {
            1 + usize::from(spec.secondary.is_some())
        };
        if files.len() != expected {
            return Err(ToolError::WrongFileCount {
                tool,
                expected,
                actual: files.len(),
            });
        }

        let mut form = FormData::new(spec.page_path);
        let (primary, rest) = if spec.multiple {
            (files, &[][..])
        } else {
            files.split_at(1)
        };
        for path in primary {
            check_file(path, spec.accepts)?;
            form = form.with_attachment(spec.file_field, path.clone());
        }
        if let (Some((field, accepts)), Some(path)) = (spec.secondary, rest.first()) {
            check_file(path, accepts)?;
            form = form.with_attachment(field, path.clone());
        }

        for (name, value) in spec.defaults {
            form.set_field(*name, *value);
        }
        for (name, value) in overrides {
            form.set_field(name.clone(), value.clone());
        }
        for field in spec.required {
            let present = form
                .fields()
                .iter()
                .any(|f| f.name == *field && !f.value.trim().is_empty());
            if !present {
                return Err(ToolError::MissingField {
                    tool,
                    field: *field,
                });
            }
        }
        Ok(form)
    }
}

fn check_file(path: &Path, accepts: &[&str]) -> Result<(), ToolError> {
    let ext = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    if !accepts.iter().any(|accepted| *accepted == ext) {
        return Err(ToolError::UnsupportedExtension {
            path: path.display().to_string(),
            accepted: accepts.join(", "),
        });
    }
    if !path.is_file() {
        return Err(ToolError::MissingFile {
            path: path.display().to_string(),
        });
    }
    Ok(())
}
