// PDF rendering via the Typst CLI.
// Source is generated in a throwaway temp dir; only the compiled PDF lands in OUTPUT_DIR.

pub mod typst;

use std::path::{Path, PathBuf};

use chrono::Local;
use thiserror::Error;
use tokio::process::Command;
use tracing::{error, info};

use crate::metrics;

pub use self::typst::{render_typst_source, ResumeDocument};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Typst compilation failed: {0}")]
    Compiler(String),

    #[error("File '{0}' not found")]
    NotFound(String),

    #[error("Invalid file name '{0}'")]
    InvalidFilename(String),
}

#[derive(Debug, Clone)]
pub struct PdfRenderer {
    output_dir: PathBuf,
    typst_bin: String,
}

impl PdfRenderer {
    pub fn new(output_dir: PathBuf, typst_bin: String) -> Self {
        Self {
            output_dir,
            typst_bin,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Compiles `doc` to `OUTPUT_DIR/resume_<name>_<timestamp>.pdf`.
    pub async fn render(&self, doc: &ResumeDocument) -> Result<PathBuf, RenderError> {
        let result = self.compile(doc).await;
        match &result {
            Ok(path) => {
                metrics::record_pdf_generation("success");
                info!("PDF generated: {}", path.display());
            }
            Err(e) => {
                metrics::record_pdf_generation("error");
                error!("PDF generation failed: {e}");
            }
        }
        result
    }

    async fn compile(&self, doc: &ResumeDocument) -> Result<PathBuf, RenderError> {
        tokio::fs::create_dir_all(&self.output_dir).await?;

        let workspace = tempfile::tempdir()?;
        let source_path = workspace.path().join("resume.typ");
        tokio::fs::write(&source_path, render_typst_source(doc)).await?;

        let filename = typst::output_filename(&doc.name, Local::now().naive_local());
        let output_path = self.output_dir.join(filename);

        let output = Command::new(&self.typst_bin)
            .arg("compile")
            .arg(&source_path)
            .arg(&output_path)
            .output()
            .await
            .map_err(|e| RenderError::Compiler(format!("failed to run {}: {e}", self.typst_bin)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RenderError::Compiler(stderr.trim().to_string()));
        }

        Ok(output_path)
    }

    /// Maps a download request to a file inside the output directory.
    /// Only bare `*.pdf` names are accepted.
    pub async fn resolve_download(&self, filename: &str) -> Result<PathBuf, RenderError> {
        let is_plain = !filename.is_empty()
            && !filename.contains(&['/', '\\'][..])
            && !filename.contains("..")
            && filename.ends_with(".pdf");
        if !is_plain {
            return Err(RenderError::InvalidFilename(filename.to_string()));
        }

        let path = self.output_dir.join(filename);
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(path),
            _ => Err(RenderError::NotFound(filename.to_string())),
        }
    }
}
