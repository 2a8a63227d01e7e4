//! Error tiers for a planning run.
//!
//! A `PipelineError` is fatal to the run. A `RenderError` only costs the PDF;
//! the Markdown and text artifacts are already on disk when it occurs.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::StageKind;

/// The planning run failed and nothing usable was produced
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A stage's model call failed
    #[error("{stage} stage failed")]
    Stage {
        stage: StageKind,
        #[source]
        source: anyhow::Error,
    },

    /// Writing a Markdown artifact failed
    #[error("failed to write {path:?}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The PDF could not be produced
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to access {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("PDF generation failed: {0}")]
    Pdf(String),
}
