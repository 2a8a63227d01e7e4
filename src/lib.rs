pub mod errors;
pub mod io;
pub mod llm;
pub mod models;
pub mod render;
pub mod stages;

pub use errors::{PipelineError, RenderError};
pub use io::{write_deliverables, Deliverables};
pub use llm::{LlmClient, LlmConfig, Provider, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
pub use models::{StageKind, StageResult, StageSpec, TravelPlan, TripRequest};
pub use render::{render_markdown_file, PageLayout, RenderedPdf};
pub use stages::{run_pipeline, PipelineConfig, PipelineState, StageExecutor};
