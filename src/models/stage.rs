use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::TripRequest;

/// The three generation steps, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    /// Destination logistics: lodging, costs, weather, transport, events
    Location,
    /// Interest-driven local guide
    Guide,
    /// Final itinerary synthesized from the two research stages
    Planner,
}

impl StageKind {
    pub const ORDER: [StageKind; 3] = [StageKind::Location, StageKind::Guide, StageKind::Planner];

    /// File the stage's raw output is persisted to
    pub fn output_file_name(self) -> &'static str {
        match self {
            StageKind::Location => "city_report.md",
            StageKind::Guide => "guide_report.md",
            StageKind::Planner => "travel_plan.md",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StageKind::Location => "location",
            StageKind::Guide => "guide",
            StageKind::Planner => "planner",
        };
        f.write_str(name)
    }
}

/// Persona handed to the model for one stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentProfile {
    pub role: String,
    pub goal: String,
    pub backstory: String,
}

/// Everything needed to run one stage
#[derive(Debug, Clone)]
pub struct StageSpec {
    pub kind: StageKind,
    pub agent: AgentProfile,
    /// Task description with the trip parameters interpolated
    pub description: String,
    /// Shape of the answer the model is asked for
    pub expected_output: String,
    /// Results of earlier stages, oldest first
    pub context: Vec<StageResult>,
    /// Where the stage output lands once the run succeeds
    pub output_path: PathBuf,
}

/// Text produced by one stage.
///
/// The text is natural-language Markdown and is never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageResult {
    pub stage: StageKind,
    pub text: String,
}

impl StageResult {
    pub fn new(stage: StageKind, text: impl Into<String>) -> Self {
        Self {
            stage,
            text: text.into(),
        }
    }
}

/// Terminal artifact of a successful run
#[derive(Debug, Clone)]
pub struct TravelPlan {
    pub run_id: Uuid,
    pub request: TripRequest,
    /// Location, guide and planner results in execution order
    pub stages: Vec<StageResult>,
    /// Per-stage Markdown files, parallel to `stages`
    pub stage_paths: Vec<PathBuf>,
    /// Per-destination Markdown file holding `text()` byte for byte
    pub markdown_path: PathBuf,
}

impl TravelPlan {
    /// The synthesized itinerary
    pub fn text(&self) -> &str {
        self.stages
            .iter()
            .find(|r| r.stage == StageKind::Planner)
            .map(|r| r.text.as_str())
            .unwrap_or_default()
    }
}
