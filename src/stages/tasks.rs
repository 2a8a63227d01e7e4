use std::path::Path;

use crate::llm::agent_profile;
use crate::models::{StageKind, StageResult, StageSpec, TripRequest};

/// Build the location research stage
pub fn location_stage(request: &TripRequest, output_dir: &Path) -> StageSpec {
    let description = format!(
        "
        Gather essential travel information for {destination}, including:
        - Accommodation options
        - Cost of living
        - Weather
        - Transportation
        - Local events
        Dates: {from} to {to}
        ",
        destination = request.destination,
        from = request.start_date,
        to = request.end_date,
    );

    stage_spec(
        StageKind::Location,
        description,
        "Markdown report with travel logistics and useful tips.",
        Vec::new(),
        output_dir,
    )
}

/// Build the local guide stage
pub fn guide_stage(request: &TripRequest, output_dir: &Path) -> StageSpec {
    let description = format!(
        "
        Create a local guide for {destination} tailored to: {interests}.
        Include best spots to visit, eat, relax, and explore during {from} to {to}.
        ",
        destination = request.destination,
        interests = request.interests,
        from = request.start_date,
        to = request.end_date,
    );

    stage_spec(
        StageKind::Guide,
        description,
        "Markdown with interactive places, events, food, attractions.",
        Vec::new(),
        output_dir,
    )
}

/// Build the planner stage on top of the location and guide results
pub fn planner_stage(
    request: &TripRequest,
    location: StageResult,
    guide: StageResult,
    output_dir: &Path,
) -> StageSpec {
    let description = format!(
        "
        Create a complete travel plan for {destination} based on previous agent outputs.
        Include:
        - Introduction (4 short paras)
        - Budget breakdown
        - Daily plan with timing
        - Transport and booking tips
        Interests: {interests}, Dates: {from} to {to}
        ",
        destination = request.destination,
        interests = request.interests,
        from = request.start_date,
        to = request.end_date,
    );

    stage_spec(
        StageKind::Planner,
        description,
        "Full travel itinerary in Markdown format.",
        vec![location, guide],
        output_dir,
    )
}

fn stage_spec(
    kind: StageKind,
    description: String,
    expected_output: &str,
    context: Vec<StageResult>,
    output_dir: &Path,
) -> StageSpec {
    StageSpec {
        kind,
        agent: agent_profile(kind),
        description,
        expected_output: expected_output.to_string(),
        context,
        output_path: output_dir.join(kind.output_file_name()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn request() -> TripRequest {
        TripRequest::new(
            "India",
            "Rome",
            NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 5, 7).unwrap(),
            "Sightseeing, food, and local culture",
        )
    }

    #[test]
    fn test_location_stage_interpolates_parameters() {
        let spec = location_stage(&request(), Path::new("out"));
        assert_eq!(spec.kind, StageKind::Location);
        assert!(spec.description.contains("travel information for Rome"));
        assert!(spec.description.contains("Dates: 2025-05-01 to 2025-05-07"));
        assert!(spec.context.is_empty());
        assert_eq!(spec.output_path, Path::new("out").join("city_report.md"));
        assert_eq!(spec.agent.role, "Travel Trip Expert");
    }

    #[test]
    fn test_guide_stage_includes_interests() {
        let spec = guide_stage(&request(), Path::new("."));
        assert!(spec.description.contains("tailored to: Sightseeing, food, and local culture."));
        assert_eq!(
            spec.expected_output,
            "Markdown with interactive places, events, food, attractions."
        );
    }

    #[test]
    fn test_planner_stage_context_order() {
        let spec = planner_stage(
            &request(),
            StageResult::new(StageKind::Location, "city"),
            StageResult::new(StageKind::Guide, "guide"),
            Path::new("."),
        );
        let stages: Vec<StageKind> = spec.context.iter().map(|r| r.stage).collect();
        assert_eq!(stages, vec![StageKind::Location, StageKind::Guide]);
        assert!(spec.description.contains("Budget breakdown"));
    }

    #[test]
    fn test_empty_interests_pass_through() {
        let mut request = request();
        request.interests = String::new();
        let spec = guide_stage(&request, Path::new("."));
        assert!(spec.description.contains("tailored to: ."));
    }
}
