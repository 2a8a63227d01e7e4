use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::models::{TravelPlan, TripRequest};
use crate::render::{render_markdown_file, PageLayout};

/// Files handed to the user after a successful run
#[derive(Debug, Clone)]
pub struct Deliverables {
    /// Plain-text copy of the itinerary, always present
    pub text_path: PathBuf,
    /// Paginated PDF, when rendering was requested and succeeded
    pub pdf_path: Option<PathBuf>,
    /// Why the PDF is missing or incomplete
    pub warning: Option<String>,
}

/// Final Markdown file for a destination, e.g. `travel_plan_Rome.md`
pub fn final_markdown_path(output_dir: &Path, request: &TripRequest) -> PathBuf {
    output_dir.join(format!("travel_plan_{}.md", request.destination_slug()))
}

/// Plain-text download, e.g. `Travel_Plan_Rome.txt`
pub fn text_download_path(output_dir: &Path, request: &TripRequest) -> PathBuf {
    output_dir.join(format!("Travel_Plan_{}.txt", request.destination_slug()))
}

/// PDF download, e.g. `Travel_Plan_Rome.pdf`
pub fn pdf_download_path(output_dir: &Path, request: &TripRequest) -> PathBuf {
    output_dir.join(format!("Travel_Plan_{}.pdf", request.destination_slug()))
}

/// Write `text` to `path` exactly as given, creating parent directories
pub fn write_text(path: &Path, text: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, text)
}

/// Write the plain-text download, then try the PDF.
///
/// A rendering failure is reported through `Deliverables::warning`; only a failure
/// to write the text file is an error.
pub fn write_deliverables(
    plan: &TravelPlan,
    output_dir: &Path,
    render_pdf: bool,
    layout: &PageLayout,
) -> std::io::Result<Deliverables> {
    let text_path = text_download_path(output_dir, &plan.request);
    write_text(&text_path, plan.text())?;
    info!("Text download written to {:?}", text_path);

    let mut deliverables = Deliverables {
        text_path,
        pdf_path: None,
        warning: None,
    };
    if !render_pdf {
        return Ok(deliverables);
    }

    let pdf_path = pdf_download_path(output_dir, &plan.request);
    match render_markdown_file(&plan.markdown_path, &pdf_path, layout) {
        Ok(rendered) => {
            if rendered.replaced_chars > 0 {
                deliverables.warning = Some(format!(
                    "PDF shows {} unsupported characters as '?'; the text download is complete",
                    rendered.replaced_chars
                ));
            }
            deliverables.pdf_path = Some(rendered.path);
        }
        Err(e) => {
            let message = format!("PDF creation failed: {:#}", anyhow::Error::from(e));
            warn!("{}", message);
            deliverables.warning = Some(message);
        }
    }

    Ok(deliverables)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use uuid::Uuid;

    use super::*;
    use crate::models::{StageKind, StageResult};

    fn request(destination: &str) -> TripRequest {
        let day = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        TripRequest::new("Oslo", destination, day, day, "museums")
    }

    #[test]
    fn test_artifact_names() {
        let dir = Path::new("plans");
        let request = request("Rome");
        assert_eq!(final_markdown_path(dir, &request), dir.join("travel_plan_Rome.md"));
        assert_eq!(text_download_path(dir, &request), dir.join("Travel_Plan_Rome.txt"));
        assert_eq!(pdf_download_path(dir, &request), dir.join("Travel_Plan_Rome.pdf"));
    }

    #[test]
    fn test_write_text_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("plan.md");
        write_text(&path, "# Plan\r\n\nünïcode").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Plan\r\n\nünïcode");
    }

    fn plan(output_dir: &Path, markdown_path: PathBuf) -> TravelPlan {
        let text = "# Rome\n\nDay 1: Colosseum\n";
        write_text(&markdown_path, text).unwrap();
        TravelPlan {
            run_id: Uuid::new_v4(),
            request: request("Rome"),
            stages: vec![StageResult::new(StageKind::Planner, text)],
            stage_paths: vec![output_dir.join("travel_plan.md")],
            markdown_path,
        }
    }

    #[test]
    fn test_deliverables_with_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let plan = plan(dir.path(), dir.path().join("travel_plan_Rome.md"));

        let out = write_deliverables(&plan, dir.path(), true, &PageLayout::default()).unwrap();

        assert_eq!(std::fs::read_to_string(&out.text_path).unwrap(), plan.text());
        assert_eq!(out.pdf_path, Some(dir.path().join("Travel_Plan_Rome.pdf")));
        assert!(out.warning.is_none());
    }

    #[test]
    fn test_deliverables_skip_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let plan = plan(dir.path(), dir.path().join("travel_plan_Rome.md"));

        let out = write_deliverables(&plan, dir.path(), false, &PageLayout::default()).unwrap();

        assert!(out.text_path.exists());
        assert!(out.pdf_path.is_none());
        assert!(!dir.path().join("Travel_Plan_Rome.pdf").exists());
    }

    #[test]
    fn test_unsupported_characters_are_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let mut plan = plan(dir.path(), dir.path().join("travel_plan_Rome.md"));
        let text = "# 東京\n\nSushi 🍣\n";
        write_text(&plan.markdown_path, text).unwrap();
        plan.stages = vec![StageResult::new(StageKind::Planner, text)];

        let out = write_deliverables(&plan, dir.path(), true, &PageLayout::default()).unwrap();

        assert_eq!(std::fs::read_to_string(&out.text_path).unwrap(), text);
        assert!(out.pdf_path.is_some());
        assert!(out.warning.unwrap().contains("3 unsupported characters"));
    }

    #[test]
    fn test_render_failure_is_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let mut plan = plan(dir.path(), dir.path().join("travel_plan_Rome.md"));
        plan.markdown_path = dir.path().join("deleted.md");

        let out = write_deliverables(&plan, dir.path(), true, &PageLayout::default()).unwrap();

        assert_eq!(std::fs::read_to_string(&out.text_path).unwrap(), plan.text());
        assert!(out.pdf_path.is_none());
        assert!(out.warning.unwrap().starts_with("PDF creation failed"));
    }
}
