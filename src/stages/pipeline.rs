use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use super::executor::StageExecutor;
use super::tasks::{guide_stage, location_stage, planner_stage};
use crate::errors::PipelineError;
use crate::io::{final_markdown_path, write_text};
use crate::models::{StageResult, StageSpec, TravelPlan, TripRequest};

/// Configuration for a planning run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory receiving the stage and final Markdown files
    pub output_dir: PathBuf,
    /// Run the location and guide stages concurrently before the planner
    pub concurrent_research: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            concurrent_research: false,
        }
    }
}

/// Where a run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Start,
    Location,
    Guide,
    Planner,
    Done,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Start => "START",
            PipelineState::Location => "LOCATION_STAGE",
            PipelineState::Guide => "GUIDE_STAGE",
            PipelineState::Planner => "PLANNER_STAGE",
            PipelineState::Done => "DONE",
        };
        f.write_str(name)
    }
}

/// Run location, guide and planner stages and persist the results
///
/// The planner only starts once both research stages have produced text, and
/// receives them as context in that order. Files are written only after all
/// three stages succeed, and a failed write removes the files already written,
/// so a failed run leaves nothing behind.
pub async fn run_pipeline<E>(
    executor: &E,
    request: &TripRequest,
    config: &PipelineConfig,
) -> Result<TravelPlan, PipelineError>
where
    E: StageExecutor + ?Sized,
{
    let run_id = Uuid::new_v4();
    let span = info_span!("pipeline", %run_id, destination = %request.destination);

    async move {
        let mut state = PipelineState::Start;
        info!("Planning trip {} -> {}", request.origin, request.destination);

        let location_spec = location_stage(request, &config.output_dir);
        let guide_spec = guide_stage(request, &config.output_dir);

        let (location, guide) = if config.concurrent_research {
            info!(
                "{} -> {} + {} (concurrent)",
                state,
                PipelineState::Location,
                PipelineState::Guide
            );
            state = PipelineState::Guide;
            tokio::try_join!(
                run_stage(executor, &location_spec),
                run_stage(executor, &guide_spec)
            )?
        } else {
            state = transition(state, PipelineState::Location);
            let location = run_stage(executor, &location_spec).await?;
            state = transition(state, PipelineState::Guide);
            let guide = run_stage(executor, &guide_spec).await?;
            (location, guide)
        };

        state = transition(state, PipelineState::Planner);
        let planner_spec =
            planner_stage(request, location.clone(), guide.clone(), &config.output_dir);
        let planner = run_stage(executor, &planner_spec).await?;

        let markdown_path = final_markdown_path(&config.output_dir, request);
        let stage_paths = vec![
            location_spec.output_path,
            guide_spec.output_path,
            planner_spec.output_path,
        ];
        let stages = vec![location, guide, planner];

        let mut files: Vec<(&Path, &str)> = stage_paths
            .iter()
            .zip(&stages)
            .map(|(path, result)| (path.as_path(), result.text.as_str()))
            .collect();
        files.push((&markdown_path, &stages[2].text));
        persist_all(&files)?;
        info!("Travel plan written to {:?}", markdown_path);

        transition(state, PipelineState::Done);

        Ok::<_, PipelineError>(TravelPlan {
            run_id,
            request: request.clone(),
            stages,
            stage_paths,
            markdown_path,
        })
    }
    .instrument(span)
    .await
}

fn transition(from: PipelineState, to: PipelineState) -> PipelineState {
    info!("{} -> {}", from, to);
    to
}

async fn run_stage<E>(executor: &E, spec: &StageSpec) -> Result<StageResult, PipelineError>
where
    E: StageExecutor + ?Sized,
{
    info!("Running {} stage ({})", spec.kind, spec.agent.role);
    let text = executor
        .execute(spec)
        .await
        .map_err(|source| PipelineError::Stage {
            stage: spec.kind,
            source,
        })?;
    info!("{} stage produced {} chars", spec.kind, text.len());

    Ok(StageResult::new(spec.kind, text))
}

/// Write every file or none of them
fn persist_all(files: &[(&Path, &str)]) -> Result<(), PipelineError> {
    for (index, (path, text)) in files.iter().enumerate() {
        if let Err(source) = write_text(path, text) {
            for (written, _) in &files[..index] {
                if let Err(e) = std::fs::remove_file(written) {
                    warn!("Could not remove {:?} after failed write: {}", written, e);
                }
            }
            return Err(PipelineError::Persist {
                path: path.to_path_buf(),
                source,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::StageKind;
    use crate::stages::executor::mock::RecordingExecutor;

    fn request() -> TripRequest {
        TripRequest::new(
            "India",
            "Rome",
            NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 5, 7).unwrap(),
            "Sightseeing, food, and local culture",
        )
    }

    fn config(dir: &Path) -> PipelineConfig {
        PipelineConfig {
            output_dir: dir.to_path_buf(),
            ..Default::default()
        }
    }

    #[test]
    fn test_pipeline_config_default() {
        let config = PipelineConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert!(!config.concurrent_research);
    }

    #[tokio::test]
    async fn test_three_stages_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let executor = RecordingExecutor::new();

        run_pipeline(&executor, &request(), &config(dir.path())).await.unwrap();

        assert_eq!(executor.call_order(), StageKind::ORDER.to_vec());
    }

    #[tokio::test]
    async fn test_planner_receives_both_results() {
        let dir = tempfile::tempdir().unwrap();
        let executor = RecordingExecutor::new();

        run_pipeline(&executor, &request(), &config(dir.path())).await.unwrap();

        let calls = executor.calls.lock().unwrap();
        let planner = &calls[2];
        assert_eq!(
            planner.context,
            vec![
                StageResult::new(StageKind::Location, executor.reply(StageKind::Location)),
                StageResult::new(StageKind::Guide, executor.reply(StageKind::Guide)),
            ]
        );
        assert!(calls[0].context.is_empty());
        assert!(calls[1].context.is_empty());
    }

    #[tokio::test]
    async fn test_final_file_matches_returned_text() {
        let dir = tempfile::tempdir().unwrap();
        let executor = RecordingExecutor::new();

        let plan = run_pipeline(&executor, &request(), &config(dir.path())).await.unwrap();

        assert_eq!(plan.markdown_path, dir.path().join("travel_plan_Rome.md"));
        assert_eq!(plan.text(), executor.reply(StageKind::Planner));
        let on_disk = std::fs::read(&plan.markdown_path).unwrap();
        assert_eq!(on_disk, plan.text().as_bytes());
    }

    #[tokio::test]
    async fn test_stage_files_written() {
        let dir = tempfile::tempdir().unwrap();
        let executor = RecordingExecutor::new();

        let plan = run_pipeline(&executor, &request(), &config(dir.path())).await.unwrap();

        assert_eq!(plan.stage_paths.len(), 3);
        for (kind, path) in StageKind::ORDER.iter().zip(&plan.stage_paths) {
            assert_eq!(path, &dir.path().join(kind.output_file_name()));
            assert_eq!(std::fs::read_to_string(path).unwrap(), executor.reply(*kind));
        }
    }

    #[tokio::test]
    async fn test_stage_failure_writes_nothing() {
        for failing in StageKind::ORDER {
            let dir = tempfile::tempdir().unwrap();
            let executor = RecordingExecutor::failing_on(failing);

            let err = run_pipeline(&executor, &request(), &config(dir.path()))
                .await
                .unwrap_err();

            match err {
                PipelineError::Stage { stage, .. } => assert_eq!(stage, failing),
                other => panic!("unexpected error: {other}"),
            }
            assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
        }
    }

    #[tokio::test]
    async fn test_failed_research_stage_skips_planner() {
        let dir = tempfile::tempdir().unwrap();
        let executor = RecordingExecutor::failing_on(StageKind::Location);

        run_pipeline(&executor, &request(), &config(dir.path()))
            .await
            .unwrap_err();

        assert_eq!(executor.call_order(), vec![StageKind::Location]);
    }

    #[tokio::test]
    async fn test_concurrent_research_joins_before_planner() {
        let dir = tempfile::tempdir().unwrap();
        let executor = RecordingExecutor::new();
        let config = PipelineConfig {
            concurrent_research: true,
            ..config(dir.path())
        };

        let plan = run_pipeline(&executor, &request(), &config).await.unwrap();

        let order = executor.call_order();
        assert_eq!(order.len(), 3);
        assert_eq!(order[2], StageKind::Planner);
        let calls = executor.calls.lock().unwrap();
        let context: Vec<StageKind> = calls[2].context.iter().map(|r| r.stage).collect();
        assert_eq!(context, vec![StageKind::Location, StageKind::Guide]);
        assert_eq!(plan.text(), executor.reply(StageKind::Planner));
    }

    #[tokio::test]
    async fn test_failed_final_write_removes_stage_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("travel_plan_Rome.md")).unwrap();
        let executor = RecordingExecutor::new();

        let err = run_pipeline(&executor, &request(), &config(dir.path()))
            .await
            .unwrap_err();

        match err {
            PipelineError::Persist { path, .. } => {
                assert_eq!(path, dir.path().join("travel_plan_Rome.md"))
            }
            other => panic!("unexpected error: {other}"),
        }
        for kind in StageKind::ORDER {
            assert!(!dir.path().join(kind.output_file_name()).exists());
        }
    }

    #[tokio::test]
    async fn test_unwritable_output_dir_is_persist_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, "file").unwrap();
        let executor = RecordingExecutor::new();

        let err = run_pipeline(&executor, &request(), &config(&blocker))
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Persist { .. }));
    }
}
