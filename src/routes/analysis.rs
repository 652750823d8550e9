use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::analysis::{analyze_frames, AnalysisConfig, FrameSnapshot, PoseType};
use crate::extractors::JsonBody;
use crate::response::{ok, AppError};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(analyze))
        .route("/config", get(default_config))
        .route("/poses", get(list_poses))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub source: Option<String>,
    pub frames: Vec<FrameSnapshot>,
    /// Partial overrides merged onto the server defaults.
    #[serde(default)]
    pub config: Option<Value>,
}

async fn analyze(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<AnalyzeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let max_frames = state.config().limits.max_frames_per_request;
    if req.frames.len() > max_frames {
        return Err(AppError::payload_too_large(&format!(
            "At most {max_frames} frames may be submitted per request"
        )));
    }

    let config = resolve_config(state.analysis_defaults(), req.config)?;
    let frame_count = req.frames.len();
    let source = req.source;

    tracing::info!(frames = frame_count, source = ?source, "Analysis requested");

    let permit = state
        .analysis_slots()
        .clone()
        .acquire_owned()
        .await
        .map_err(|_| AppError::internal("Analysis slots closed"))?;

    let frames = req.frames;
    let outcome = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        analyze_frames(frames, &config, source)
    })
    .await
    .map_err(|e| {
        state.stats().record_failure();
        AppError::internal(&format!("Analysis task failed: {e}"))
    })?;

    match outcome {
        Ok(report) => {
            state.stats().record_success(report.total_frames);
            Ok(ok(report))
        }
        Err(e) => {
            state.stats().record_failure();
            Err(AppError::from(e))
        }
    }
}

async fn default_config(State(state): State<AppState>) -> impl IntoResponse {
    ok(state.analysis_defaults().clone())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PoseInfo {
    pose: PoseType,
    description: &'static str,
}

fn describe(pose: PoseType) -> &'static str {
    match pose {
        PoseType::HandsUp => "Both wrists raised above their shoulders",
        PoseType::TPose => "Both arms straight and extended sideways at shoulder height",
        PoseType::Squat => "Both knees flexed with an upright torso",
        PoseType::StepForward => "Feet set wider apart than the torso is tall",
        PoseType::LegRaise => "One ankle lifted above the opposite hip",
        PoseType::Rotation => "Shoulder line turned away from its recent orientation",
    }
}

async fn list_poses() -> impl IntoResponse {
    let poses: Vec<PoseInfo> = PoseType::ALL
        .into_iter()
        .map(|pose| PoseInfo {
            pose,
            description: describe(pose),
        })
        .collect();
    ok(poses)
}

fn resolve_config(
    defaults: &AnalysisConfig,
    overrides: Option<Value>,
) -> Result<AnalysisConfig, AppError> {
    let config = match overrides {
        None | Some(Value::Null) => defaults.clone(),
        Some(patch) => {
            if !patch.is_object() {
                return Err(AppError::bad_request(
                    "INVALID_CONFIG",
                    "config must be a JSON object",
                ));
            }
            let mut merged = serde_json::to_value(defaults)
                .map_err(|e| AppError::internal(&format!("Failed to encode defaults: {e}")))?;
            merge_json(&mut merged, patch);
            serde_json::from_value::<AnalysisConfig>(merged)
                .map_err(|e| AppError::bad_request("INVALID_CONFIG", &e.to_string()))?
        }
    };
    config.validate()?;
    Ok(config)
}

fn merge_json(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                merge_json(base.entry(key).or_insert(Value::Null), value);
            }
        }
        (slot, patch) => *slot = patch,
    }
}
