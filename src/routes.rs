use crate::AppState;
use crate::normalize;
use crate::normalize::Analysis;
use crate::score::quality_score;
use askama::Template;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use log::error;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

fn get_default_language() -> String {
    "cpp".to_string()
}

#[derive(Template)]
#[template(path = "prompt.txt")]
struct PromptTemplate<'a> {
    request: &'a AnalysisRequest,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AnalysisRequest {
    pub code: String,
    #[serde(default = "get_default_language")]
    pub language: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AnalysisResult {
    pub time_complexity: String,
    pub space_complexity: String,
    pub errors: Vec<String>,
    pub suggestions: Vec<String>,
    pub optimized_code: String,
    pub quality_score: u8,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AnalysisErrorResponse {
    pub error: &'static str,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PingResponse {
    pub status: &'static str,
    pub message: &'static str,
}

impl AnalysisResult {
    fn from_analysis(analysis: Analysis) -> Self {
        let quality_score = quality_score(&analysis);
        AnalysisResult {
            time_complexity: analysis.time_complexity,
            space_complexity: analysis.space_complexity,
            errors: analysis.errors,
            suggestions: analysis.suggestions,
            optimized_code: analysis.optimized_code,
            quality_score,
        }
    }

    /// Downgrades an upstream or normalization failure into a
    /// renderable result. Callers of /analyze always receive the full
    /// result shape; only the diagnostic in `errors` tells them the
    /// analysis did not happen.
    fn from_failure(diagnostic: String, code: &str) -> Self {
        AnalysisResult {
            time_complexity: "Error".to_string(),
            space_complexity: "Error".to_string(),
            errors: vec![diagnostic],
            suggestions: vec![],
            optimized_code: code.to_string(),
            quality_score: 0,
        }
    }
}

#[utoipa::path(get, path = "/ping", responses((status = OK, body = PingResponse)), description = "Liveness check")]
pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        status: "success",
        message: "CodeRefine backend is running",
    })
}

#[utoipa::path(post, path = "/analyze", request_body = AnalysisRequest, responses((status = OK, body = AnalysisResult), (status = BAD_REQUEST, body = AnalysisErrorResponse), (status = UNPROCESSABLE_ENTITY)), description = "Analyze submitted code")]
#[axum::debug_handler]
pub async fn analyze(
    state: State<AppState>,
    body: Json<AnalysisRequest>,
) -> Result<Json<AnalysisResult>, (StatusCode, Json<AnalysisErrorResponse>)> {
    if body.code.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(AnalysisErrorResponse {
                error: "Code is empty",
            }),
        ));
    }

    let prompt = PromptTemplate { request: &body.0 }.render().unwrap();

    let raw = match state.llm.complete(&prompt).await {
        Ok(raw) => raw,
        Err(e) => {
            error!("error while requesting completion: {e}");
            return Ok(Json(AnalysisResult::from_failure(
                format!("Analysis failed: {e}"),
                &body.code,
            )));
        }
    };

    let analysis = match normalize::normalize(&raw, &body.code) {
        Ok(analysis) => analysis,
        Err(e) => {
            error!("error while normalizing model output: {e}");
            return Ok(Json(AnalysisResult::from_failure(
                format!("Analysis failed: {e}"),
                &body.code,
            )));
        }
    };

    Ok(Json(AnalysisResult::from_analysis(analysis)))
}
