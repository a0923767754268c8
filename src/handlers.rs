use crate::analysis::{analyze, request_from_form};
use crate::chart::render_chart;
use crate::errors::{AnalysisError, AppError};
use crate::models::{Analysis, AnalysisRequest, AnalyzeForm, FormDefaults};
use crate::state::AppState;
use crate::ui::{render_index, Outcome};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{Html, IntoResponse},
    Form, Json,
};
use chrono::Local;
use tracing::{info, warn};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let form = AnalyzeForm::from(defaults(&state));
    Html(render_index(&form, Outcome::Idle))
}

pub async fn get_defaults(State(state): State<AppState>) -> Json<FormDefaults> {
    Json(defaults(&state))
}

/// Form post from the page. Pipeline failures are shown next to the inputs,
/// so this always answers with the page.
pub async fn analyze_form(Form(form): Form<AnalyzeForm>) -> Html<String> {
    let result = request_from_form(&form).and_then(|request| run_analysis(&request));
    let outcome = match &result {
        Ok(analysis) => Outcome::Rendered(analysis),
        Err(err) => Outcome::Rejected(err),
    };
    Html(render_index(&form, outcome))
}

pub async fn analyze_json(
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Json<Analysis>, AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    Ok(Json(run_analysis(&request)?))
}

pub async fn chart_svg(
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    let analysis = run_analysis(&request)?;
    Ok((
        [(header::CONTENT_TYPE, "image/svg+xml")],
        render_chart(&analysis),
    ))
}

fn run_analysis(request: &AnalysisRequest) -> Result<Analysis, AnalysisError> {
    match analyze(request) {
        Ok(analysis) => {
            info!(
                start = %request.start_date,
                end = %analysis.adjusted_end_date,
                weeks = analysis.rows.len(),
                "analysis complete"
            );
            Ok(analysis)
        }
        Err(err) => {
            warn!(kind = err.kind(), "analysis rejected: {err}");
            Err(err)
        }
    }
}

fn defaults(state: &AppState) -> FormDefaults {
    state.config.form_defaults(Local::now().date_naive())
}
