//! Single-Entity Summaries
//!
//! Point lookups for one institution or one program in one reporting year.
//! Zero matching rows for an institution is a not-found fault, never an
//! empty-object success.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::{self, SqlParam};
use crate::handlers::ranking::ValueAddedRow;
use crate::handlers::{non_empty, require_year};
use crate::query::filter::FilterComposer;
use crate::server::{ApiError, AppState};

// ── Institution ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct InstitutionSummaryParams {
    year: Option<String>,
    name: Option<String>,
    region: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct InstitutionSummaryRow {
    pub year: i32,
    pub institution_name: String,
    pub region: Option<String>,
    pub student_count: Option<i64>,
    pub overall_score: Option<f64>,
    pub reading_score: Option<f64>,
    pub math_score: Option<f64>,
    pub social_score: Option<f64>,
    pub science_score: Option<f64>,
    pub english_score: Option<f64>,
    pub overall_sd: Option<f64>,
    pub overall_p50: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct CompetencyMeans {
    pub reading: Option<f64>,
    pub math: Option<f64>,
    pub social_studies: Option<f64>,
    pub natural_sciences: Option<f64>,
    pub english: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ScoreSpread {
    pub overall_sd: Option<f64>,
    pub overall_p50: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct InstitutionSummaryResponse {
    pub year: i32,
    pub name: String,
    pub region: Option<String>,
    pub student_count: Option<i64>,
    pub overall: Option<f64>,
    pub competencies: CompetencyMeans,
    pub spread: ScoreSpread,
}

pub fn institution_summary_query(
    year: i32,
    name: &str,
    region: Option<&str>,
) -> (String, Vec<SqlParam>) {
    let mut filters = FilterComposer::new();
    filters.eq("year", SqlParam::Int(year));
    filters.eq("institution_name", SqlParam::Text(name.to_string()));
    filters.opt_eq("region", region);

    let sql = format!(
        "SELECT year, institution_name, region, student_count, overall_score, reading_score, \
         math_score, social_score, science_score, english_score, overall_sd, overall_p50 \
         FROM institution_scores {} LIMIT 1",
        filters.where_sql(),
    );
    // Single-row lookup: the LIMIT is static, nothing to clamp.
    (sql, filters.into_filter_params())
}

pub async fn institution(
    State(state): State<AppState>,
    Query(params): Query<InstitutionSummaryParams>,
) -> Result<Json<InstitutionSummaryResponse>, ApiError> {
    let year = require_year(&params.year)?;
    let name = non_empty(&params.name).ok_or(ApiError::MissingParam("name"))?;
    let region = non_empty(&params.region);

    let (sql, bound) = institution_summary_query(year, name, region);
    let row: InstitutionSummaryRow = db::fetch_optional_as(&state.pool, &sql, &bound)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("no institution named {name} for year {year}"))
        })?;

    Ok(Json(InstitutionSummaryResponse {
        year,
        name: row.institution_name,
        region: row.region,
        student_count: row.student_count,
        overall: row.overall_score,
        competencies: CompetencyMeans {
            reading: row.reading_score,
            math: row.math_score,
            social_studies: row.social_score,
            natural_sciences: row.science_score,
            english: row.english_score,
        },
        spread: ScoreSpread {
            overall_sd: row.overall_sd,
            overall_p50: row.overall_p50,
        },
    }))
}

// ── Program ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ProgramSummaryParams {
    year: Option<String>,
    program_id: Option<String>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ProgramDescriptiveRow {
    pub year: i32,
    pub program_id: String,
    pub institution_name: Option<String>,
    pub region_key: Option<String>,
    pub student_count: Option<i64>,
    pub overall_score: Option<f64>,
    pub overall_sd: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ProgramSummaryResponse {
    pub year: i32,
    pub program_id: String,
    /// Descriptive aggregate; null when the program has no EDA record.
    pub descriptive: Option<ProgramDescriptiveRow>,
    /// Value-added record; null when the program was never modeled.
    pub value_added: Option<ValueAddedRow>,
}

pub fn program_descriptive_query(year: i32, program_id: &str) -> (String, Vec<SqlParam>) {
    (
        "SELECT year, program_id, institution_name, region_key, student_count, overall_score, \
         overall_sd FROM program_scores WHERE year = $1 AND program_id = $2 LIMIT 1"
            .to_string(),
        vec![SqlParam::Int(year), SqlParam::Text(program_id.to_string())],
    )
}

pub fn program_value_added_query(year: i32, program_id: &str) -> (String, Vec<SqlParam>) {
    (
        "SELECT year, program_id, program_name, institution_name, region_key, sample_size, \
         value_added_mean, value_added_sd, ci95_lower, ci95_upper, observed_mean, predicted_mean \
         FROM program_value_added WHERE year = $1 AND program_id = $2 LIMIT 1"
            .to_string(),
        vec![SqlParam::Int(year), SqlParam::Text(program_id.to_string())],
    )
}

pub async fn program(
    State(state): State<AppState>,
    Query(params): Query<ProgramSummaryParams>,
) -> Result<Json<ProgramSummaryResponse>, ApiError> {
    let year = require_year(&params.year)?;
    let program_id = non_empty(&params.program_id).ok_or(ApiError::MissingParam("program_id"))?;

    let (eda_sql, eda_params) = program_descriptive_query(year, program_id);
    let descriptive: Option<ProgramDescriptiveRow> =
        db::fetch_optional_as(&state.pool, &eda_sql, &eda_params).await?;

    let (va_sql, va_params) = program_value_added_query(year, program_id);
    let value_added: Option<ValueAddedRow> =
        db::fetch_optional_as(&state.pool, &va_sql, &va_params).await?;

    Ok(Json(ProgramSummaryResponse {
        year,
        program_id: program_id.to_string(),
        descriptive,
        value_added,
    }))
}
