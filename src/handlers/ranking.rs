//! Ranking Endpoints
//!
//! Four variants over the same composition pipeline: anchor year first,
//! optional equality filters in canonical order, whitelisted ORDER BY text,
//! clamped LIMIT bound last. Each handler only decides which table to read,
//! which columns to project, and how to shape the envelope.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::{self, SqlParam};
use crate::handlers::{non_empty, parse_limit, require_year};
use crate::query::filter::FilterComposer;
use crate::query::limit;
use crate::query::sort::{CompetencyMetric, InstitutionSortColumn, SortDirection};
use crate::server::{ApiError, AppState};

// ── Institutions ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct InstitutionRankingParams {
    year: Option<String>,
    region: Option<String>,
    limit: Option<String>,
    sort_by: Option<String>,
    direction: Option<String>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct InstitutionRow {
    pub year: i32,
    pub institution_name: String,
    pub region: Option<String>,
    pub overall_score: Option<f64>,
    pub reading_score: Option<f64>,
    pub math_score: Option<f64>,
    pub social_score: Option<f64>,
    pub science_score: Option<f64>,
    pub english_score: Option<f64>,
    pub overall_sd: Option<f64>,
    pub student_count: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct InstitutionRankingResponse {
    pub year: i32,
    pub region: Option<String>,
    pub sort_by: &'static str,
    pub direction: &'static str,
    pub items: Vec<InstitutionRow>,
}

pub fn institution_ranking_query(
    year: i32,
    region: Option<&str>,
    sort: InstitutionSortColumn,
    direction: SortDirection,
    limit: i64,
) -> (String, Vec<SqlParam>) {
    let mut filters = FilterComposer::new();
    filters.eq("year", SqlParam::Int(year));
    filters.opt_eq("region", region);

    let sql = format!(
        "SELECT year, institution_name, region, overall_score, reading_score, math_score, \
         social_score, science_score, english_score, overall_sd, student_count \
         FROM institution_scores {} ORDER BY {} {} LIMIT {}",
        filters.where_sql(),
        sort.as_sql(),
        direction.as_sql(),
        filters.limit_placeholder(),
    );
    (sql, filters.into_params(limit))
}

pub async fn institutions(
    State(state): State<AppState>,
    Query(params): Query<InstitutionRankingParams>,
) -> Result<Json<InstitutionRankingResponse>, ApiError> {
    let year = require_year(&params.year)?;
    let region = non_empty(&params.region);
    let sort = InstitutionSortColumn::from_token(non_empty(&params.sort_by));
    let direction = SortDirection::from_token(non_empty(&params.direction));
    let limit = limit::RANK_INSTITUTIONS.clamp(parse_limit(&params.limit));

    let (sql, bound) = institution_ranking_query(year, region, sort, direction, limit);
    let items: Vec<InstitutionRow> = db::fetch_all_as(&state.pool, &sql, &bound).await?;

    Ok(Json(InstitutionRankingResponse {
        year,
        region: region.map(str::to_string),
        sort_by: sort.as_token(),
        direction: direction.as_token(),
        items,
    }))
}

// ── Programs ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ProgramRankingParams {
    year: Option<String>,
    region: Option<String>,
    institution: Option<String>,
    origin: Option<String>,
    character: Option<String>,
    limit: Option<String>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ProgramRow {
    pub year: i32,
    pub institution_name: String,
    pub program_id: String,
    pub region_key: Option<String>,
    pub region_presented: Option<String>,
    pub origin: Option<String>,
    pub academic_character: Option<String>,
    pub overall_score: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ProgramRankingResponse {
    pub year: i32,
    pub criterion: &'static str,
    pub source: &'static str,
    pub items: Vec<ProgramRow>,
}

/// Program-level filters in their canonical order. Up to four optional
/// predicates can be present simultaneously.
pub fn program_filters(
    year: i32,
    region: Option<&str>,
    institution: Option<&str>,
    origin: Option<&str>,
    character: Option<&str>,
) -> FilterComposer {
    let mut filters = FilterComposer::new();
    filters.eq("year", SqlParam::Int(year));
    filters.opt_eq("region_key", region);
    filters.opt_eq("institution_name", institution);
    filters.opt_eq("origin", origin);
    filters.opt_eq("academic_character", character);
    filters
}

pub fn program_ranking_query(filters: FilterComposer, limit: i64) -> (String, Vec<SqlParam>) {
    let sql = format!(
        "SELECT year, institution_name, program_id, region_key, region_presented, origin, \
         academic_character, overall_score \
         FROM program_results_raw {} ORDER BY overall_score DESC NULLS LAST LIMIT {}",
        filters.where_sql(),
        filters.limit_placeholder(),
    );
    (sql, filters.into_params(limit))
}

pub async fn programs(
    State(state): State<AppState>,
    Query(params): Query<ProgramRankingParams>,
) -> Result<Json<ProgramRankingResponse>, ApiError> {
    let year = require_year(&params.year)?;
    let limit = limit::RANK_PROGRAMS.clamp(parse_limit(&params.limit));

    let filters = program_filters(
        year,
        non_empty(&params.region),
        non_empty(&params.institution),
        non_empty(&params.origin),
        non_empty(&params.character),
    );
    let (sql, bound) = program_ranking_query(filters, limit);
    let items: Vec<ProgramRow> = db::fetch_all_as(&state.pool, &sql, &bound).await?;

    Ok(Json(ProgramRankingResponse {
        year,
        criterion: "overall_score",
        source: "program_results_raw",
        items,
    }))
}

// ── Regional competencies ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CompetencyRankingParams {
    year: Option<String>,
    competency: Option<String>,
    limit: Option<String>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct CompetencyRow {
    pub year: i32,
    pub region: Option<String>,
    pub region_id: Option<String>,
    pub avg_reading: Option<f64>,
    pub avg_math: Option<f64>,
    pub avg_social: Option<f64>,
    pub avg_science: Option<f64>,
    pub avg_english: Option<f64>,
    /// Display fallback filled in after the fetch: region, else region id.
    #[sqlx(default)]
    pub region_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CompetencyRankingResponse {
    pub year: i32,
    pub competency: &'static str,
    pub items: Vec<CompetencyRow>,
}

pub fn competency_ranking_query(
    year: i32,
    metric: CompetencyMetric,
    limit: i64,
) -> (String, Vec<SqlParam>) {
    let mut filters = FilterComposer::new();
    filters.eq("year", SqlParam::Int(year));

    let sql = format!(
        "SELECT year, region, region_id, avg_reading, avg_math, avg_social, avg_science, \
         avg_english FROM region_competency_baseline {} ORDER BY {} DESC LIMIT {}",
        filters.where_sql(),
        metric.as_sql(),
        filters.limit_placeholder(),
    );
    (sql, filters.into_params(limit))
}

pub async fn competencies(
    State(state): State<AppState>,
    Query(params): Query<CompetencyRankingParams>,
) -> Result<Json<CompetencyRankingResponse>, ApiError> {
    let year = require_year(&params.year)?;
    let metric = CompetencyMetric::from_token(non_empty(&params.competency));
    let limit = limit::RANK_COMPETENCIES.clamp(parse_limit(&params.limit));

    let (sql, bound) = competency_ranking_query(year, metric, limit);
    let mut items: Vec<CompetencyRow> = db::fetch_all_as(&state.pool, &sql, &bound).await?;
    for item in &mut items {
        item.region_name = item.region.clone().or_else(|| item.region_id.clone());
    }

    Ok(Json(CompetencyRankingResponse {
        year,
        competency: metric.as_token(),
        items,
    }))
}

// ── Value-added ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ValueAddedRankingParams {
    year: Option<String>,
    region: Option<String>,
    institution: Option<String>,
    program_id: Option<String>,
    limit: Option<String>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ValueAddedRow {
    pub year: i32,
    pub program_id: String,
    pub program_name: Option<String>,
    pub institution_name: Option<String>,
    pub region_key: Option<String>,
    pub sample_size: Option<i64>,
    pub value_added_mean: Option<f64>,
    pub value_added_sd: Option<f64>,
    pub ci95_lower: Option<f64>,
    pub ci95_upper: Option<f64>,
    pub observed_mean: Option<f64>,
    pub predicted_mean: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ValueAddedRankingResponse {
    pub year: i32,
    pub criterion: &'static str,
    pub source: &'static str,
    pub total: usize,
    pub items: Vec<ValueAddedRow>,
}

pub fn value_added_ranking_query(
    year: i32,
    region: Option<&str>,
    institution: Option<&str>,
    program_id: Option<&str>,
    limit: i64,
) -> (String, Vec<SqlParam>) {
    let mut filters = FilterComposer::new();
    filters.eq("year", SqlParam::Int(year));
    filters.opt_eq("region_key", region);
    filters.opt_eq("institution_name", institution);
    filters.opt_eq("program_id", program_id);

    // Secondary key keeps ordering deterministic among equal or null means.
    let sql = format!(
        "SELECT year, program_id, program_name, institution_name, region_key, sample_size, \
         value_added_mean, value_added_sd, ci95_lower, ci95_upper, observed_mean, predicted_mean \
         FROM program_value_added {} \
         ORDER BY value_added_mean DESC NULLS LAST, program_id ASC LIMIT {}",
        filters.where_sql(),
        filters.limit_placeholder(),
    );
    (sql, filters.into_params(limit))
}

pub async fn value_added(
    State(state): State<AppState>,
    Query(params): Query<ValueAddedRankingParams>,
) -> Result<Json<ValueAddedRankingResponse>, ApiError> {
    let year = require_year(&params.year)?;
    let limit = limit::RANK_VALUE_ADDED.clamp(parse_limit(&params.limit));

    let (sql, bound) = value_added_ranking_query(
        year,
        non_empty(&params.region),
        non_empty(&params.institution),
        non_empty(&params.program_id),
        limit,
    );
    let items: Vec<ValueAddedRow> = db::fetch_all_as(&state.pool, &sql, &bound).await?;

    Ok(Json(ValueAddedRankingResponse {
        year,
        criterion: "value_added_mean",
        source: "program_value_added",
        total: items.len(),
        items,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_institution_query_anchored_and_ordered() {
        let (sql, params) = institution_ranking_query(
            20191,
            None,
            InstitutionSortColumn::OverallScore,
            SortDirection::Desc,
            3,
        );
        assert!(sql.contains("WHERE year = $1"));
        assert!(sql.contains("ORDER BY overall_score DESC"));
        assert!(sql.ends_with("LIMIT $2"));
        assert_eq!(params, vec![SqlParam::Int(20191), SqlParam::BigInt(3)]);
    }

    #[test]
    fn test_program_filters_year_plus_region_yields_two_conditions() {
        let filters = program_filters(2024, Some("PASTO"), None, None, None);
        assert_eq!(filters.condition_count(), 2);
        assert_eq!(filters.param_count(), 2);

        let (sql, params) = program_ranking_query(filters, 50);
        assert!(sql.contains("WHERE year = $1 AND region_key = $2"));
        assert!(sql.ends_with("LIMIT $3"));
        assert_eq!(
            params,
            vec![
                SqlParam::Int(2024),
                SqlParam::Text("PASTO".to_string()),
                SqlParam::BigInt(50),
            ]
        );
    }

    #[test]
    fn test_program_filters_all_four_optionals_present() {
        let filters = program_filters(
            2024,
            Some("PASTO"),
            Some("UNIVERSIDAD DE NARINO"),
            Some("OFICIAL"),
            Some("UNIVERSIDAD"),
        );
        assert_eq!(filters.condition_count(), 5);
        assert_eq!(filters.param_count(), 5);
    }

    #[test]
    fn test_competency_query_uses_whitelisted_metric_column() {
        let (sql, _) = competency_ranking_query(2024, CompetencyMetric::Math, 20);
        assert!(sql.contains("ORDER BY avg_math DESC"));
    }

    #[test]
    fn test_value_added_query_nulls_last_with_stable_tiebreak() {
        let (sql, params) = value_added_ranking_query(2024, None, None, Some("P123"), 50);
        assert!(sql.contains("ORDER BY value_added_mean DESC NULLS LAST, program_id ASC"));
        assert!(sql.contains("WHERE year = $1 AND program_id = $2"));
        assert_eq!(params.len(), 3);
        assert_eq!(params.last(), Some(&SqlParam::BigInt(50)));
    }
}
