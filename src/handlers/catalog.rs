//! Catalog Endpoints
//!
//! Distinct descriptive values for populating selection UIs: no numeric
//! payload, no anchor requirement. The source tables are denormalized, so
//! raw rows go through the normalizer before leaving the handler.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::{self, SqlParam};
use crate::handlers::{non_empty, opt_year, parse_limit};
use crate::normalize::{dedupe_sorted, CatalogKey};
use crate::query::filter::FilterComposer;
use crate::query::limit;
use crate::server::{ApiError, AppState};

// ── Regions ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegionCatalogParams {
    year: Option<String>,
    limit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct RegionEntry {
    pub region: String,
    pub year: i32,
}

impl CatalogKey for RegionEntry {
    type Key = (String, i32);

    fn key(&self) -> Self::Key {
        (self.region.clone(), self.year)
    }
}

pub fn region_catalog_query(year: Option<i32>, limit: i64) -> (String, Vec<SqlParam>) {
    let mut filters = FilterComposer::new();
    if let Some(y) = year {
        filters.eq("year", SqlParam::Int(y));
    }

    let sql = format!(
        "SELECT region, year FROM institution_scores WHERE region IS NOT NULL {} LIMIT {}",
        filters.and_sql(),
        filters.limit_placeholder(),
    );
    (sql, filters.into_params(limit))
}

pub async fn regions(
    State(state): State<AppState>,
    Query(params): Query<RegionCatalogParams>,
) -> Result<Json<Vec<RegionEntry>>, ApiError> {
    let year = opt_year(&params.year);
    let limit = limit::CATALOG_REGIONS.clamp(parse_limit(&params.limit));

    let (sql, bound) = region_catalog_query(year, limit);
    let rows: Vec<RegionEntry> = db::fetch_all_as(&state.pool, &sql, &bound).await?;

    Ok(Json(dedupe_sorted(rows)))
}

// ── Institutions ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct InstitutionCatalogParams {
    year: Option<String>,
    region: Option<String>,
    search: Option<String>,
    limit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct InstitutionEntry {
    pub institution_name: String,
    pub region: Option<String>,
    pub year: i32,
}

impl CatalogKey for InstitutionEntry {
    type Key = (String, Option<String>, i32);

    fn key(&self) -> Self::Key {
        (self.institution_name.clone(), self.region.clone(), self.year)
    }
}

pub fn institution_catalog_query(
    year: Option<i32>,
    region: Option<&str>,
    search: Option<&str>,
    limit: i64,
) -> (String, Vec<SqlParam>) {
    let mut filters = FilterComposer::new();
    if let Some(y) = year {
        filters.eq("year", SqlParam::Int(y));
    }
    filters.opt_eq("region", region);
    if let Some(term) = search {
        filters.contains("institution_name", term);
    }

    let sql = format!(
        "SELECT institution_name, region, year FROM institution_scores {} LIMIT {}",
        filters.where_sql(),
        filters.limit_placeholder(),
    );
    (sql, filters.into_params(limit))
}

pub async fn institutions(
    State(state): State<AppState>,
    Query(params): Query<InstitutionCatalogParams>,
) -> Result<Json<Vec<InstitutionEntry>>, ApiError> {
    let year = opt_year(&params.year);
    let limit = limit::CATALOG_INSTITUTIONS.clamp(parse_limit(&params.limit));

    let (sql, bound) = institution_catalog_query(
        year,
        non_empty(&params.region),
        non_empty(&params.search),
        limit,
    );
    let rows: Vec<InstitutionEntry> = db::fetch_all_as(&state.pool, &sql, &bound).await?;

    Ok(Json(dedupe_sorted(rows)))
}

// ── Programs ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ProgramCatalogParams {
    year: Option<String>,
    region: Option<String>,
    institution: Option<String>,
    origin: Option<String>,
    character: Option<String>,
    limit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct ProgramEntry {
    pub program_id: String,
    pub institution_name: String,
    pub year: i32,
}

impl CatalogKey for ProgramEntry {
    // Institution first: program catalogs list per-institution offerings.
    type Key = (String, String, i32);

    fn key(&self) -> Self::Key {
        (self.institution_name.clone(), self.program_id.clone(), self.year)
    }
}

pub fn program_catalog_query(
    year: Option<i32>,
    region: Option<&str>,
    institution: Option<&str>,
    origin: Option<&str>,
    character: Option<&str>,
    limit: i64,
) -> (String, Vec<SqlParam>) {
    let mut filters = FilterComposer::new();
    if let Some(y) = year {
        filters.eq("year", SqlParam::Int(y));
    }
    filters.opt_eq("region_key", region);
    filters.opt_eq("institution_name", institution);
    filters.opt_eq("origin", origin);
    filters.opt_eq("academic_character", character);

    let sql = format!(
        "SELECT DISTINCT program_id, institution_name, year FROM program_results_raw {} \
         ORDER BY institution_name ASC, program_id ASC, year ASC LIMIT {}",
        filters.where_sql(),
        filters.limit_placeholder(),
    );
    (sql, filters.into_params(limit))
}

pub async fn programs(
    State(state): State<AppState>,
    Query(params): Query<ProgramCatalogParams>,
) -> Result<Json<Vec<ProgramEntry>>, ApiError> {
    let year = opt_year(&params.year);
    let limit = limit::CATALOG_PROGRAMS.clamp(parse_limit(&params.limit));

    let (sql, bound) = program_catalog_query(
        year,
        non_empty(&params.region),
        non_empty(&params.institution),
        non_empty(&params.origin),
        non_empty(&params.character),
        limit,
    );
    let rows: Vec<ProgramEntry> = db::fetch_all_as(&state.pool, &sql, &bound).await?;

    Ok(Json(dedupe_sorted(rows)))
}
