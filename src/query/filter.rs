//! Dynamic WHERE Composition
//!
//! Conditions and bound values grow in lockstep, same index order. Only
//! static column/operator text is ever substituted into statement text;
//! values travel through the `$n` parameter channel.

use crate::db::SqlParam;

#[derive(Debug, Default)]
pub struct FilterComposer {
    conditions: Vec<String>,
    params: Vec<SqlParam>,
}

impl FilterComposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `column = $n` with a bound value. `column` must be static text
    /// chosen by the handler, never a client string.
    pub fn eq(&mut self, column: &str, value: SqlParam) -> &mut Self {
        let n = self.params.len() + 1;
        self.conditions.push(format!("{column} = ${n}"));
        self.params.push(value);
        self
    }

    /// Append an equality condition only when the value is present and
    /// non-empty. Absent means "no constraint", never "match null".
    pub fn opt_eq(&mut self, column: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value.filter(|v| !v.is_empty()) {
            self.eq(column, SqlParam::Text(v.to_string()));
        }
        self
    }

    /// Append a containment match: `column ILIKE $n` with the term wrapped in
    /// `%...%`. The wildcard wrapping happens on the bound value, not in the
    /// statement text.
    pub fn contains(&mut self, column: &str, term: &str) -> &mut Self {
        let n = self.params.len() + 1;
        self.conditions.push(format!("{column} ILIKE ${n}"));
        self.params.push(SqlParam::Text(format!("%{term}%")));
        self
    }

    pub fn condition_count(&self) -> usize {
        self.conditions.len()
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// `WHERE c1 AND c2 ...`, or empty when no condition was added.
    pub fn where_sql(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        }
    }

    /// `AND c1 AND c2 ...` for statements whose base text already carries a
    /// static WHERE (e.g. an IS NOT NULL guard).
    pub fn and_sql(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("AND {}", self.conditions.join(" AND "))
        }
    }

    /// Placeholder for the row limit. The limit is always the last bound
    /// parameter of a composed statement.
    pub fn limit_placeholder(&self) -> String {
        format!("${}", self.params.len() + 1)
    }

    /// Finish composition: the ordered parameter list with the limit appended
    /// in the final position.
    pub fn into_params(self, limit: i64) -> Vec<SqlParam> {
        let mut params = self.into_filter_params();
        params.push(SqlParam::BigInt(limit));
        params
    }

    /// Ordered filter parameters alone, for statements with a static LIMIT.
    pub fn into_filter_params(self) -> Vec<SqlParam> {
        debug_assert_eq!(self.conditions.len(), self.params.len());
        self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conditions_and_params_stay_lockstep() {
        let mut filters = FilterComposer::new();
        filters.eq("year", SqlParam::Int(2024));
        filters.opt_eq("region", Some("PASTO"));
        filters.opt_eq("institution_name", None);
        filters.contains("institution_name", "nari");

        assert_eq!(filters.condition_count(), filters.param_count());
        assert_eq!(filters.condition_count(), 3);
    }

    #[test]
    fn test_placeholders_numbered_in_insertion_order() {
        let mut filters = FilterComposer::new();
        filters.eq("year", SqlParam::Int(2024));
        filters.opt_eq("region", Some("PASTO"));

        assert_eq!(filters.where_sql(), "WHERE year = $1 AND region = $2");
        assert_eq!(filters.limit_placeholder(), "$3");
    }

    #[test]
    fn test_superset_of_filters_never_shrinks_conditions() {
        let mut narrow = FilterComposer::new();
        narrow.eq("year", SqlParam::Int(2024));

        let mut wide = FilterComposer::new();
        wide.eq("year", SqlParam::Int(2024));
        wide.opt_eq("region", Some("PASTO"));
        wide.opt_eq("origin", Some("OFICIAL"));

        assert!(wide.condition_count() >= narrow.condition_count());
        assert_eq!(wide.param_count(), wide.condition_count());
    }

    #[test]
    fn test_empty_and_blank_values_add_nothing() {
        let mut filters = FilterComposer::new();
        filters.opt_eq("region", None);
        filters.opt_eq("region", Some(""));

        assert_eq!(filters.condition_count(), 0);
        assert_eq!(filters.where_sql(), "");
        assert_eq!(filters.and_sql(), "");
        assert_eq!(filters.limit_placeholder(), "$1");
    }

    #[test]
    fn test_contains_wraps_bound_value_not_statement() {
        let mut filters = FilterComposer::new();
        filters.contains("institution_name", "UNIV");

        assert_eq!(filters.where_sql(), "WHERE institution_name ILIKE $1");
        let params = filters.into_params(10);
        assert_eq!(params[0], SqlParam::Text("%UNIV%".to_string()));
    }

    #[test]
    fn test_limit_is_last_bound_parameter() {
        let mut filters = FilterComposer::new();
        filters.eq("year", SqlParam::Int(2024));
        let params = filters.into_params(50);

        assert_eq!(params.len(), 2);
        assert_eq!(params.last(), Some(&SqlParam::BigInt(50)));
    }
}
