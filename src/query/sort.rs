//! Sort/Direction Whitelists
//!
//! ORDER BY columns and directions cannot be parameterized, so they are the
//! one structural position a client token could influence. These closed enums
//! are the sole gate: unknown tokens fall back to the endpoint default, and
//! only the enum's static strings ever reach statement text.

/// Sort direction. Unknown input defaults to descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn from_token(token: Option<&str>) -> Self {
        match token {
            Some("asc") => SortDirection::Asc,
            Some("desc") => SortDirection::Desc,
            _ => SortDirection::Desc,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    pub fn as_token(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Sortable columns for the institution ranking. Tokens mirror the projected
/// column names; anything else becomes the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstitutionSortColumn {
    OverallScore,
    ReadingScore,
    MathScore,
    SocialScore,
    ScienceScore,
    EnglishScore,
}

impl InstitutionSortColumn {
    pub fn from_token(token: Option<&str>) -> Self {
        match token {
            Some("overall_score") => Self::OverallScore,
            Some("reading_score") => Self::ReadingScore,
            Some("math_score") => Self::MathScore,
            Some("social_score") => Self::SocialScore,
            Some("science_score") => Self::ScienceScore,
            Some("english_score") => Self::EnglishScore,
            _ => Self::OverallScore,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::OverallScore => "overall_score",
            Self::ReadingScore => "reading_score",
            Self::MathScore => "math_score",
            Self::SocialScore => "social_score",
            Self::ScienceScore => "science_score",
            Self::EnglishScore => "english_score",
        }
    }

    pub fn as_token(self) -> &'static str {
        self.as_sql()
    }
}

/// Competency metrics a regional ranking may be ordered by. The client picks
/// which enumerated metric applies, never the column text itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompetencyMetric {
    Reading,
    Math,
    Social,
    Science,
    English,
}

impl CompetencyMetric {
    pub fn from_token(token: Option<&str>) -> Self {
        match token {
            Some("avg_reading") => Self::Reading,
            Some("avg_math") => Self::Math,
            Some("avg_social") => Self::Social,
            Some("avg_science") => Self::Science,
            Some("avg_english") => Self::English,
            _ => Self::Reading,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Reading => "avg_reading",
            Self::Math => "avg_math",
            Self::Social => "avg_social",
            Self::Science => "avg_science",
            Self::English => "avg_english",
        }
    }

    pub fn as_token(self) -> &'static str {
        self.as_sql()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_sort_column_falls_back_to_default() {
        assert_eq!(
            InstitutionSortColumn::from_token(Some("overall_score; DROP TABLE institution_scores")),
            InstitutionSortColumn::OverallScore
        );
        assert_eq!(
            InstitutionSortColumn::from_token(None),
            InstitutionSortColumn::OverallScore
        );
    }

    #[test]
    fn test_every_sort_token_round_trips() {
        for token in [
            "overall_score",
            "reading_score",
            "math_score",
            "social_score",
            "science_score",
            "english_score",
        ] {
            assert_eq!(InstitutionSortColumn::from_token(Some(token)).as_token(), token);
        }
    }

    #[test]
    fn test_unknown_direction_defaults_to_desc() {
        assert_eq!(SortDirection::from_token(Some("sideways")), SortDirection::Desc);
        assert_eq!(SortDirection::from_token(None), SortDirection::Desc);
        assert_eq!(SortDirection::from_token(Some("asc")), SortDirection::Asc);
    }

    #[test]
    fn test_unknown_competency_defaults_to_reading() {
        assert_eq!(CompetencyMetric::from_token(Some("avg_luck")), CompetencyMetric::Reading);
        assert_eq!(CompetencyMetric::from_token(Some("avg_english")), CompetencyMetric::English);
    }
}
