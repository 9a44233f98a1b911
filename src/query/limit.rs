//! Row Limit Clamping
//!
//! Every endpoint bounds its result size into a closed interval. Out-of-range
//! or non-numeric input is corrected silently, never rejected.

#[derive(Debug, Clone, Copy)]
pub struct LimitPolicy {
    pub default: i64,
    pub max: i64,
}

impl LimitPolicy {
    pub const fn new(default: i64, max: i64) -> Self {
        Self { default, max }
    }

    /// `None` (absent or unparsable input) takes the endpoint default; any
    /// number is clamped into `1..=max`.
    pub fn clamp(&self, raw: Option<i64>) -> i64 {
        raw.unwrap_or(self.default).clamp(1, self.max)
    }
}

pub const RANK_INSTITUTIONS: LimitPolicy = LimitPolicy::new(20, 200);
pub const RANK_PROGRAMS: LimitPolicy = LimitPolicy::new(50, 200);
pub const RANK_COMPETENCIES: LimitPolicy = LimitPolicy::new(20, 200);
pub const RANK_VALUE_ADDED: LimitPolicy = LimitPolicy::new(50, 500);
pub const CATALOG_REGIONS: LimitPolicy = LimitPolicy::new(500, 500);
pub const CATALOG_INSTITUTIONS: LimitPolicy = LimitPolicy::new(1000, 1000);
pub const CATALOG_PROGRAMS: LimitPolicy = LimitPolicy::new(2000, 10000);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_limit_takes_endpoint_default() {
        assert_eq!(RANK_INSTITUTIONS.clamp(None), 20);
        assert_eq!(CATALOG_PROGRAMS.clamp(None), 2000);
    }

    #[test]
    fn test_limit_clamped_into_closed_interval() {
        assert_eq!(RANK_VALUE_ADDED.clamp(Some(9999)), 500);
        assert_eq!(RANK_INSTITUTIONS.clamp(Some(0)), 1);
        assert_eq!(RANK_INSTITUTIONS.clamp(Some(-5)), 1);
        assert_eq!(RANK_INSTITUTIONS.clamp(Some(200)), 200);
        assert_eq!(RANK_INSTITUTIONS.clamp(Some(3)), 3);
    }

    #[test]
    fn test_effective_limit_always_within_bounds() {
        for raw in [i64::MIN, -1, 0, 1, 19, 20, 21, 199, 200, 201, i64::MAX] {
            let effective = RANK_INSTITUTIONS.clamp(Some(raw));
            assert!((1..=RANK_INSTITUTIONS.max).contains(&effective));
        }
    }
}
