//! Query Composition
//!
//! The safety core of the service: dynamic WHERE composition with lockstep
//! bound parameters, closed sort/metric vocabularies, and per-endpoint limit
//! clamping. Nothing client-controlled reaches statement text except through
//! these gates.

pub mod filter;
pub mod limit;
pub mod sort;

pub use filter::FilterComposer;
pub use limit::LimitPolicy;
pub use sort::{CompetencyMetric, InstitutionSortColumn, SortDirection};
