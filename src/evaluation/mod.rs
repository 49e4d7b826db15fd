//! Route totals and plan summaries.

mod evaluator;

pub use evaluator::{PlanEvaluator, PlanSummary, RouteEvaluator, RouteTotals};
