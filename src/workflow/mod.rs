pub mod scorecard_flow;
pub mod sheet_ctx;

pub use scorecard_flow::ScorecardFlow;
pub use sheet_ctx::SheetCtx;
