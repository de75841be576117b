pub mod logging;

pub use logging::{display_label, log_scorecard_summary};
