//! Command implementations

mod plan;
mod provision;

pub use plan::run_plan;
pub use provision::run_provision;
