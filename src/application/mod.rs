pub mod stats;
pub mod trade;
