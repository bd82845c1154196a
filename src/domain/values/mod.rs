pub mod page;
pub mod trade_direction;
pub mod trade_status;
