pub mod calendar;
pub mod display;
pub mod filter;
pub mod memo;
pub mod status;
pub mod store;
pub mod task;
pub mod temporal;
pub(crate) mod timestamp;
