pub mod handlers;
pub mod payload;
pub mod queries;
