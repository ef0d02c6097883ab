pub mod staff;
pub mod user;
