pub mod completion;
pub mod handlers;
