pub mod compact;
pub mod get;
pub mod insert;
pub mod remove;
