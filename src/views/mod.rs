pub mod account;
pub mod activity;
pub mod authoring;
pub mod components;
pub mod layout;
pub mod play;

// Re-export commonly used functions from layout
pub use layout::{page, page_with_user, render, titled};
