pub mod account;
pub mod activity;
pub mod play;
pub mod sharing;
