pub mod auth;
pub mod catalogue;
pub mod learning;
pub mod sessions;
