pub mod identity;
pub mod models;

pub use identity::{CallerIdentity, IDENTITY_HEADER};
