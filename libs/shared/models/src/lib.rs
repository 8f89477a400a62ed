pub mod error;
pub mod policy;
