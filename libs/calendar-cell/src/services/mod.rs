pub mod aggregate;
pub mod badges;
pub mod cache;
