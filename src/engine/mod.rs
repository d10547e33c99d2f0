pub mod deficit;
pub mod tracker;
