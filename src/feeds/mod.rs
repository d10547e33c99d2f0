pub mod live;
pub mod simulator;
