pub mod assistant;
pub mod attendance;
