pub mod missions;
pub mod planets;
pub mod scientists;
pub mod system;
