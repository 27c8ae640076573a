pub mod map;
pub mod progress;
pub mod route;
