pub mod rasterize;
pub mod resolve;
