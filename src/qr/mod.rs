pub mod compose;
pub mod encode;
pub mod payload;
pub mod raster;
