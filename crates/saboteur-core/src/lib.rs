pub mod geometry;
pub mod protocol;
