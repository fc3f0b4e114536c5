pub mod gif;
pub mod ppm;
