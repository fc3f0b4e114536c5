pub mod ports;
pub mod sequence;
