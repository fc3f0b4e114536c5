pub mod board;
pub mod complex_point;
pub mod render_config;
