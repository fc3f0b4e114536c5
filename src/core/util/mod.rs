pub mod map_pixel;
