pub mod mat2;
pub mod vec2;

pub use mat2::Mat2;
pub use vec2::Vec2;
