pub mod circle;
pub mod polygon;

pub use circle::Circle;
pub use polygon::{MassData, Polygon};

/// Geometry owned by a rigid body.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle(Circle),
    Polygon(Polygon),
}

/// Discriminant of [`Shape`], for callers that only need to branch on kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShapeType {
    Circle,
    Polygon,
}

impl Shape {
    pub fn shape_type(&self) -> ShapeType {
        match self {
            Shape::Circle(_) => ShapeType::Circle,
            Shape::Polygon(_) => ShapeType::Polygon,
        }
    }

    pub fn mass_data(&self, density: f64) -> MassData {
        match self {
            Shape::Circle(c) => c.mass_data(density),
            Shape::Polygon(p) => p.mass_data(density),
        }
    }
}
