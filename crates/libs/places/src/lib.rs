pub mod bbox;
pub mod errors;
pub mod point;
pub mod settings;
pub mod shape;

pub use bbox::GeoBox;
pub use errors::{Error, Result};
pub use point::Point;
pub use shape::Shape;
