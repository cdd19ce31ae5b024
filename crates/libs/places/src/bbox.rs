use serde::{
    de::{self, Deserializer, IgnoredAny, SeqAccess, Visitor},
    Deserialize, Serialize, Serializer,
};
use std::any::Any;
use std::fmt;
use tracing::debug;

use crate::errors::{Error, Result};
use crate::point::{Point, POINT_ARRAY_LENGTH_MSG};
use crate::shape::Shape;

/// A geo-spatial box given by two corners.
///
/// The corners are stored exactly as given: nothing checks that the lower
/// left corner is actually below and left of the upper right one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeoBox {
    first: Point,
    second: Point,
}

impl GeoBox {
    pub fn new(lower_left: Point, upper_right: Point) -> Self {
        GeoBox {
            first: lower_left,
            second: upper_right,
        }
    }

    /// Builds a box from corners that may be missing.
    pub fn try_from_options(
        lower_left: Option<Point>,
        upper_right: Option<Point>,
    ) -> Result<Self> {
        let lower_left = lower_left
            .ok_or_else(|| Error::invalid_argument("Lower left point must not be null!"))?;
        let upper_right = upper_right
            .ok_or_else(|| Error::invalid_argument("Upper right point must not be null!"))?;
        Ok(GeoBox::new(lower_left, upper_right))
    }

    /// Builds a box from two `[x, y]` coordinate arrays, both must hold exactly
    /// two elements.
    pub fn from_coordinates(lower_left: &[f64], upper_right: &[f64]) -> Result<Self> {
        if lower_left.len() != 2 || upper_right.len() != 2 {
            debug!(
                "rejecting box coordinates of lengths {} and {}",
                lower_left.len(),
                upper_right.len()
            );
            return Err(Error::invalid_argument(POINT_ARRAY_LENGTH_MSG));
        }

        Ok(GeoBox::new(
            Point::try_from(lower_left)?,
            Point::try_from(upper_right)?,
        ))
    }

    pub fn lower_left(&self) -> Point {
        self.first
    }

    pub fn upper_right(&self) -> Point {
        self.second
    }

    /// Stable 32 bits hash, `31 + 17 * h(lower_left) + 17 * h(upper_right)`.
    pub fn hash_code(&self) -> i32 {
        31i32
            .wrapping_add(self.first.hash_code().wrapping_mul(17))
            .wrapping_add(self.second.hash_code().wrapping_mul(17))
    }
}

impl Shape for GeoBox {
    fn as_list(&self) -> Vec<Vec<f64>> {
        vec![self.first.as_list(), self.second.as_list()]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_shape(&self, other: &dyn Shape) -> bool {
        other
            .as_any()
            .downcast_ref::<GeoBox>()
            .map_or(false, |other| self == other)
    }
}

impl fmt::Display for GeoBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Box [{}, {}]", self.first, self.second)
    }
}

impl From<(Point, Point)> for GeoBox {
    fn from((lower_left, upper_right): (Point, Point)) -> Self {
        GeoBox::new(lower_left, upper_right)
    }
}

impl From<([f64; 2], [f64; 2])> for GeoBox {
    fn from((lower_left, upper_right): ([f64; 2], [f64; 2])) -> Self {
        GeoBox::new(lower_left.into(), upper_right.into())
    }
}

// geo_types::Rect reorders its corners into min/max, so a box whose corners
// are swapped does not survive the conversion unchanged.
impl From<GeoBox> for geo_types::Rect<f64> {
    fn from(value: GeoBox) -> Self {
        geo_types::Rect::new(
            geo_types::Coord::from(value.first),
            geo_types::Coord::from(value.second),
        )
    }
}

impl From<geo_types::Rect<f64>> for GeoBox {
    fn from(value: geo_types::Rect<f64>) -> Self {
        GeoBox::new(value.min().into(), value.max().into())
    }
}

impl Serialize for GeoBox {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        [self.first, self.second].serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GeoBox {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct GeoBoxVisitor;

        impl<'de> Visitor<'de> for GeoBoxVisitor {
            type Value = GeoBox;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a box as [[x, y], [x, y]]")
            }

            fn visit_seq<V>(self, mut seq: V) -> std::result::Result<GeoBox, V::Error>
            where
                V: SeqAccess<'de>,
            {
                let expected_length_err =
                    |len| de::Error::invalid_length(len, &"a tuple of size 2");

                let lower_left = seq.next_element()?.ok_or_else(|| expected_length_err(0))?;
                let upper_right = seq.next_element()?.ok_or_else(|| expected_length_err(1))?;

                if seq.next_element::<IgnoredAny>()?.is_some() {
                    return Err(expected_length_err(3));
                }

                Ok(GeoBox::new(lower_left, upper_right))
            }
        }

        deserializer.deserialize_seq(GeoBoxVisitor)
    }
}
