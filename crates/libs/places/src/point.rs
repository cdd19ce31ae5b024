use serde::{
    de::{self, Deserializer, IgnoredAny, SeqAccess, Visitor},
    Deserialize, Serialize, Serializer,
};
use std::fmt;
use std::hash::{Hash, Hasher};
use tracing::debug;

use crate::errors::{Error, Result};

pub(crate) const POINT_ARRAY_LENGTH_MSG: &str = "Point array has to have 2 elements!";

/// An immutable 2D coordinate pair.
///
/// Equality compares the bit patterns of both coordinates, with every NaN
/// folded onto the same value, so `Point` is `Eq` and `Hash`. As a consequence
/// `0.0` and `-0.0` are different coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    pub fn new<T: Into<f64>>(x: T, y: T) -> Self {
        Point {
            x: x.into(),
            y: y.into(),
        }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// The `[x, y]` list form.
    pub fn as_list(&self) -> Vec<f64> {
        vec![self.x, self.y]
    }

    /// Stable 32 bits hash, `31 * (31 + h(x)) + h(y)`.
    pub fn hash_code(&self) -> i32 {
        let mut result: i32 = 1;
        result = result.wrapping_mul(31).wrapping_add(fold_bits(self.x));
        result = result.wrapping_mul(31).wrapping_add(fold_bits(self.y));
        result
    }
}

fn canonical_bits(value: f64) -> u64 {
    if value.is_nan() {
        f64::NAN.to_bits()
    } else {
        value.to_bits()
    }
}

fn fold_bits(value: f64) -> i32 {
    let bits = canonical_bits(value);
    (bits ^ (bits >> 32)) as i32
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        canonical_bits(self.x) == canonical_bits(other.x)
            && canonical_bits(self.y) == canonical_bits(other.y)
    }
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        canonical_bits(self.x).hash(state);
        canonical_bits(self.y).hash(state);
    }
}

/// `Point [x=.., y=..]`, coordinates in Rust's shortest round-trip form with
/// a fractional part on integral values (`10.0`, `10000000.0`). Scientific
/// notation only kicks in below `1e-4` and from `1e16`.
impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Point [x={:?}, y={:?}]", self.x, self.y)
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Point::new(x, y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

impl From<Point> for [f64; 2] {
    fn from(point: Point) -> Self {
        [point.x, point.y]
    }
}

impl TryFrom<&[f64]> for Point {
    type Error = Error;

    fn try_from(coordinates: &[f64]) -> Result<Self> {
        match *coordinates {
            [x, y] => Ok(Point::new(x, y)),
            _ => {
                debug!(
                    "rejecting point array of length {}",
                    coordinates.len()
                );
                Err(Error::invalid_argument(POINT_ARRAY_LENGTH_MSG))
            }
        }
    }
}

impl From<geo_types::Coord<f64>> for Point {
    fn from(value: geo_types::Coord<f64>) -> Self {
        Point::new(value.x, value.y)
    }
}

impl From<Point> for geo_types::Coord<f64> {
    fn from(point: Point) -> geo_types::Coord<f64> {
        geo_types::Coord::from((point.x, point.y))
    }
}

impl From<geo_types::Point<f64>> for Point {
    fn from(value: geo_types::Point<f64>) -> Self {
        Point::new(value.x(), value.y())
    }
}

impl From<Point> for geo_types::Point<f64> {
    fn from(point: Point) -> geo_types::Point<f64> {
        geo_types::Point::new(point.x, point.y)
    }
}

impl Serialize for Point {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        [self.x, self.y].serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Point {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PointVisitor;

        impl<'de> Visitor<'de> for PointVisitor {
            type Value = Point;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a point as [x, y]")
            }

            fn visit_seq<V>(self, mut seq: V) -> std::result::Result<Point, V::Error>
            where
                V: SeqAccess<'de>,
            {
                let expected_length_err =
                    |len| de::Error::invalid_length(len, &"a tuple of size 2");

                let x = seq.next_element()?.ok_or_else(|| expected_length_err(0))?;
                let y = seq.next_element()?.ok_or_else(|| expected_length_err(1))?;

                if seq.next_element::<IgnoredAny>()?.is_some() {
                    return Err(expected_length_err(3));
                }

                Ok(Point::new::<f64>(x, y))
            }
        }

        deserializer.deserialize_seq(PointVisitor)
    }
}
