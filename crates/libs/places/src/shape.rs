use std::any::Any;
use std::fmt;

/// A geometry that can be written out as nested coordinate lists, the form
/// geo queries expect (`[[x, y], ...]`).
pub trait Shape: fmt::Debug + fmt::Display + Send + Sync + 'static {
    fn as_list(&self) -> Vec<Vec<f64>>;

    fn as_any(&self) -> &dyn Any;

    /// Equality against another shape. Only a shape of the exact same
    /// concrete type can compare equal, whichever side the call starts from.
    fn eq_shape(&self, other: &dyn Shape) -> bool;
}

impl<'a> PartialEq for dyn Shape + 'a {
    fn eq(&self, other: &Self) -> bool {
        self.eq_shape(other)
    }
}
