//! Named, fixed-size vectors with an attached property bag.
//!
//! A `Vector` is a capability: something with a name, a size fixed at
//! construction, element access for indices in `0..size()`, and a
//! `Properties` bag for annotations such as display colour or a statistic.
//! The element storage belongs to each variant:
//!
//! ```text
//!  RowVector      -> a row slice of a Matrix grid
//!  ColumnVector   -> a column of a Matrix grid
//!  ArrayVector    -> owned values (Array1)
//!  ComputedVector -> value derived from the index
//! ```
pub mod axis;
pub mod owned;
pub mod properties;

pub use axis::{ColumnVector, RowVector};
pub use owned::{ArrayVector, ComputedVector};
pub use properties::Properties;

use crate::error::VectorError;

/// Identity and annotations owned by every vector.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VectorHeader {
    pub name: String,
    #[serde(default)]
    pub properties: Properties,
}

impl VectorHeader {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Properties::default(),
        }
    }

    pub fn with_properties(name: impl Into<String>, properties: Properties) -> Self {
        Self {
            name: name.into(),
            properties,
        }
    }
}

pub trait Vector {
    type Value;

    fn name(&self) -> &str;

    fn size(&self) -> usize;

    fn properties(&self) -> &Properties;

    /// Element at `index`, valid for `0..size()`.
    ///
    /// Variants must supply their own storage and override this; the
    /// provided body only reports that element access is missing.
    fn value(&self, index: usize) -> Result<Self::Value, VectorError> {
        let _ = index;
        Err(VectorError::NotImplemented {
            name: self.name().to_string(),
        })
    }

    fn values(&self) -> Values<'_, Self>
    where
        Self: Sized,
    {
        Values {
            vector: self,
            next: 0,
        }
    }
}

pub trait VectorMut: Vector {
    fn properties_mut(&mut self) -> &mut Properties;
}

/// Iterator over every element of a vector, in index order.
pub struct Values<'a, V> {
    vector: &'a V,
    next: usize,
}

impl<'a, V: Vector> Iterator for Values<'a, V> {
    type Item = Result<V::Value, VectorError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.vector.size() {
            return None;
        }
        let item = self.vector.value(self.next);
        self.next += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.vector.size().saturating_sub(self.next);
        (left, Some(left))
    }
}

#[inline]
pub(crate) fn check_index(index: usize, size: usize) -> Result<(), VectorError> {
    if index < size {
        Ok(())
    } else {
        Err(VectorError::OutOfRange { index, size })
    }
}
