use crate::error::VectorError;
use crate::math::Array1;
use crate::vector::{check_index, Properties, Vector, VectorHeader, VectorMut};

/// A vector that owns its values, e.g. a derived per-row statistic.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayVector<T> {
    header: VectorHeader,
    values: Array1<T>,
}

impl<T> ArrayVector<T> {
    pub fn new(name: impl Into<String>, values: impl Into<Array1<T>>) -> Self {
        Self {
            header: VectorHeader::new(name),
            values: values.into(),
        }
    }

    pub fn as_array(&self) -> &Array1<T> {
        &self.values
    }
}

impl<T: Clone> Vector for ArrayVector<T> {
    type Value = T;

    fn name(&self) -> &str {
        &self.header.name
    }

    fn size(&self) -> usize {
        self.values.len()
    }

    fn properties(&self) -> &Properties {
        &self.header.properties
    }

    fn value(&self, index: usize) -> Result<T, VectorError> {
        check_index(index, self.values.len())?;
        Ok(self.values[index].clone())
    }
}

impl<T: Clone> VectorMut for ArrayVector<T> {
    fn properties_mut(&mut self) -> &mut Properties {
        &mut self.header.properties
    }
}

/// A vector whose element at `i` is `f(i)`; nothing is stored.
pub struct ComputedVector<F> {
    header: VectorHeader,
    size: usize,
    f: F,
}

impl<T, F> ComputedVector<F>
where
    F: Fn(usize) -> T,
{
    pub fn new(name: impl Into<String>, size: usize, f: F) -> Self {
        Self {
            header: VectorHeader::new(name),
            size,
            f,
        }
    }

    /// Evaluate every element into an owned vector, keeping the annotations.
    pub fn materialize(&self) -> ArrayVector<T> {
        ArrayVector {
            header: self.header.clone(),
            values: (0..self.size).map(&self.f).collect(),
        }
    }
}

impl<T, F> Vector for ComputedVector<F>
where
    F: Fn(usize) -> T,
{
    type Value = T;

    fn name(&self) -> &str {
        &self.header.name
    }

    fn size(&self) -> usize {
        self.size
    }

    fn properties(&self) -> &Properties {
        &self.header.properties
    }

    fn value(&self, index: usize) -> Result<T, VectorError> {
        check_index(index, self.size)?;
        Ok((self.f)(index))
    }
}

impl<T, F> VectorMut for ComputedVector<F>
where
    F: Fn(usize) -> T,
{
    fn properties_mut(&mut self) -> &mut Properties {
        &mut self.header.properties
    }
}
