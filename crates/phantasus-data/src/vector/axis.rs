//! Row and column views into a matrix grid.
//!
//! The header parameter `H` is `&VectorHeader` for read-only views and
//! `&mut VectorHeader` for views handed out by `Matrix::row_mut` /
//! `Matrix::column_mut`; only the latter implement `VectorMut`.
use std::ops::{Deref, DerefMut};

use crate::error::VectorError;
use crate::math::Array2;
use crate::vector::{check_index, Properties, Vector, VectorHeader, VectorMut};

/// One row of a matrix; its size is the matrix column count.
#[derive(Debug)]
pub struct RowVector<'a, H = &'a VectorHeader> {
    header: H,
    values: &'a [f32],
}

impl<'a, H> RowVector<'a, H>
where
    H: Deref<Target = VectorHeader>,
{
    pub(crate) fn new(header: H, values: &'a [f32]) -> Self {
        Self { header, values }
    }

    pub fn as_slice(&self) -> &'a [f32] {
        self.values
    }
}

impl<'a, H> Vector for RowVector<'a, H>
where
    H: Deref<Target = VectorHeader>,
{
    type Value = f32;

    fn name(&self) -> &str {
        &self.header.name
    }

    fn size(&self) -> usize {
        self.values.len()
    }

    fn properties(&self) -> &Properties {
        &self.header.properties
    }

    fn value(&self, index: usize) -> Result<f32, VectorError> {
        check_index(index, self.values.len())?;
        Ok(self.values[index])
    }
}

impl<'a, H> VectorMut for RowVector<'a, H>
where
    H: DerefMut<Target = VectorHeader>,
{
    fn properties_mut(&mut self) -> &mut Properties {
        &mut self.header.properties
    }
}

/// One column of a matrix; its size is the matrix row count.
#[derive(Debug)]
pub struct ColumnVector<'a, H = &'a VectorHeader> {
    header: H,
    grid: &'a Array2<f32>,
    column: usize,
}

impl<'a, H> ColumnVector<'a, H>
where
    H: Deref<Target = VectorHeader>,
{
    pub(crate) fn new(header: H, grid: &'a Array2<f32>, column: usize) -> Self {
        Self {
            header,
            grid,
            column,
        }
    }
}

impl<'a, H> Vector for ColumnVector<'a, H>
where
    H: Deref<Target = VectorHeader>,
{
    type Value = f32;

    fn name(&self) -> &str {
        &self.header.name
    }

    fn size(&self) -> usize {
        self.grid.nrows()
    }

    fn properties(&self) -> &Properties {
        &self.header.properties
    }

    fn value(&self, index: usize) -> Result<f32, VectorError> {
        self.grid
            .get(index, self.column)
            .copied()
            .ok_or(VectorError::OutOfRange {
                index,
                size: self.grid.nrows(),
            })
    }
}

impl<'a, H> VectorMut for ColumnVector<'a, H>
where
    H: DerefMut<Target = VectorHeader>,
{
    fn properties_mut(&mut self) -> &mut Properties {
        &mut self.header.properties
    }
}
