//! Expression matrix: a value grid exposed as row and column vectors.
//!
//! Every row vector has `size == column_count()` and every column vector has
//! `size == row_count()`. The shape is fixed once built; subsetting and
//! transposition return a new `Matrix`.
use crate::error::{Axis, MatrixError};
use crate::math::array1::nan_mean;
use crate::math::Array2;
use crate::vector::{ArrayVector, ColumnVector, Properties, RowVector, VectorHeader};

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    name: String,
    properties: Properties,
    grid: Array2<f32>,
    rows: Vec<VectorHeader>,
    columns: Vec<VectorHeader>,
}

impl Matrix {
    pub fn new(
        name: impl Into<String>,
        rows: Vec<VectorHeader>,
        columns: Vec<VectorHeader>,
        grid: Array2<f32>,
    ) -> Result<Self, MatrixError> {
        if rows.len() != grid.nrows() {
            return Err(MatrixError::headers(Axis::Row, rows.len(), grid.nrows()));
        }
        if columns.len() != grid.ncols() {
            return Err(MatrixError::headers(
                Axis::Column,
                columns.len(),
                grid.ncols(),
            ));
        }
        Ok(Self {
            name: name.into(),
            properties: Properties::default(),
            grid,
            rows,
            columns,
        })
    }

    /// Build from row/column names and a row-major value buffer.
    pub fn from_values<R, C>(
        name: impl Into<String>,
        row_names: R,
        column_names: C,
        values: Vec<f32>,
    ) -> Result<Self, MatrixError>
    where
        R: IntoIterator,
        R::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let rows: Vec<VectorHeader> = row_names.into_iter().map(VectorHeader::new).collect();
        let columns: Vec<VectorHeader> =
            column_names.into_iter().map(VectorHeader::new).collect();
        let grid = Array2::from_shape_vec((rows.len(), columns.len()), values)?;
        Self::new(name, rows, columns, grid)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn grid(&self) -> &Array2<f32> {
        &self.grid
    }

    pub fn value(&self, row: usize, column: usize) -> Result<f32, MatrixError> {
        self.check(Axis::Row, row)?;
        self.check(Axis::Column, column)?;
        Ok(self.grid[(row, column)])
    }

    pub fn row(&self, index: usize) -> Result<RowVector<'_>, MatrixError> {
        self.check(Axis::Row, index)?;
        Ok(RowVector::new(&self.rows[index], self.grid.row_slice(index)))
    }

    pub fn row_mut(&mut self, index: usize) -> Result<RowVector<'_, &mut VectorHeader>, MatrixError> {
        self.check(Axis::Row, index)?;
        Ok(RowVector::new(
            &mut self.rows[index],
            self.grid.row_slice(index),
        ))
    }

    pub fn column(&self, index: usize) -> Result<ColumnVector<'_>, MatrixError> {
        self.check(Axis::Column, index)?;
        Ok(ColumnVector::new(&self.columns[index], &self.grid, index))
    }

    pub fn column_mut(
        &mut self,
        index: usize,
    ) -> Result<ColumnVector<'_, &mut VectorHeader>, MatrixError> {
        self.check(Axis::Column, index)?;
        Ok(ColumnVector::new(
            &mut self.columns[index],
            &self.grid,
            index,
        ))
    }

    pub fn rows(&self) -> impl ExactSizeIterator<Item = RowVector<'_>> + '_ {
        self.rows
            .iter()
            .enumerate()
            .map(move |(i, header)| RowVector::new(header, self.grid.row_slice(i)))
    }

    pub fn columns(&self) -> impl ExactSizeIterator<Item = ColumnVector<'_>> + '_ {
        self.columns
            .iter()
            .enumerate()
            .map(move |(i, header)| ColumnVector::new(header, &self.grid, i))
    }

    /// Position of the first row named `name`; names need not be unique.
    pub fn row_index(&self, name: &str) -> Option<usize> {
        self.rows.iter().position(|h| h.name == name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|h| h.name == name)
    }

    /// New matrix holding the given rows and columns, in the given order.
    /// Vector annotations are copied so the result is independent.
    pub fn select(&self, rows: &[usize], columns: &[usize]) -> Result<Matrix, MatrixError> {
        for &r in rows {
            self.check(Axis::Row, r)?;
        }
        for &c in columns {
            self.check(Axis::Column, c)?;
        }
        let grid = self.grid.select_rows(rows).select_column_indices(columns);
        let mut subset = Matrix::new(
            self.name.clone(),
            rows.iter().map(|&r| self.rows[r].clone()).collect(),
            columns.iter().map(|&c| self.columns[c].clone()).collect(),
            grid,
        )?;
        subset.properties = self.properties.clone();
        Ok(subset)
    }

    /// Swap rows and columns; headers and annotations travel with their axis.
    pub fn transpose(&self) -> Matrix {
        Matrix {
            name: self.name.clone(),
            properties: self.properties.clone(),
            grid: self.grid.transpose(),
            rows: self.columns.clone(),
            columns: self.rows.clone(),
        }
    }

    /// Per-row mean ignoring NaN, one entry per row.
    pub fn row_means(&self) -> ArrayVector<f32> {
        let means: Vec<f32> = (0..self.row_count())
            .map(|r| nan_mean(self.grid.row_slice(r)))
            .collect();
        ArrayVector::new("mean", means)
    }

    /// Per-column mean ignoring NaN, one entry per column.
    pub fn column_means(&self) -> ArrayVector<f32> {
        let means: Vec<f32> = (0..self.column_count())
            .map(|c| self.grid.column(c).nan_mean())
            .collect();
        ArrayVector::new("mean", means)
    }

    fn check(&self, axis: Axis, index: usize) -> Result<(), MatrixError> {
        let len = match axis {
            Axis::Row => self.rows.len(),
            Axis::Column => self.columns.len(),
        };
        if index < len {
            Ok(())
        } else {
            Err(MatrixError::OutOfRange { axis, index, len })
        }
    }
}
