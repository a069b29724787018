use crate::{
    components::DataType,
    errors::{Result, UhiError},
};

#[derive(Debug, Clone)]
pub struct Buffer<T, const ND: usize> {
    // Row-major
    data: Box<[T]>,
    shape: [usize; ND],
}

impl<T: DataType, const ND: usize> Buffer<T, ND> {
    pub fn new_zeroed(shape: [usize; ND]) -> Self {
        Self::filled(shape, T::zero())
    }

    pub fn filled(shape: [usize; ND], value: T) -> Self {
        Self {
            data: vec![value; shape.iter().product()].into_boxed_slice(),
            shape,
        }
    }

    pub fn from_vec(shape: [usize; ND], data: Vec<T>) -> Result<Self> {
        let expected = shape.iter().product();
        if data.len() != expected {
            return Err(UhiError::ShapeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data: data.into_boxed_slice(),
            shape,
        })
    }
}

impl<T, const ND: usize> Buffer<T, ND> {
    pub fn as_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn shape(&self) -> [usize; ND] {
        self.shape
    }
}

impl<T: Copy> Buffer<T, 2> {
    /// Cell at `(row, col)`, `None` outside of shape.
    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        let [height, width] = self.shape;
        if row < height && col < width {
            Some(self.data[row * width + col])
        } else {
            None
        }
    }
}
