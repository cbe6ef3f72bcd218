//! Dense image containers
//!
//! [`Image<T>`] is the fundamental buffer type: a dense rectangular (2D) or
//! cuboid (3D) array of scalar samples, stored row-major with no padding.
//! A 2D image is a 3D image with `depth == 1`, so every propagation engine
//! is written once against the 3D layout.
//!
//! # Memory layout
//!
//! The sample at (x, y, z) is at index `(z * height + y) * width + x`:
//! x varies fastest, then y, then z. "Raster order" throughout this library
//! means iteration in increasing index order.
//!
//! # Ownership
//!
//! Buffers are exclusively owned by the caller. Engines read them (or mutate
//! in place where a contract says so) and never retain a reference beyond
//! the call; results are freshly allocated.
//!
//! # Examples
//!
//! ```
//! use morpho_core::{Image, Shape};
//!
//! let mut img: Image<u8> = Image::new(Shape::new_2d(100, 100).unwrap());
//! img.set(10, 20, 0, 255).unwrap();
//! assert_eq!(img.get(10, 20, 0).unwrap(), 255);
//! ```

use crate::error::{Error, Result};
use crate::sample::Sample;

/// Dimensions of an image buffer.
///
/// `depth == 1` encodes a 2D image; anything larger is a 3D stack.
/// Extents are fixed at creation and always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    width: u32,
    height: u32,
    depth: u32,
}

impl Shape {
    /// Create a 2D shape (`depth == 1`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if either extent is 0.
    pub fn new_2d(width: u32, height: u32) -> Result<Self> {
        Self::new_3d(width, height, 1)
    }

    /// Create a 3D shape.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if any extent is 0.
    pub fn new_3d(width: u32, height: u32, depth: u32) -> Result<Self> {
        if width == 0 || height == 0 || depth == 0 {
            return Err(Error::InvalidDimension {
                width,
                height,
                depth,
            });
        }
        Ok(Shape {
            width,
            height,
            depth,
        })
    }

    /// Width in samples.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in samples.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Depth in slices (1 for 2D images).
    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// All three extents as a tuple.
    #[inline]
    pub fn dims(&self) -> (u32, u32, u32) {
        (self.width, self.height, self.depth)
    }

    /// Whether this shape is two-dimensional.
    #[inline]
    pub fn is_2d(&self) -> bool {
        self.depth == 1
    }

    /// Number of spatial dimensions (2 or 3).
    #[inline]
    pub fn ndims(&self) -> u32 {
        if self.is_2d() { 2 } else { 3 }
    }

    /// Total number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        (self.width as usize) * (self.height as usize) * (self.depth as usize)
    }

    /// Always false; shapes have non-zero extents by construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Raster index of (x, y, z).
    ///
    /// No bounds checking; callers in hot loops are expected to have
    /// validated coordinates against [`contains`](Shape::contains).
    #[inline]
    pub fn index(&self, x: u32, y: u32, z: u32) -> usize {
        ((z as usize) * (self.height as usize) + (y as usize)) * (self.width as usize)
            + (x as usize)
    }

    /// Whether signed coordinates fall inside the buffer.
    ///
    /// Takes signed values so offset arithmetic can be checked directly.
    #[inline]
    pub fn contains(&self, x: i64, y: i64, z: i64) -> bool {
        x >= 0
            && y >= 0
            && z >= 0
            && (x as u64) < u64::from(self.width)
            && (y as u64) < u64::from(self.height)
            && (z as u64) < u64::from(self.depth)
    }

    /// Coordinates (x, y, z) of a raster index.
    #[inline]
    pub fn coords(&self, index: usize) -> (u32, u32, u32) {
        let w = self.width as usize;
        let h = self.height as usize;
        let x = index % w;
        let y = (index / w) % h;
        let z = index / (w * h);
        (x as u32, y as u32, z as u32)
    }
}

/// Dense scalar image, 2D or 3D.
///
/// Checked accessors ([`get`](Image::get) / [`set`](Image::set)) are for
/// convenience and tests; the engines work on the flat [`data`](Image::data)
/// slice with [`Shape::index`].
#[derive(Debug, Clone, PartialEq)]
pub struct Image<T> {
    shape: Shape,
    data: Vec<T>,
}

impl<T: Sample> Image<T> {
    /// Create a new image with all samples set to [`Sample::ZERO`].
    pub fn new(shape: Shape) -> Self {
        Image {
            shape,
            data: vec![T::ZERO; shape.len()],
        }
    }

    /// Create a new 2D image with all samples zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if either extent is 0.
    pub fn new_2d(width: u32, height: u32) -> Result<Self> {
        Ok(Self::new(Shape::new_2d(width, height)?))
    }

    /// Create a new 3D image with all samples zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if any extent is 0.
    pub fn new_3d(width: u32, height: u32, depth: u32) -> Result<Self> {
        Ok(Self::new(Shape::new_3d(width, height, depth)?))
    }

    /// Create a new image with all samples set to `value`.
    pub fn new_with_value(shape: Shape, value: T) -> Self {
        Image {
            shape,
            data: vec![value; shape.len()],
        }
    }

    /// Create an image from raw data in raster order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataLength`] if `data.len() != shape.len()`.
    pub fn from_data(shape: Shape, data: Vec<T>) -> Result<Self> {
        if data.len() != shape.len() {
            return Err(Error::DataLength {
                expected: shape.len(),
                actual: data.len(),
            });
        }
        Ok(Image { shape, data })
    }

    /// Create an image by evaluating `f` at every coordinate in raster order.
    pub fn from_fn(shape: Shape, mut f: impl FnMut(u32, u32, u32) -> T) -> Self {
        let mut data = Vec::with_capacity(shape.len());
        for z in 0..shape.depth() {
            for y in 0..shape.height() {
                for x in 0..shape.width() {
                    data.push(f(x, y, z));
                }
            }
        }
        Image { shape, data }
    }

    /// The buffer's shape.
    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Width in samples.
    #[inline]
    pub fn width(&self) -> u32 {
        self.shape.width
    }

    /// Height in samples.
    #[inline]
    pub fn height(&self) -> u32 {
        self.shape.height
    }

    /// Depth in slices (1 for 2D images).
    #[inline]
    pub fn depth(&self) -> u32 {
        self.shape.depth
    }

    /// Whether this image is two-dimensional.
    #[inline]
    pub fn is_2d(&self) -> bool {
        self.shape.is_2d()
    }

    /// Total number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false; see [`Shape::is_empty`].
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether two images have identical shapes.
    #[inline]
    pub fn same_shape<U: Sample>(&self, other: &Image<U>) -> bool {
        self.shape == other.shape
    }

    /// Get the sample at (x, y, z).
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if coordinates are out of range.
    #[inline]
    pub fn get(&self, x: u32, y: u32, z: u32) -> Result<T> {
        if !self.shape.contains(i64::from(x), i64::from(y), i64::from(z)) {
            return Err(Error::IndexOutOfBounds {
                index: self.shape.index(x, y, z),
                len: self.data.len(),
            });
        }
        Ok(self.data[self.shape.index(x, y, z)])
    }

    /// Set the sample at (x, y, z).
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if coordinates are out of range.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, z: u32, value: T) -> Result<()> {
        if !self.shape.contains(i64::from(x), i64::from(y), i64::from(z)) {
            return Err(Error::IndexOutOfBounds {
                index: self.shape.index(x, y, z),
                len: self.data.len(),
            });
        }
        let idx = self.shape.index(x, y, z);
        self.data[idx] = value;
        Ok(())
    }

    /// Get the sample at (x, y) in a 2D image.
    #[inline]
    pub fn get_2d(&self, x: u32, y: u32) -> Result<T> {
        self.get(x, y, 0)
    }

    /// Set the sample at (x, y) in a 2D image.
    #[inline]
    pub fn set_2d(&mut self, x: u32, y: u32, value: T) -> Result<()> {
        self.set(x, y, 0, value)
    }

    /// Raw access to the sample data in raster order.
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Mutable raw access to the sample data.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the image, returning its data.
    #[inline]
    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// Set every sample to `value`.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Check that `other` shares this image's shape.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] otherwise. Used by the engines as
    /// an entry precondition.
    pub fn check_same_shape<U: Sample>(&self, other: &Image<U>) -> Result<()> {
        if self.shape != other.shape {
            return Err(Error::ShapeMismatch {
                expected: self.shape.dims(),
                actual: other.shape.dims(),
            });
        }
        Ok(())
    }
}
