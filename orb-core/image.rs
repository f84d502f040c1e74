use crate::error::{OrbError, OrbResult};

/// Borrowed row-major 8-bit grayscale image with an explicit row stride
#[derive(Debug, Clone, Copy)]
pub struct ImageView<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a> ImageView<'a> {
    /// Tightly packed image (`stride == width`)
    pub fn new(data: &'a [u8], width: usize, height: usize) -> OrbResult<Self> {
        Self::with_stride(data, width, height, width)
    }

    pub fn with_stride(data: &'a [u8], width: usize, height: usize, stride: usize) -> OrbResult<Self> {
        if stride < width {
            return Err(OrbError::InvalidStride { stride, width });
        }
        let expected_len = if width == 0 || height == 0 {
            0
        } else {
            (height - 1) * stride + width
        };
        if data.len() < expected_len {
            return Err(OrbError::InvalidImageData {
                expected_len,
                actual_len: data.len(),
            });
        }
        Ok(Self { data, width, height, stride })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.stride + x]
    }

    /// Sample at a fractional position rounded to the nearest pixel and
    /// clamped into the image
    #[inline]
    pub fn get_rounded(&self, x: f32, y: f32) -> u8 {
        let xi = (x.round() as isize).clamp(0, self.width as isize - 1) as usize;
        let yi = (y.round() as isize).clamp(0, self.height as isize - 1) as usize;
        self.get(xi, yi)
    }

    pub fn row(&self, y: usize) -> &'a [u8] {
        let start = y * self.stride;
        &self.data[start..start + self.width]
    }

    /// Copy into a tightly packed buffer
    pub fn to_compact(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.width * self.height);
        for y in 0..self.height {
            out.extend_from_slice(self.row(y));
        }
        out
    }
}

/// Map an out-of-range index back into `0..n`, mirroring around the edge
/// pixels without repeating them (`gfedcb|abcdefgh|gfedcba`)
#[inline]
pub fn reflect101(mut i: isize, n: usize) -> usize {
    let n = n as isize;
    if n == 1 {
        return 0;
    }
    while i < 0 || i >= n {
        if i < 0 {
            i = -i;
        } else {
            i = 2 * (n - 1) - i;
        }
    }
    i as usize
}

/// Owned image surrounded by a fixed border.
///
/// Coordinates passed to the accessors are relative to the top-left pixel of
/// the unpadded image; negative values address the border.
#[derive(Debug, Clone, PartialEq)]
pub struct PaddedImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
    border: usize,
}

impl PaddedImage {
    /// Pad a compact `width x height` buffer with a reflect-101 border
    pub fn from_compact(pixels: &[u8], width: usize, height: usize, border: usize) -> Self {
        debug_assert_eq!(pixels.len(), width * height);
        let stride = width + 2 * border;
        let rows = height + 2 * border;
        let mut data = vec![0u8; stride * rows];
        for py in 0..rows {
            let sy = reflect101(py as isize - border as isize, height);
            let src_row = &pixels[sy * width..(sy + 1) * width];
            let dst_row = &mut data[py * stride..(py + 1) * stride];
            for (px, dst) in dst_row.iter_mut().enumerate() {
                let sx = reflect101(px as isize - border as isize, width);
                *dst = src_row[sx];
            }
        }
        Self { data, width, height, border }
    }

    /// Wrap an already padded buffer of `(width + 2*border) x (height + 2*border)`
    pub fn from_padded(data: Vec<u8>, width: usize, height: usize, border: usize) -> Self {
        debug_assert_eq!(data.len(), (width + 2 * border) * (height + 2 * border));
        Self { data, width, height, border }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn border(&self) -> usize {
        self.border
    }

    pub fn stride(&self) -> usize {
        self.width + 2 * self.border
    }

    pub fn padded_height(&self) -> usize {
        self.height + 2 * self.border
    }

    /// The whole buffer including the border, row-major with `stride()`
    pub fn padded_data(&self) -> &[u8] {
        &self.data
    }

    /// Pixel at `(x, y)`, clamped into the padded extent
    #[inline]
    pub fn at(&self, x: isize, y: isize) -> u8 {
        let b = self.border as isize;
        let px = (x + b).clamp(0, self.stride() as isize - 1) as usize;
        let py = (y + b).clamp(0, self.padded_height() as isize - 1) as usize;
        self.data[py * self.stride() + px]
    }

    /// Pixel inside the unpadded image
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[(y + self.border) * self.stride() + x + self.border]
    }

    /// Unpadded pixels as a compact buffer
    pub fn to_compact(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.width * self.height);
        for y in 0..self.height {
            let start = (y + self.border) * self.stride() + self.border;
            out.extend_from_slice(&self.data[start..start + self.width]);
        }
        out
    }
}
