use image::{GrayImage, Luma};
use crate::{
    error::{DetectorError, Result},
    traits::MaskFilter,
};

/// Separable Gaussian blur with the fixed small kernels used when sigma is
/// derived from the kernel size.
///
/// Integer arithmetic throughout, rounding half up, reflect-101 border
/// (`gfedcb|abcdefgh|gfedcba`).
#[derive(Debug, Clone)]
pub struct GaussianMaskBlur {
    pub kernel_size: u32,
}

impl Default for GaussianMaskBlur {
    fn default() -> Self {
        Self { kernel_size: 5 }
    }
}

impl GaussianMaskBlur {
    pub fn new(kernel_size: u32) -> Self {
        Self { kernel_size }
    }

    fn kernel(&self) -> Result<&'static [u32]> {
        match self.kernel_size {
            1 => Ok(&[1]),
            3 => Ok(&[1, 2, 1]),
            5 => Ok(&[1, 4, 6, 4, 1]),
            other => Err(DetectorError::InvalidConfig(format!(
                "unsupported blur kernel size {other}"
            ))),
        }
    }
}

impl MaskFilter for GaussianMaskBlur {
    fn apply(&self, mask: &GrayImage) -> Result<GrayImage> {
        let kernel = self.kernel()?;
        if kernel.len() == 1 {
            return Ok(mask.clone());
        }

        let (width, height) = mask.dimensions();
        let (w, h) = (width as usize, height as usize);
        let radius = (kernel.len() / 2) as i64;
        let norm: u32 = kernel.iter().sum::<u32>().pow(2);
        let src = mask.as_raw();

        // Horizontal pass keeps full precision.
        let mut rows = vec![0u32; w * h];
        for y in 0..h {
            let line = &src[y * w..(y + 1) * w];
            for x in 0..w {
                rows[y * w + x] = kernel
                    .iter()
                    .enumerate()
                    .map(|(k, weight)| {
                        let sx = reflect_101(x as i64 + k as i64 - radius, w);
                        weight * u32::from(line[sx])
                    })
                    .sum();
            }
        }

        let mut out = GrayImage::new(width, height);
        for y in 0..h {
            for x in 0..w {
                let acc: u32 = kernel
                    .iter()
                    .enumerate()
                    .map(|(k, weight)| {
                        let sy = reflect_101(y as i64 + k as i64 - radius, h);
                        weight * rows[sy * w + x]
                    })
                    .sum();
                let value = (acc + norm / 2) / norm;
                out.put_pixel(x as u32, y as u32, Luma([value.min(255) as u8]));
            }
        }

        Ok(out)
    }
}

/// Map an out-of-bounds index back into `0..len` by mirroring about the edge
/// pixels without repeating them.
fn reflect_101(mut i: i64, len: usize) -> usize {
    let n = len as i64;
    if n == 1 {
        return 0;
    }
    loop {
        if i < 0 {
            i = -i;
        } else if i >= n {
            i = 2 * (n - 1) - i;
        } else {
            return i as usize;
        }
    }
}
