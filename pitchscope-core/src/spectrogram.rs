//! # Spectrogram Module
//!
//! A fixed-size scrolling image of the spectral history. Each analyzed window
//! shifts the image one column to the left and paints its spectrum into the
//! rightmost column.
//!
//! ## Features
//! - Log-skewed row mapping: more rows for low frequencies
//! - Level-to-color mapping through HSV (hue = value = level, full saturation)
//! - Row-to-bin table computed once, so painting a column is a table walk

/// Magnitudes below this are treated as silence when normalizing a column.
pub const MIN_PEAK_MAGNITUDE: f32 = 1e-5;

/// Exponent of the row skew. Smaller values give the low end more rows.
const ROW_SKEW: f32 = 0.2;

/// One 8-bit RGB pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
}

/// Converts hue, saturation and value (all in 0..=1) to RGB.
///
/// Hue wraps, so 0.0 and 1.0 are both red.
pub fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> Rgb {
    let s = saturation.clamp(0.0, 1.0);
    let v = value.clamp(0.0, 1.0);
    let h = (hue - hue.floor()) * 6.0;
    let sector = h.floor();
    let f = h - sector;

    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    let (r, g, b) = match sector as u32 % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    let to_byte = |c: f32| (c * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb { r: to_byte(r), g: to_byte(g), b: to_byte(b) }
}

/// A W×H RGB image stored row by row, row 0 at the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpectrogramImage {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl SpectrogramImage {
    /// Creates an all-black image.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb::BLACK; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixel at column `x`, row `y`.
    pub fn pixel(&self, x: usize, y: usize) -> Rgb {
        self.pixels[y * self.width + x]
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: Rgb) {
        self.pixels[y * self.width + x] = color;
    }

    /// All pixels of one column, top to bottom.
    pub fn column(&self, x: usize) -> impl Iterator<Item = Rgb> + '_ {
        self.pixels.iter().skip(x).step_by(self.width).copied()
    }

    /// Moves every column one pixel to the left. Column 0 is lost; the
    /// rightmost column keeps its previous content until it is overwritten.
    pub fn shift_left(&mut self) {
        for row in self.pixels.chunks_exact_mut(self.width) {
            row.copy_within(1.., 0);
        }
    }

    /// Overwrites this image with another of the same size without reallocating.
    ///
    /// # Panics
    /// * If the dimensions differ
    pub fn copy_from(&mut self, other: &SpectrogramImage) {
        assert_eq!(
            (self.width, self.height),
            (other.width, other.height),
            "spectrogram images must have the same dimensions"
        );
        self.pixels.copy_from_slice(&other.pixels);
    }

    /// Appends the image as RGBA bytes (opaque) to `out`, row by row.
    pub fn write_rgba(&self, out: &mut Vec<u8>) {
        out.reserve(self.pixels.len() * 4);
        for p in &self.pixels {
            out.extend_from_slice(&[p.r, p.g, p.b, 255]);
        }
    }
}

/// Paints spectra into the rightmost column of a [`SpectrogramImage`].
#[derive(Debug, Clone)]
pub struct SpectrogramRenderer {
    /// Spectrum bin shown by each row. Row 0 is never painted.
    row_bins: Vec<usize>,
}

impl SpectrogramRenderer {
    /// Builds the row-to-bin table for windows of `fft_size` samples and
    /// images `height` rows tall.
    pub fn new(fft_size: usize, height: usize) -> Self {
        let half = fft_size / 2;
        let row_bins = (0..height)
            .map(|y| {
                if y == 0 {
                    return 0;
                }
                let skewed = 1.0 - ((y as f32 / height as f32).ln() * ROW_SKEW).exp();
                let bin = (skewed * half as f32) as isize;
                bin.clamp(0, half.saturating_sub(1) as isize) as usize
            })
            .collect();
        Self { row_bins }
    }

    /// Spectrum bin painted into row `y`.
    pub fn row_bin(&self, y: usize) -> usize {
        self.row_bins[y]
    }

    /// Scrolls the image left by one column and paints `spectrum` into the
    /// rightmost column.
    ///
    /// Each row's level is its bin's magnitude relative to the loudest bin
    /// (floored at [`MIN_PEAK_MAGNITUDE`]). Empty, silent or non-finite input
    /// paints black.
    pub fn render_column(&self, spectrum: &[f32], image: &mut SpectrogramImage) {
        image.shift_left();
        let x = image.width() - 1;

        let peak = spectrum
            .iter()
            .copied()
            .filter(|m| m.is_finite())
            .fold(0.0f32, f32::max)
            .max(MIN_PEAK_MAGNITUDE);

        for y in 1..image.height().min(self.row_bins.len()) {
            let magnitude = match spectrum.len() {
                0 => 0.0,
                len => spectrum[self.row_bins[y].min(len - 1)],
            };
            let level = if magnitude.is_finite() {
                (magnitude / peak).clamp(0.0, 1.0)
            } else {
                0.0
            };
            image.set_pixel(x, y, hsv_to_rgb(level, 1.0, level));
        }
    }
}
