// Projection of geographic coordinates onto the drawing canvas

use crate::error::{NetworkError, Result};
use serde::{Deserialize, Serialize};

/// Target drawing area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
    /// Fraction of the coordinate range added on each side before fitting
    pub padding: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 750.0,
            height: 550.0,
            margin: 25.0,
            padding: 0.1,
        }
    }
}

impl Canvas {
    pub fn validate(&self) -> Result<()> {
        let values = [self.width, self.height, self.margin, self.padding];
        if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(NetworkError::InvalidCanvas(
                "dimensions, margin and padding must be finite and non-negative".to_string(),
            ));
        }
        if self.width <= 2.0 * self.margin || self.height <= 2.0 * self.margin {
            return Err(NetworkError::InvalidCanvas(format!(
                "a {}x{} canvas leaves no room inside a margin of {}",
                self.width, self.height, self.margin
            )));
        }
        Ok(())
    }

    pub fn inner_width(&self) -> f64 {
        self.width - 2.0 * self.margin
    }

    pub fn inner_height(&self) -> f64 {
        self.height - 2.0 * self.margin
    }

    /// Whether `(x, y)` lies inside the margins, allowing `tolerance` for rounding
    pub fn contains(&self, x: f64, y: f64, tolerance: f64) -> bool {
        x >= self.margin - tolerance
            && x <= self.width - self.margin + tolerance
            && y >= self.margin - tolerance
            && y <= self.height - self.margin + tolerance
    }
}

/// Uniform-scale mapping from raw coordinates to canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub min_x: f64,
    pub min_y: f64,
    pub scale: f64,
    pub margin: f64,
}

impl Projection {
    /// Fit the padded bounding box of `points` into `canvas`.
    ///
    /// The smaller of the per-axis scales is used so the aspect ratio is
    /// kept. An axis with zero extent contributes a scale of 1, and an empty
    /// point set yields the identity offset with scale 1.
    pub fn fit<I>(points: I, canvas: &Canvas) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut bounds: Option<(f64, f64, f64, f64)> = None;
        for (x, y) in points {
            bounds = Some(match bounds {
                None => (x, x, y, y),
                Some((min_x, max_x, min_y, max_y)) => {
                    (min_x.min(x), max_x.max(x), min_y.min(y), max_y.max(y))
                }
            });
        }

        let Some((mut min_x, mut max_x, mut min_y, mut max_y)) = bounds else {
            return Self {
                min_x: 0.0,
                min_y: 0.0,
                scale: 1.0,
                margin: canvas.margin,
            };
        };

        let x_range = max_x - min_x;
        let y_range = max_y - min_y;
        min_x -= x_range * canvas.padding;
        max_x += x_range * canvas.padding;
        min_y -= y_range * canvas.padding;
        max_y += y_range * canvas.padding;

        let x_range = max_x - min_x;
        let y_range = max_y - min_y;
        let scale_x = if x_range > 0.0 {
            canvas.inner_width() / x_range
        } else {
            1.0
        };
        let scale_y = if y_range > 0.0 {
            canvas.inner_height() / y_range
        } else {
            1.0
        };

        Self {
            min_x,
            min_y,
            scale: scale_x.min(scale_y),
            margin: canvas.margin,
        }
    }

    /// Canvas position of a raw point, rounded to two decimals
    pub fn project(&self, x: f64, y: f64) -> (f64, f64) {
        (
            round_to(self.margin + (x - self.min_x) * self.scale, 2),
            round_to(self.margin + (y - self.min_y) * self.scale, 2),
        )
    }
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
