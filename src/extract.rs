use std::ops::Range;

use image::{imageops, RgbImage};

use crate::coords::NativePoint;
use crate::error::{Error, Result};

pub const DEFAULT_OUTPUT_HEIGHT: u32 = 16;

/// Full-width slice of a source image, tagged with the point it was cut around.
#[derive(Clone, Debug)]
pub struct Strip {
    pub image: RgbImage,
    pub origin: NativePoint,
}

/// Cuts fixed-height horizontal strips centered on marked points.
#[derive(Clone, Copy, Debug)]
pub struct SliceExtractor {
    output_height: u32,
}

impl SliceExtractor {
    /// Fails for a zero `output_height`, which could never produce a strip.
    pub fn new(output_height: u32) -> Result<Self> {
        if output_height == 0 {
            return Err(Error::configuration("output height must be at least 1"));
        }
        Ok(Self { output_height })
    }

    pub fn output_height(&self) -> u32 {
        self.output_height
    }

    /// Rows covered by the strip around `y`: `[y - h/2, y - h/2 + h)`.
    ///
    /// `h/2` rounds down, so an odd height puts the extra row below the point.
    pub fn window(&self, y: u32) -> Range<i64> {
        let start = i64::from(y) - i64::from(self.output_height / 2);
        start..start + i64::from(self.output_height)
    }

    /// Whether the strip around `y` lies entirely inside an image `image_height` rows tall.
    pub fn fits(&self, y: u32, image_height: u32) -> bool {
        let window = self.window(y);
        window.start >= 0 && window.end <= i64::from(image_height)
    }

    /// Cut the strip around `point`, or `None` when the image edge would clip it.
    pub fn extract(&self, image: &RgbImage, point: NativePoint) -> Option<Strip> {
        if !self.fits(point.y, image.height()) {
            return None;
        }
        // fits() guarantees 0 <= start < image height
        let top = self.window(point.y).start as u32;
        let strip = imageops::crop_imm(image, 0, top, image.width(), self.output_height).to_image();
        Some(Strip {
            image: strip,
            origin: point,
        })
    }
}

impl Default for SliceExtractor {
    fn default() -> Self {
        Self {
            output_height: DEFAULT_OUTPUT_HEIGHT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use proptest::prelude::*;

    fn extractor(height: u32) -> SliceExtractor {
        SliceExtractor::new(height).expect("nonzero height")
    }

    /// Image whose red channel encodes the row index.
    fn row_coded(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| Rgb([y as u8, x as u8, 7]))
    }

    #[test]
    fn window_is_floor_biased() {
        let even = extractor(16);
        assert_eq!(even.window(10), 2..18);
        assert_eq!(even.window(2), -6..10);
        assert_eq!(even.window(8), 0..16);

        let odd = extractor(15);
        // 7 rows above the point, 7 below plus the point itself
        assert_eq!(odd.window(10), 3..18);
        let one = extractor(1);
        assert_eq!(one.window(0), 0..1);
    }

    #[test]
    fn zero_height_is_a_configuration_error() {
        assert!(matches!(SliceExtractor::new(0), Err(Error::Configuration(_))));
        assert_eq!(SliceExtractor::default().output_height(), DEFAULT_OUTPUT_HEIGHT);
    }

    #[test]
    fn interior_point_yields_full_strip() {
        let img = row_coded(100, 200);
        let strip = extractor(16)
            .extract(&img, NativePoint::new(50, 10))
            .expect("strip inside image");

        assert_eq!(strip.image.dimensions(), (100, 16));
        assert_eq!(strip.origin, NativePoint::new(50, 10));
        // rows 2..18 of the source
        assert_eq!(strip.image.get_pixel(0, 0)[0], 2);
        assert_eq!(strip.image.get_pixel(99, 15)[0], 17);
        assert_eq!(strip.image.get_pixel(99, 15)[1], 99);
    }

    #[test]
    fn edge_clipped_points_are_rejected() {
        let img = row_coded(100, 200);
        let ex = extractor(16);
        assert!(ex.extract(&img, NativePoint::new(50, 2)).is_none());
        assert!(ex.extract(&img, NativePoint::new(50, 7)).is_none());
        assert!(ex.extract(&img, NativePoint::new(50, 8)).is_some());
        assert!(ex.extract(&img, NativePoint::new(50, 192)).is_some());
        assert!(ex.extract(&img, NativePoint::new(50, 193)).is_none());
        assert!(ex.extract(&img, NativePoint::new(50, 5_000)).is_none());
        assert!(ex.extract(&img, NativePoint::new(50, u32::MAX)).is_none());
    }

    #[test]
    fn image_exactly_one_strip_tall() {
        let img = row_coded(10, 16);
        let ex = extractor(16);
        assert!(ex.extract(&img, NativePoint::new(0, 8)).is_some());
        assert!(ex.extract(&img, NativePoint::new(0, 7)).is_none());
        assert!(ex.extract(&img, NativePoint::new(0, 9)).is_none());
    }

    #[test]
    fn x_is_not_bounds_checked() {
        let img = row_coded(10, 40);
        let strip = extractor(4)
            .extract(&img, NativePoint::new(500, 20))
            .expect("x ignored");
        assert_eq!(strip.image.width(), 10);
    }

    proptest! {
        #[test]
        fn prop_strip_height_or_rejected(
            height in 1u32..64,
            image_height in 1u32..96,
            y in 0u32..128,
        ) {
            let img = RgbImage::new(3, image_height);
            let ex = extractor(height);
            let w = ex.window(y);
            let inside = w.start >= 0 && w.end <= i64::from(image_height);
            match ex.extract(&img, NativePoint::new(1, y)) {
                Some(strip) => {
                    prop_assert!(inside);
                    prop_assert_eq!(strip.image.dimensions(), (3, height));
                }
                None => prop_assert!(!inside),
            }
        }
    }
}
