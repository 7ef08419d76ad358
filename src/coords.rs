use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Pixel position in the source image's own resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NativePoint {
    pub x: u32,
    pub y: u32,
}

impl NativePoint {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Pixel position on the displayed (scaled up) image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenPoint {
    pub x: u32,
    pub y: u32,
}

impl ScreenPoint {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Integer factor by which every source image is scaled up for display.
///
/// Computed once per session from the display width and the width of the
/// first catalogued image. Always at least 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScalingFactor(u32);

impl ScalingFactor {
    /// `floor(display_width / native_width)`, rejecting a display narrower than the image.
    pub fn new(display_width: u32, native_width: u32) -> Result<Self> {
        if native_width == 0 {
            return Err(Error::configuration("source image has zero width"));
        }
        let factor = display_width / native_width;
        if factor == 0 {
            return Err(Error::configuration(format!(
                "display width {display_width} px is narrower than the images ({native_width} px)"
            )));
        }
        Ok(Self(factor))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Convert screen-space coords to native-space
    pub fn screen_to_native(self, screen: ScreenPoint) -> NativePoint {
        NativePoint {
            x: screen.x / self.0,
            y: screen.y / self.0,
        }
    }

    /// Convert native-space coords to the top-left screen pixel they cover
    pub fn native_to_screen(self, native: NativePoint) -> ScreenPoint {
        ScreenPoint {
            x: native.x.saturating_mul(self.0),
            y: native.y.saturating_mul(self.0),
        }
    }

    /// On-screen size of an image with the given native size.
    pub fn display_size(self, width: u32, height: u32) -> (u32, u32) {
        (width.saturating_mul(self.0), height.saturating_mul(self.0))
    }
}

/// Free-function form of [`ScalingFactor::screen_to_native`].
pub fn screen_to_native(screen_x: u32, screen_y: u32, factor: ScalingFactor) -> NativePoint {
    factor.screen_to_native(ScreenPoint::new(screen_x, screen_y))
}
