//! Viewport reconciliation
//!
//! The display reports a logical size and a device pixel ratio; the backing
//! surface must be `floor(logical * ratio)` pixels. Reallocating a surface is
//! expensive, so reconciliation only mutates when the computed size differs from
//! what the surface already has.

use crate::core::config::ViewportConfig;

/// Output surface dimensions
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    logical_width: f32,
    logical_height: f32,
    pixel_ratio: f32,
    backing_width: u32,
    backing_height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::from_config(&ViewportConfig::default())
    }
}

impl Viewport {
    /// Viewport whose backing surface has not been allocated yet
    ///
    /// The first reconciliation against any non-empty display resizes it.
    pub fn unallocated() -> Self {
        Self {
            logical_width: 0.0,
            logical_height: 0.0,
            pixel_ratio: 1.0,
            backing_width: 0,
            backing_height: 0,
        }
    }

    /// Viewport already reconciled to the configured display
    pub fn from_config(config: &ViewportConfig) -> Self {
        let mut viewport = Self::unallocated();
        viewport.reconcile(config.width, config.height, config.pixel_ratio);
        viewport
    }

    /// Logical width
    pub fn logical_width(&self) -> f32 {
        self.logical_width
    }

    /// Logical height
    pub fn logical_height(&self) -> f32 {
        self.logical_height
    }

    /// Device pixel ratio
    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    /// Backing surface width in pixels
    pub fn backing_width(&self) -> u32 {
        self.backing_width
    }

    /// Backing surface height in pixels
    pub fn backing_height(&self) -> u32 {
        self.backing_height
    }

    /// Backing surface size in pixels
    pub fn backing_size(&self) -> (u32, u32) {
        (self.backing_width, self.backing_height)
    }

    /// Logical aspect ratio; 1.0 for a zero-height display
    pub fn aspect(&self) -> f32 {
        aspect_of(self.logical_width, self.logical_height)
    }

    /// Backing size a display of this size and ratio needs
    pub fn target_size(display_width: f32, display_height: f32, pixel_ratio: f32) -> (u32, u32) {
        (
            to_pixels(display_width * pixel_ratio),
            to_pixels(display_height * pixel_ratio),
        )
    }

    /// Bring the backing surface in line with the display
    ///
    /// Returns `true` when the backing size changed; the caller must then resize
    /// the real surface and update any projection depending on the aspect ratio.
    /// Returns `false` and leaves every field untouched otherwise.
    pub fn reconcile(&mut self, display_width: f32, display_height: f32, pixel_ratio: f32) -> bool {
        let (width, height) = Self::target_size(display_width, display_height, pixel_ratio);
        if (width, height) == self.backing_size() {
            return false;
        }

        log::debug!(
            "Viewport resize {}x{} -> {}x{} (display {}x{} @ {}x)",
            self.backing_width,
            self.backing_height,
            width,
            height,
            display_width,
            display_height,
            pixel_ratio
        );

        self.logical_width = display_width.max(0.0);
        self.logical_height = display_height.max(0.0);
        self.pixel_ratio = pixel_ratio;
        self.backing_width = width;
        self.backing_height = height;
        true
    }
}

/// Aspect ratio guarded against a zero-height display
pub fn aspect_of(width: f32, height: f32) -> f32 {
    if height > 0.0 && width > 0.0 {
        width / height
    } else {
        1.0
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_pixels(value: f32) -> u32 {
    // `as` saturates: negative and NaN become 0
    value.floor() as u32
}
