/// Viewport - the axis-aligned pixel rectangle covering the rendering surface
///
/// The origin is always `(0, 0)`; only surface resizes change the extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    /// Left edge in pixels
    pub x: u32,
    /// Bottom edge in pixels
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Viewport {
    /// Create a viewport covering the full surface of the given size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    /// True when the viewport encloses no pixels
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width over height, or 1.0 for an empty viewport
    pub fn aspect_ratio(&self) -> f32 {
        if self.is_empty() {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    /// Total number of pixels
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_covers_full_surface() {
        let vp = Viewport::new(800, 600);
        assert_eq!(vp.x, 0);
        assert_eq!(vp.y, 0);
        assert_eq!(vp.width, 800);
        assert_eq!(vp.height, 600);
    }

    #[test]
    fn test_default_is_empty() {
        let vp = Viewport::default();
        assert!(vp.is_empty());
        assert_eq!(vp.pixel_count(), 0);
    }

    #[test]
    fn test_aspect_ratio() {
        let vp = Viewport::new(1920, 1080);
        assert!((vp.aspect_ratio() - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_aspect_ratio_is_one() {
        assert_eq!(Viewport::new(0, 600).aspect_ratio(), 1.0);
        assert_eq!(Viewport::new(800, 0).aspect_ratio(), 1.0);
    }

    #[test]
    fn test_pixel_count() {
        let vp = Viewport::new(640, 480);
        assert_eq!(vp.pixel_count(), 307200);
    }

    #[test]
    fn test_copy_semantics() {
        let a = Viewport::new(100, 50);
        let b = a;
        assert_eq!(a, b);
    }
}
