//! Geometry primitives for the layout engine

/// A resolved rectangle in a view's parent coordinate space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a zero-sized rectangle at the origin
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// The same extents with a zero origin (a view's interior coordinate space)
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Width and height as a pair
    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Snap every component onto the pixel grid for the given interface scale.
    ///
    /// The minimum representable unit is `1.0 / scale`; each component is moved
    /// to the grid line at or below it by subtracting the remainder, never
    /// rounding up. With `scale = 2.0` a raw `10.3` becomes `10.0`, not `10.5`.
    pub fn snapped(&self, scale: f32) -> Rect {
        let unit = 1.0 / scale;
        Rect::new(
            self.x - self.x % unit,
            self.y - self.y % unit,
            self.width - self.width % unit,
            self.height - self.height % unit,
        )
    }
}
