use std::ops::Mul;

use crate::math::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect<T> {
    pub x: T,
    pub y: T,
    pub width: T,
    pub height: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size<T> {
    pub width: T,
    pub height: T,
}

impl<T> Size<T> {
    pub fn new(width: T, height: T) -> Self {
        Size { width, height }
    }

    pub fn cast<U: From<T>>(self) -> Size<U> {
        Size {
            width: U::from(self.width),
            height: U::from(self.height),
        }
    }
}

impl<T: Mul + Copy> Mul<T> for Size<T> {
    type Output = Size<<T as Mul>::Output>;

    fn mul(self, rhs: T) -> Self::Output {
        Size {
            width: self.width * rhs,
            height: self.height * rhs,
        }
    }
}

impl Size<f32> {
    pub const ZERO: Self = Size {
        width: 0.0,
        height: 0.0,
    };

    /// True when the height is at least the width.
    pub fn is_portrait(&self) -> bool {
        self.height >= self.width
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pos<T> {
    pub x: T,
    pub y: T,
}

impl<T> Pos<T> {
    pub fn new(x: T, y: T) -> Self {
        Pos { x, y }
    }
}

impl From<Vec2> for Pos<f32> {
    fn from(v: Vec2) -> Self {
        Pos { x: v.x, y: v.y }
    }
}

impl From<Pos<f32>> for Vec2 {
    fn from(p: Pos<f32>) -> Self {
        Vec2::new(p.x, p.y)
    }
}

/// Insets from each edge of a rectangle (safe area, content insets).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EdgeInsets<T> {
    pub top: T,
    pub left: T,
    pub bottom: T,
    pub right: T,
}

impl EdgeInsets<f32> {
    pub const ZERO: Self = EdgeInsets {
        top: 0.0,
        left: 0.0,
        bottom: 0.0,
        right: 0.0,
    };

    pub fn new(top: f32, left: f32, bottom: f32, right: f32) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// Sum of the top and bottom insets.
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

impl<T> Rect<T> {
    pub fn new(x: T, y: T, width: T, height: T) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }
}

impl Rect<f32> {
    pub const ZERO: Self = Rect {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub fn from_size(size: Size<f32>) -> Self {
        Rect::new(0.0, 0.0, size.width, size.height)
    }

    pub fn origin(&self) -> Pos<f32> {
        Pos::new(self.x, self.y)
    }

    pub fn size(&self) -> Size<f32> {
        Size::new(self.width, self.height)
    }

    pub fn max_x(&self) -> f32 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f32 {
        self.y + self.height
    }

    /// The same size at the origin, i.e. the rect in its own coordinate space.
    pub fn bounds(&self) -> Rect<f32> {
        Rect::from_size(self.size())
    }

    /// Half-open containment: the minimum edges are inside, the maximum edges are not.
    pub fn contains(&self, point: Pos<f32>) -> bool {
        point.x >= self.x && point.x < self.max_x() && point.y >= self.y && point.y < self.max_y()
    }

    /// Linear interpolation between two frames.
    pub fn lerp(&self, other: &Rect<f32>, t: f32) -> Rect<f32> {
        Rect::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
            self.width + (other.width - self.width) * t,
            self.height + (other.height - self.height) * t,
        )
    }

    /// Round every component up to the device pixel grid.
    pub fn pixel_ceiled(&self, scale: f32) -> Rect<f32> {
        Rect::new(
            pixel_ceil(self.x, scale),
            pixel_ceil(self.y, scale),
            pixel_ceil(self.width, scale),
            pixel_ceil(self.height, scale),
        )
    }
}

/// Round `value` up to the nearest multiple of `1 / scale`.
///
/// With a scale of 3, `123.3` becomes `123.333...`. Non-positive scales fall
/// back to whole points.
pub fn pixel_ceil(value: f32, scale: f32) -> f32 {
    if scale <= 0.0 {
        return value.ceil();
    }
    (value * scale).ceil() / scale
}
