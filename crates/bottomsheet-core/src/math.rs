//! Vector math and float comparison helpers.
//!
//! Gesture translations, velocities and touch locations are carried as
//! [`Vec2`] from the [`glam`] crate.
//!
//! ```
//! use bottomsheet_core::math::{Vec2, is_almost_equal};
//!
//! let translation = Vec2::new(0.0, 120.0);
//! assert!(is_almost_equal(translation.y / 600.0, 0.2));
//! ```
//!
//! [`glam`]: https://docs.rs/glam

pub use glam::{Vec2, vec2};

/// Relative tolerance used by [`is_almost_equal`].
pub const ALMOST_EQUAL_TOLERANCE: f32 = 1e-4;

/// Compare two floats, tolerating rounding noise.
///
/// The tolerance scales with the magnitude of the operands, but never drops
/// below [`ALMOST_EQUAL_TOLERANCE`] so comparisons against zero still work.
pub fn is_almost_equal(a: f32, b: f32) -> bool {
    if a == b {
        return true;
    }
    let scale = a.abs().max(b.abs()).max(1.0);
    (a - b).abs() <= ALMOST_EQUAL_TOLERANCE * scale
}
