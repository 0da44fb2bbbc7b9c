//! Sheet configuration, sizing resolution and interaction tuning.
//!
//! A [`SheetConfiguration`] is immutable for the lifetime of one presentation.
//! Its optional extents and size preset collapse into a [`Sizing`] variant,
//! which [`resolve_extents`] turns into concrete portrait/landscape extents.
//!
//! # Example
//!
//! ```
//! use bottomsheet::configuration::{DrawerSize, Extents, SheetConfiguration, resolve_extents};
//! use bottomsheet_core::geometry::Size;
//!
//! let config = SheetConfiguration::new()
//!     .corner_radius(20.0)
//!     .size_preset(DrawerSize::Half);
//!
//! let extents = resolve_extents(&config.sizing(), Size::new(390.0, 844.0), Extents::ZERO);
//! assert_eq!(extents.portrait, 422.0);
//! assert_eq!(extents.landscape, 195.0);
//! ```

use bottomsheet_core::geometry::{Pos, Rect, Size};

/// Edge the sheet is laid out against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SheetOrientation {
    /// Full width, anchored to the bottom of the screen.
    Portrait,
    /// Full height, anchored to the right of the screen.
    Landscape,
}

impl SheetOrientation {
    /// Orientation implied by the screen's aspect.
    pub fn for_screen(screen: Size<f32>) -> Self {
        if screen.is_portrait() {
            SheetOrientation::Portrait
        } else {
            SheetOrientation::Landscape
        }
    }
}

/// Size presets resolved against the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawerSize {
    Half,
    Full,
}

impl DrawerSize {
    fn resolve(&self, axis: f32) -> f32 {
        match self {
            DrawerSize::Half => axis / 2.0,
            DrawerSize::Full => axis,
        }
    }
}

/// Area of the presented surface that opts out of sheet dragging.
///
/// Touches inside it are left to the embedded control that owns the region.
/// The frame is expressed in the presented surface's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterceptRegion {
    pub frame: Rect<f32>,
}

impl InterceptRegion {
    pub fn new(frame: Rect<f32>) -> Self {
        Self { frame }
    }

    pub fn contains(&self, point: Pos<f32>) -> bool {
        self.frame.contains(point)
    }
}

/// Configuration for a single bottom sheet presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetConfiguration {
    /// Radius applied to the top corners.
    pub corner_radius: f32,
    /// Layout edge; `None` follows the screen's aspect.
    pub orientation: Option<SheetOrientation>,
    pub gesture_intercept_region: Option<InterceptRegion>,
    /// Extent used in portrait (height of the sheet).
    pub portrait_extent: Option<f32>,
    /// Extent used in landscape.
    pub landscape_extent: Option<f32>,
    pub size_preset: Option<DrawerSize>,
}

impl Default for SheetConfiguration {
    fn default() -> Self {
        Self {
            corner_radius: 10.0,
            orientation: None,
            gesture_intercept_region: None,
            portrait_extent: None,
            landscape_extent: None,
            size_preset: None,
        }
    }
}

impl SheetConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration used by drawers when the caller supplies nothing:
    /// zero extents and a half-screen preset.
    pub fn drawer_default() -> Self {
        Self {
            portrait_extent: Some(0.0),
            landscape_extent: Some(0.0),
            size_preset: Some(DrawerSize::Half),
            ..Self::default()
        }
    }

    pub fn corner_radius(mut self, radius: f32) -> Self {
        self.corner_radius = radius;
        self
    }

    pub fn orientation(mut self, orientation: SheetOrientation) -> Self {
        self.orientation = Some(orientation);
        self
    }

    pub fn gesture_intercept_region(mut self, region: InterceptRegion) -> Self {
        self.gesture_intercept_region = Some(region);
        self
    }

    pub fn portrait_extent(mut self, extent: f32) -> Self {
        self.portrait_extent = Some(extent);
        self
    }

    pub fn landscape_extent(mut self, extent: f32) -> Self {
        self.landscape_extent = Some(extent);
        self
    }

    pub fn size_preset(mut self, size: DrawerSize) -> Self {
        self.size_preset = Some(size);
        self
    }

    /// Collapse the optional sizing fields into the authoritative variant.
    ///
    /// Positive explicit extents win over the preset; zero extents count as unset.
    pub fn sizing(&self) -> Sizing {
        let portrait = self.portrait_extent.filter(|extent| *extent > 0.0);
        let landscape = self.landscape_extent.filter(|extent| *extent > 0.0);

        if portrait.is_some() || landscape.is_some() {
            Sizing::Explicit {
                portrait,
                landscape,
            }
        } else if let Some(size) = self.size_preset {
            Sizing::Preset(size)
        } else {
            Sizing::Inherited
        }
    }

    /// Copy of this configuration with concrete extents and no preset.
    pub fn with_extents(&self, extents: Extents) -> Self {
        Self {
            portrait_extent: Some(extents.portrait),
            landscape_extent: Some(extents.landscape),
            size_preset: None,
            ..self.clone()
        }
    }

    /// Copy with the given orientation.
    pub fn with_orientation(&self, orientation: SheetOrientation) -> Self {
        Self {
            orientation: Some(orientation),
            ..self.clone()
        }
    }
}

/// Where the sheet's extents come from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sizing {
    /// Caller supplied extents; missing axes are inherited.
    Explicit {
        portrait: Option<f32>,
        landscape: Option<f32>,
    },
    /// Resolved against the current screen bounds.
    Preset(DrawerSize),
    /// Keep whatever was resolved before.
    Inherited,
}

/// Resolved sheet extents for both orientations.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Extents {
    pub portrait: f32,
    pub landscape: f32,
}

impl Extents {
    pub const ZERO: Self = Extents {
        portrait: 0.0,
        landscape: 0.0,
    };

    pub fn new(portrait: f32, landscape: f32) -> Self {
        Self {
            portrait,
            landscape,
        }
    }
}

/// Resolve the sheet's extents.
///
/// Per axis: an explicit extent, else the preset against the screen, else the
/// previous non-zero value, else half of the screen. Portrait extents resolve
/// against the screen height, landscape extents against its width.
pub fn resolve_extents(sizing: &Sizing, screen: Size<f32>, previous: Extents) -> Extents {
    let (explicit_portrait, explicit_landscape, preset) = match *sizing {
        Sizing::Explicit {
            portrait,
            landscape,
        } => (portrait, landscape, None),
        Sizing::Preset(size) => (None, None, Some(size)),
        Sizing::Inherited => (None, None, None),
    };

    let resolve_axis = |explicit: Option<f32>, previous: f32, axis: f32| -> f32 {
        explicit
            .or_else(|| preset.map(|size| size.resolve(axis)))
            .or(Some(previous).filter(|value| *value > 0.0))
            .unwrap_or(axis / 2.0)
    };

    Extents {
        portrait: resolve_axis(explicit_portrait, previous.portrait, screen.height),
        landscape: resolve_axis(explicit_landscape, previous.landscape, screen.width),
    }
}

/// Empirical interaction constants.
///
/// The defaults are tuned values; change them only to alter the feel of the
/// flick-to-dismiss gesture or the layout animations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetTuning {
    /// Magnitude of the deceleration used to project a release (points/s²).
    pub deceleration: f32,
    /// Projected progress at or above which a release commits the dismissal.
    pub commit_threshold: f32,
    /// Duration of animated re-layout (seconds).
    pub layout_animation_duration: f32,
    /// Duration of presentation and dismissal transitions (seconds).
    pub transition_duration: f32,
}

impl Default for SheetTuning {
    fn default() -> Self {
        Self {
            deceleration: 800.0,
            commit_threshold: 0.5,
            layout_animation_duration: 0.3,
            transition_duration: 0.3,
        }
    }
}
