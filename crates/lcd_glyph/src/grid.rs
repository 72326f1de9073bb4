//! Character grid geometry of the supported panel types.

use std::fmt;
use std::str::FromStr;

/// Width and height of a character grid, in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridSize {
    pub width: usize,
    pub height: usize,
}

impl GridSize {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// The same grid turned a quarter.
    pub const fn swapped(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    /// True when either side is zero; such a grid cannot be resampled to.
    pub const fn is_degenerate(self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub const fn cells(self) -> usize {
        self.width * self.height
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Panel types with a known native character grid.
///
/// Each variant is tied to a host block subtype name. Subtypes this table
/// does not list fall back to [`SurfaceProfile::Default`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SurfaceProfile {
    LargeLcdPanel5x3,
    LargeTextPanel,
    SmallLcdPanelWide,
    LargeLcdPanelWide,
    /// Square panels and every subtype not listed above.
    #[default]
    Default,
}

impl SurfaceProfile {
    pub const ALL: [SurfaceProfile; 5] = [
        SurfaceProfile::LargeLcdPanel5x3,
        SurfaceProfile::LargeTextPanel,
        SurfaceProfile::SmallLcdPanelWide,
        SurfaceProfile::LargeLcdPanelWide,
        SurfaceProfile::Default,
    ];

    /// Native grid of the panel before any rotation.
    pub const fn base_grid(self) -> GridSize {
        match self {
            SurfaceProfile::LargeLcdPanel5x3 | SurfaceProfile::LargeTextPanel => {
                GridSize::new(178, 107)
            }
            SurfaceProfile::SmallLcdPanelWide | SurfaceProfile::LargeLcdPanelWide => {
                GridSize::new(356, 178)
            }
            SurfaceProfile::Default => GridSize::new(178, 178),
        }
    }

    /// Host subtype name of the profile.
    pub const fn name(self) -> &'static str {
        match self {
            SurfaceProfile::LargeLcdPanel5x3 => "LargeLCDPanel5x3",
            SurfaceProfile::LargeTextPanel => "LargeTextPanel",
            SurfaceProfile::SmallLcdPanelWide => "SmallLCDPanelWide",
            SurfaceProfile::LargeLcdPanelWide => "LargeLCDPanelWide",
            SurfaceProfile::Default => "Default",
        }
    }

    /// Look up a host subtype name. Unknown names resolve to
    /// [`SurfaceProfile::Default`].
    pub fn from_subtype(name: &str) -> Self {
        match Self::ALL.iter().find(|p| p.name() == name) {
            Some(profile) => *profile,
            None => {
                tracing::debug!(
                    subtype = name,
                    "unknown surface subtype, using default grid"
                );
                SurfaceProfile::Default
            }
        }
    }
}

impl FromStr for SurfaceProfile {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_subtype(s))
    }
}

impl fmt::Display for SurfaceProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Rotation of a panel in quarter turns, always in `0..=3`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Orientation(u8);

impl Orientation {
    pub const NONE: Self = Self(0);

    /// Normalize any number of quarter turns into `0..=3`.
    pub const fn from_steps(steps: i32) -> Self {
        Self(steps.rem_euclid(4) as u8)
    }

    /// Convert a host rotation angle. Partial quarter turns are truncated.
    pub fn from_degrees(degrees: f32) -> Self {
        if !degrees.is_finite() {
            return Self::NONE;
        }
        Self::from_steps((degrees / 90.0) as i32)
    }

    pub const fn steps(self) -> u8 {
        self.0
    }

    /// Odd quarter turns swap the grid's width and height.
    pub const fn is_transposed(self) -> bool {
        self.0 % 2 == 1
    }
}

/// Character grid of `profile` as seen after rotating it by `orientation`.
pub fn resolve_grid(profile: SurfaceProfile, orientation: Orientation) -> GridSize {
    let base = profile.base_grid();
    let grid = if orientation.is_transposed() {
        base.swapped()
    } else {
        base
    };
    tracing::debug!(%profile, rotation = orientation.steps(), %grid, "resolved character grid");
    grid
}
