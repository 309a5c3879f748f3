use std::fmt;

use serde::{Deserialize, Serialize};

/// Outer rectangle of a surface in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 800,
            height: 600,
        }
    }
}

/// Usable area of the display a surface is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

/// Per-surface toggles exposed as `set*` window actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WindowFlag {
    Resizable,
    Movable,
    AlwaysOnTop,
    FullScreen,
    ShowInTaskbar,
    Closable,
    Minimizable,
    /// Also governs whether the surface may enter full screen.
    Maximizable,
    MenuBarVisible,
    WindowControlsVisible,
}

impl fmt::Display for WindowFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A pixel count or a percentage of the work area, written `640` or `"50%"`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "RawLength")]
pub enum Length {
    Px(f64),
    Percent(f64),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLength {
    Number(f64),
    Text(String),
}

impl TryFrom<RawLength> for Length {
    type Error = String;

    fn try_from(raw: RawLength) -> Result<Self, Self::Error> {
        match raw {
            RawLength::Number(px) => Ok(Length::Px(px)),
            RawLength::Text(text) => text
                .trim()
                .strip_suffix('%')
                .and_then(|n| n.trim().parse::<f64>().ok())
                .filter(|n| n.is_finite())
                .map(Length::Percent)
                .ok_or_else(|| format!("expected a number or a percentage like \"50%\", got {text:?}")),
        }
    }
}

impl Length {
    fn resolve(self, extent: u32) -> f64 {
        match self {
            Length::Px(px) => px,
            Length::Percent(pct) => f64::from(extent) * pct / 100.0,
        }
    }
}

/// Which point of the surface `x`/`y` place. `center-left` is vertically
/// centered on the left edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Origin {
    Top,
    TopLeft,
    TopRight,
    Bottom,
    BottomLeft,
    BottomRight,
    #[default]
    Center,
    CenterLeft,
    CenterRight,
}

#[derive(Clone, Copy)]
enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    fn offset(self, extent: u32) -> f64 {
        match self {
            Anchor::Start => 0.0,
            Anchor::Middle => -f64::from(extent) / 2.0,
            Anchor::End => -f64::from(extent),
        }
    }
}

impl Origin {
    fn horizontal(self) -> Anchor {
        match self {
            Origin::TopLeft | Origin::BottomLeft | Origin::CenterLeft => Anchor::Start,
            Origin::TopRight | Origin::BottomRight | Origin::CenterRight => Anchor::End,
            Origin::Top | Origin::Bottom | Origin::Center => Anchor::Middle,
        }
    }

    fn vertical(self) -> Anchor {
        match self {
            Origin::Top | Origin::TopLeft | Origin::TopRight => Anchor::Start,
            Origin::Bottom | Origin::BottomLeft | Origin::BottomRight => Anchor::End,
            Origin::Center | Origin::CenterLeft | Origin::CenterRight => Anchor::Middle,
        }
    }
}

/// Argument of the `setDimensions` action. Absent fields keep their value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Dimensions {
    pub width: Option<Length>,
    pub height: Option<Length>,
    pub x: Option<Length>,
    pub y: Option<Length>,
    pub origin: Origin,
}

// Half-up rounding, so -2.5 becomes -2 like the renderer side.
fn round_px(v: f64) -> f64 {
    (v + 0.5).floor()
}

impl Dimensions {
    /// Resize first, then place the origin point of the resized surface at
    /// `x`/`y`. The origin offset only applies on axes that were given.
    pub fn apply(&self, current: Bounds, work_area: Size) -> Bounds {
        let mut next = current;

        if let Some(width) = self.width {
            next.width = round_px(width.resolve(work_area.width)).max(0.0) as u32;
        }
        if let Some(height) = self.height {
            next.height = round_px(height.resolve(work_area.height)).max(0.0) as u32;
        }

        if let Some(x) = self.x {
            let left = x.resolve(work_area.width) + self.origin.horizontal().offset(next.width);
            next.x = round_px(left) as i32;
        }
        if let Some(y) = self.y {
            let top = y.resolve(work_area.height) + self.origin.vertical().offset(next.height);
            next.y = round_px(top) as i32;
        }

        next
    }
}
