//! Fundamental geometric and simulation types.
//!
//! Screen space: x grows to the right, y grows downward. Every body is an
//! axis-aligned box whose `Position` is its top-left corner.

use std::f64::consts::{PI, TAU};

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Top-left corner of a body in screen units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Per-tick displacement in screen units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
}

/// Simulation bounds supplied by the driver each tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

/// Axis-aligned rectangle used for every overlap test.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Simulation clock: tick counter plus accumulated driver time.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimClock {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Milliseconds of driver time elapsed since the engine started.
    pub elapsed_ms: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between two points.
    pub fn distance_to(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Screen bearing to another point in radians (0 = +x, π/2 = down).
    pub fn bearing_to(&self, other: &Position) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    pub fn as_vec(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}


impl Velocity {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Velocity of magnitude `speed` along `heading`.
    pub fn from_heading(heading: f64, speed: f64) -> Self {
        Self {
            x: heading.cos() * speed,
            y: heading.sin() * speed,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    pub fn as_vec(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when the point lies outside the closed rectangle `[0,w] x [0,h]`.
    pub fn excludes_point(&self, pos: &Position) -> bool {
        pos.x < 0.0 || pos.x > self.width || pos.y < 0.0 || pos.y > self.height
    }
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn at(pos: Position, width: f64, height: f64) -> Self {
        Self::new(pos.x, pos.y, width, height)
    }

    /// Strict AABB overlap: touching edges do not collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }

    pub fn center(&self) -> Position {
        Position::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn top_left(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

impl SimClock {
    /// Advance one tick, accumulating `delta_ms` of driver time.
    pub fn advance(&mut self, delta_ms: f64) {
        self.tick += 1;
        if delta_ms.is_finite() && delta_ms > 0.0 {
            self.elapsed_ms += delta_ms;
        }
    }
}

/// Wrap an angle into `(-π, π]`. An exact `-π` maps to `π`.
pub fn normalize_angle(angle: f64) -> f64 {
    if !angle.is_finite() {
        return angle;
    }
    let mut a = angle;
    while a > PI {
        a -= TAU;
    }
    while a <= -PI {
        a += TAU;
    }
    a
}

/// Linear interpolation between `a` and `b`.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Sign that maps zero to zero (`f64::signum` maps +0.0 to 1.0).
pub fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}
