//! Float curves and a curve that scales on both axes
//!
//! [`ScalableCurve`] keeps a normalized curve and stretches it into the
//! range a caller needs, so one authored shape serves many durations.

use serde::{Deserialize, Serialize};

/// Keys closer than this in time are treated as the same key
const KEY_TIME_TOLERANCE: f32 = 1.0e-4;

/// Keyframed scalar function of time
pub trait FloatCurve {
    /// Value at `time`
    fn eval(&self, time: f32) -> f32;

    /// Number of keys
    fn key_count(&self) -> usize;

    /// First and last key times, `(0.0, 0.0)` with no keys
    fn time_range(&self) -> (f32, f32);

    /// Set the value of the key at `time`, adding one if none is there
    fn update_or_add_key(&mut self, time: f32, value: f32);
}

/// Single curve key
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveKey {
    pub time: f32,
    pub value: f32,
}

/// Linearly interpolated curve, held constant past its first and last keys
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RichCurve {
    keys: Vec<CurveKey>,
}

impl RichCurve {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from keys in any order
    pub fn from_keys(keys: impl IntoIterator<Item = (f32, f32)>) -> Self {
        let mut curve = Self::new();
        for (time, value) in keys {
            curve.update_or_add_key(time, value);
        }
        curve
    }

    /// Keys sorted by time
    pub fn keys(&self) -> &[CurveKey] {
        &self.keys
    }
}

impl FloatCurve for RichCurve {
    fn eval(&self, time: f32) -> f32 {
        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return 0.0;
        };
        if time.is_nan() {
            return f32::NAN;
        }
        if time <= first.time {
            return first.value;
        }
        if time >= last.time {
            return last.value;
        }

        let next = self.keys.partition_point(|key| key.time <= time);
        let (a, b) = (self.keys[next - 1], self.keys[next]);
        let alpha = (time - a.time) / (b.time - a.time);
        a.value + (b.value - a.value) * alpha
    }

    fn key_count(&self) -> usize {
        self.keys.len()
    }

    fn time_range(&self) -> (f32, f32) {
        match (self.keys.first(), self.keys.last()) {
            (Some(first), Some(last)) => (first.time, last.time),
            _ => (0.0, 0.0),
        }
    }

    fn update_or_add_key(&mut self, time: f32, value: f32) {
        if time.is_nan() {
            log::warn!("Ignoring curve key with NaN time (value {})", value);
            return;
        }
        if let Some(key) = self
            .keys
            .iter_mut()
            .find(|key| (key.time - time).abs() < KEY_TIME_TOLERANCE)
        {
            key.value = value;
            return;
        }
        let index = self.keys.partition_point(|key| key.time < time);
        self.keys.insert(index, CurveKey { time, value });
    }
}

/// Normalized curve scaled in time by `scale_x` and in value by `scale_y`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalableCurve<C = RichCurve> {
    curve: C,
    pub scale_x: f32,
    pub scale_y: f32,
}

impl<C: FloatCurve> ScalableCurve<C> {
    /// Wrap `curve` at unit scale
    pub fn new(curve: C) -> Self {
        Self {
            curve,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    /// Set both scales
    pub fn with_scale(mut self, scale_x: f32, scale_y: f32) -> Self {
        self.scale_x = scale_x;
        self.scale_y = scale_y;
        self
    }

    /// Underlying normalized curve
    pub fn curve(&self) -> &C {
        &self.curve
    }

    /// Check if the curve has any keys
    pub fn has_curve(&self) -> bool {
        self.curve.key_count() > 0
    }

    /// Scaled value at scaled time `time`
    pub fn evaluate(&self, time: f32) -> f32 {
        self.curve.eval(time / self.scale_x) * self.scale_y
    }

    /// Add or update a key in normalized space
    pub fn add_key_normalized(&mut self, time: f32, value: f32) {
        self.curve.update_or_add_key(time, value);
    }

    /// Scaled end time and the scaled value there
    pub fn time_range(&self) -> (f32, f32) {
        let (_, end) = self.curve.time_range();
        (end * self.scale_x, self.curve.eval(end) * self.scale_y)
    }
}

impl<C: FloatCurve + Default> Default for ScalableCurve<C> {
    fn default() -> Self {
        Self::new(C::default())
    }
}
