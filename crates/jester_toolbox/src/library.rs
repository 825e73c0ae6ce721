//! Small gameplay helpers: time text, angle unwinding, bounded ranges
//!
//! Tag helpers live on [`jester_core::Tag`] and [`jester_core::TagTree`].

use std::ops::{Bound, RangeBounds};

use rand::Rng;

/// Format a duration as `HH:MM:SS`, or `MM:SS` under an hour. Fractions
/// are truncated and negative durations read as zero.
pub fn time_duration_to_text(seconds: f32) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

/// Bring an angle in degrees into (-180, 180]
pub fn unwind_degrees(angle: f32) -> f32 {
    let wrapped = angle % 360.0;
    if wrapped > 180.0 {
        wrapped - 360.0
    } else if wrapped <= -180.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

/// Unwind each axis of a pitch/yaw/roll rotation
pub fn unwind_rotation(rotation: [f32; 3]) -> [f32; 3] {
    rotation.map(unwind_degrees)
}

/// Float range with independently inclusive, exclusive or open ends
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatBounds {
    pub lower: Bound<f32>,
    pub upper: Bound<f32>,
}

impl FloatBounds {
    pub fn new(lower: Bound<f32>, upper: Bound<f32>) -> Self {
        Self { lower, upper }
    }

    /// `[min, max]`
    pub fn inclusive(min: f32, max: f32) -> Self {
        Self::new(Bound::Included(min), Bound::Included(max))
    }

    /// `(min, max)`
    pub fn exclusive(min: f32, max: f32) -> Self {
        Self::new(Bound::Excluded(min), Bound::Excluded(max))
    }

    /// No limits at either end
    pub fn unbounded() -> Self {
        Self::new(Bound::Unbounded, Bound::Unbounded)
    }

    pub fn contains(&self, value: f32) -> bool {
        (self.lower, self.upper).contains(&value)
    }

    /// Closed limits. Exclusive ends move inward by `f32::EPSILON`, open
    /// ends become the float extremes.
    pub fn limits(&self) -> (f32, f32) {
        let min = match self.lower {
            Bound::Included(v) => v,
            Bound::Excluded(v) => v + f32::EPSILON,
            Bound::Unbounded => f32::MIN,
        };
        let max = match self.upper {
            Bound::Included(v) => v,
            Bound::Excluded(v) => v - f32::EPSILON,
            Bound::Unbounded => f32::MAX,
        };
        (min, max)
    }

    /// Clamp into [`FloatBounds::limits`]. An inverted range yields its
    /// upper limit.
    pub fn clamp(&self, value: f32) -> f32 {
        let (min, max) = self.limits();
        value.max(min).min(max)
    }

    /// Uniform value within [`FloatBounds::limits`], `None` for an
    /// inverted range
    pub fn pick_random<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<f32> {
        let (min, max) = self.limits();
        if min > max {
            return None;
        }
        // Weighted sum stays finite across the whole f32 range
        let t: f32 = rng.gen();
        Some((min * (1.0 - t) + max * t).max(min).min(max))
    }
}

impl Default for FloatBounds {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Integer range with independently inclusive, exclusive or open ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntBounds {
    pub lower: Bound<i32>,
    pub upper: Bound<i32>,
}

impl IntBounds {
    pub fn new(lower: Bound<i32>, upper: Bound<i32>) -> Self {
        Self { lower, upper }
    }

    /// `[min, max]`
    pub fn inclusive(min: i32, max: i32) -> Self {
        Self::new(Bound::Included(min), Bound::Included(max))
    }

    /// `(min, max)`
    pub fn exclusive(min: i32, max: i32) -> Self {
        Self::new(Bound::Excluded(min), Bound::Excluded(max))
    }

    pub fn unbounded() -> Self {
        Self::new(Bound::Unbounded, Bound::Unbounded)
    }

    pub fn contains(&self, value: i32) -> bool {
        (self.lower, self.upper).contains(&value)
    }

    /// Closed limits. Exclusive ends move inward by one, open ends become
    /// the integer extremes.
    pub fn limits(&self) -> (i32, i32) {
        let min = match self.lower {
            Bound::Included(v) => v,
            Bound::Excluded(v) => v.saturating_add(1),
            Bound::Unbounded => i32::MIN,
        };
        let max = match self.upper {
            Bound::Included(v) => v,
            Bound::Excluded(v) => v.saturating_sub(1),
            Bound::Unbounded => i32::MAX,
        };
        (min, max)
    }

    /// Clamp into [`IntBounds::limits`]. An inverted range yields its
    /// upper limit.
    pub fn clamp(&self, value: i32) -> i32 {
        let (min, max) = self.limits();
        value.max(min).min(max)
    }

    /// Uniform value within [`IntBounds::limits`], `None` for an empty range
    pub fn pick_random<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<i32> {
        let (min, max) = self.limits();
        (min <= max).then(|| rng.gen_range(min..=max))
    }
}

impl Default for IntBounds {
    fn default() -> Self {
        Self::unbounded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_time_text() {
        assert_eq!(time_duration_to_text(0.0), "00:00");
        assert_eq!(time_duration_to_text(59.9), "00:59");
        assert_eq!(time_duration_to_text(754.0), "12:34");
        assert_eq!(time_duration_to_text(3600.0), "01:00:00");
        assert_eq!(time_duration_to_text(3723.5), "01:02:03");
        assert_eq!(time_duration_to_text(-5.0), "00:00");
    }

    #[test]
    fn test_unwind() {
        assert_eq!(unwind_degrees(0.0), 0.0);
        assert_eq!(unwind_degrees(180.0), 180.0);
        assert_eq!(unwind_degrees(-180.0), 180.0);
        assert_eq!(unwind_degrees(270.0), -90.0);
        assert_eq!(unwind_degrees(-270.0), 90.0);
        assert_eq!(unwind_degrees(720.0 + 45.0), 45.0);
        assert_eq!(unwind_rotation([360.0, 190.0, -190.0]), [0.0, -170.0, 170.0]);
    }

    #[test]
    fn test_float_bounds() {
        let closed = FloatBounds::inclusive(0.0, 1.0);
        assert!(closed.contains(0.0));
        assert!(closed.contains(1.0));
        assert!(!closed.contains(1.5));
        assert_eq!(closed.clamp(-3.0), 0.0);
        assert_eq!(closed.clamp(3.0), 1.0);

        let open = FloatBounds::exclusive(0.0, 1.0);
        assert!(!open.contains(0.0));
        assert_eq!(open.clamp(-3.0), f32::EPSILON);
        assert_eq!(open.clamp(3.0), 1.0 - f32::EPSILON);

        let above = FloatBounds::new(Bound::Included(2.0), Bound::Unbounded);
        assert_eq!(above.clamp(1e30), 1e30);
        assert_eq!(above.clamp(0.0), 2.0);
        assert_eq!(FloatBounds::unbounded().clamp(-1e30), -1e30);
    }

    #[test]
    fn test_int_bounds() {
        let bounds = IntBounds::exclusive(0, 10);
        assert!(!bounds.contains(0));
        assert!(bounds.contains(9));
        assert_eq!(bounds.clamp(-5), 1);
        assert_eq!(bounds.clamp(50), 9);
        assert_eq!(IntBounds::unbounded().limits(), (i32::MIN, i32::MAX));
        assert_eq!(
            IntBounds::new(Bound::Excluded(i32::MAX), Bound::Unbounded).limits(),
            (i32::MAX, i32::MAX)
        );
    }

    #[test]
    fn test_pick_random_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let floats = FloatBounds::exclusive(-0.5, 0.5);
        let ints = IntBounds::inclusive(3, 5);
        for _ in 0..200 {
            let f = floats.pick_random(&mut rng).unwrap();
            assert!(floats.contains(f), "{} escaped", f);
            let i = ints.pick_random(&mut rng).unwrap();
            assert!((3..=5).contains(&i));
        }

        let wide = FloatBounds::unbounded().pick_random(&mut rng).unwrap();
        assert!(wide.is_finite());
    }

    #[test]
    fn test_pick_random_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(IntBounds::exclusive(4, 5).pick_random(&mut rng), None);
        assert_eq!(FloatBounds::inclusive(1.0, 0.0).pick_random(&mut rng), None);
        assert_eq!(IntBounds::exclusive(4, 6).pick_random(&mut rng), Some(5));
    }
}
