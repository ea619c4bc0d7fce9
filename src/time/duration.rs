//! Signed spans of virtual time.

use core::fmt;
use core::ops::{Add, Mul, Neg, Sub};

const NANOS_PER_MICRO: i64 = 1_000;
const NANOS_PER_MILLI: i64 = 1_000_000;
const NANOS_PER_SEC: i64 = 1_000_000_000;

/// A signed span of virtual time, counted in nanoseconds.
///
/// All arithmetic saturates: results past the representable range clamp to
/// [`Duration::MIN`] or [`Duration::MAX`] instead of wrapping or panicking.
/// Unit constructors saturate the same way, so conversions from large
/// second counts (or out-of-range floating-point values) stay total.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Duration(i64);

impl Duration {
    /// The zero-length span.
    pub const ZERO: Self = Self(0);

    /// The most negative representable span.
    pub const MIN: Self = Self(i64::MIN);

    /// The largest representable span.
    pub const MAX: Self = Self(i64::MAX);

    /// Creates a duration from a nanosecond count.
    #[must_use]
    pub const fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    /// Creates a duration from microseconds, saturating on overflow.
    #[must_use]
    pub const fn from_micros(micros: i64) -> Self {
        Self(micros.saturating_mul(NANOS_PER_MICRO))
    }

    /// Creates a duration from milliseconds, saturating on overflow.
    #[must_use]
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis.saturating_mul(NANOS_PER_MILLI))
    }

    /// Creates a duration from whole seconds, saturating on overflow.
    #[must_use]
    pub const fn from_secs(secs: i64) -> Self {
        Self(secs.saturating_mul(NANOS_PER_SEC))
    }

    /// Creates a duration from fractional seconds.
    ///
    /// The value is scaled to nanoseconds in floating point and then
    /// saturated into the nanosecond range. Infinities clamp to
    /// [`Duration::MAX`] / [`Duration::MIN`]; `NaN` maps to zero.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn from_secs_f64(secs: f64) -> Self {
        // `as` saturates float-to-int and sends NaN to zero.
        Self((secs * NANOS_PER_SEC as f64) as i64)
    }

    /// Returns the span as nanoseconds.
    #[must_use]
    pub const fn as_nanos(self) -> i64 {
        self.0
    }

    /// Returns the span as microseconds (truncated toward zero).
    #[must_use]
    pub const fn as_micros(self) -> i64 {
        self.0 / NANOS_PER_MICRO
    }

    /// Returns the span as milliseconds (truncated toward zero).
    #[must_use]
    pub const fn as_millis(self) -> i64 {
        self.0 / NANOS_PER_MILLI
    }

    /// Returns the span as whole seconds (truncated toward zero).
    #[must_use]
    pub const fn as_secs(self) -> i64 {
        self.0 / NANOS_PER_SEC
    }

    /// Returns the span as fractional seconds.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / NANOS_PER_SEC as f64
    }

    /// Whether the span is exactly zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Whether the span is below zero.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Whether the span is above zero.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Adds two spans, saturating on overflow.
    #[must_use]
    pub const fn saturating_add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }

    /// Subtracts a span, saturating on overflow.
    #[must_use]
    pub const fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }

    /// Multiplies by a scalar, saturating on overflow.
    #[must_use]
    pub const fn saturating_mul(self, rhs: i64) -> Self {
        Self(self.0.saturating_mul(rhs))
    }

    /// Negates the span; `Duration::MIN` saturates to `Duration::MAX`.
    #[must_use]
    pub const fn saturating_neg(self) -> Self {
        Self(self.0.saturating_neg())
    }
}

impl Add for Duration {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        self.saturating_add(rhs)
    }
}

impl Sub for Duration {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self.saturating_sub(rhs)
    }
}

impl Neg for Duration {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.saturating_neg()
    }
}

impl Mul<i64> for Duration {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self::Output {
        self.saturating_mul(rhs)
    }
}

impl fmt::Debug for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Duration({}ns)", self.0)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 0 {
            write!(f, "-")?;
        }
        format_nanos(f, self.0.unsigned_abs())
    }
}

/// Renders a nanosecond magnitude in the largest clean unit.
pub(super) fn format_nanos(f: &mut fmt::Formatter<'_>, nanos: u64) -> fmt::Result {
    if nanos >= 1_000_000_000 {
        write!(
            f,
            "{}.{:03}s",
            nanos / 1_000_000_000,
            (nanos / 1_000_000) % 1000
        )
    } else if nanos >= 1_000_000 {
        write!(f, "{}ms", nanos / 1_000_000)
    } else if nanos >= 1_000 {
        write!(f, "{}us", nanos / 1_000)
    } else {
        write!(f, "{nanos}ns")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_conversions() {
        assert_eq!(Duration::from_secs(1).as_nanos(), 1_000_000_000);
        assert_eq!(Duration::from_millis(1).as_nanos(), 1_000_000);
        assert_eq!(Duration::from_micros(1).as_nanos(), 1_000);
        assert_eq!(Duration::from_nanos(1).as_nanos(), 1);

        assert_eq!(Duration::from_millis(-250).as_nanos(), -250_000_000);
        assert_eq!(Duration::from_nanos(1_500_000_000).as_secs(), 1);
        assert_eq!(Duration::from_nanos(1_500_000_000).as_millis(), 1500);
        assert_eq!(Duration::from_nanos(-1_500_000_000).as_secs(), -1);
    }

    #[test]
    fn duration_from_float_seconds() {
        assert_eq!(Duration::from_secs_f64(1.5).as_nanos(), 1_500_000_000);
        assert_eq!(Duration::from_secs_f64(-0.25).as_nanos(), -250_000_000);
        assert_eq!(Duration::from_secs_f64(0.0), Duration::ZERO);

        assert_eq!(Duration::from_secs_f64(1e300), Duration::MAX);
        assert_eq!(Duration::from_secs_f64(-1e300), Duration::MIN);
        assert_eq!(Duration::from_secs_f64(f64::INFINITY), Duration::MAX);
        assert_eq!(Duration::from_secs_f64(f64::NEG_INFINITY), Duration::MIN);
        assert_eq!(Duration::from_secs_f64(f64::NAN), Duration::ZERO);
    }

    #[test]
    fn duration_saturating_arithmetic() {
        assert_eq!(Duration::from_secs(i64::MAX), Duration::MAX);
        assert_eq!(Duration::from_secs(i64::MIN), Duration::MIN);
        assert_eq!(Duration::MAX + Duration::from_nanos(1), Duration::MAX);
        assert_eq!(Duration::MIN - Duration::from_nanos(1), Duration::MIN);
        assert_eq!(Duration::MAX * 2, Duration::MAX);
        assert_eq!(-Duration::MIN, Duration::MAX);

        let a = Duration::from_secs(2);
        let b = Duration::from_millis(500);
        assert_eq!((a - b).as_millis(), 1500);
        assert_eq!((a + b).as_millis(), 2500);
        assert_eq!((b * 4).as_secs(), 2);
    }

    #[test]
    fn duration_ordering() {
        assert!(Duration::from_millis(-5) < Duration::ZERO);
        assert!(Duration::ZERO < Duration::from_millis(5));
        assert!(Duration::from_secs(1) < Duration::from_secs(2));
        assert_eq!(Duration::from_millis(1000), Duration::from_secs(1));
    }

    #[test]
    fn duration_display() {
        assert_eq!(Duration::from_millis(1500).to_string(), "1.500s");
        assert_eq!(Duration::from_millis(-250).to_string(), "-250ms");
        assert_eq!(Duration::from_micros(42).to_string(), "42us");
        assert_eq!(Duration::from_nanos(7).to_string(), "7ns");
        assert_eq!(format!("{:?}", Duration::from_nanos(7)), "Duration(7ns)");
    }
}
