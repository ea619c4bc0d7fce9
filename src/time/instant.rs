//! Opaque points in virtual time.

use core::fmt;
use core::ops::{Add, Sub};

use super::duration::format_nanos;
use super::Duration;

/// A point in virtual time, measured from [`Instant::ORIGIN`].
///
/// Every instant is the origin plus a signed [`Duration`]; instants before
/// the origin are valid. Values are immutable and totally ordered, and
/// "advancing" one produces a new instant. Virtual time has no relation to
/// the wall clock: an instant moves only when a scheduler is told to move.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Instant(Duration);

impl Instant {
    /// The fixed zero point of virtual time.
    pub const ORIGIN: Self = Self(Duration::ZERO);

    /// Creates an instant `nanos` nanoseconds from the origin.
    #[must_use]
    pub const fn from_nanos(nanos: i64) -> Self {
        Self(Duration::from_nanos(nanos))
    }

    /// Creates an instant `micros` microseconds from the origin.
    #[must_use]
    pub const fn from_micros(micros: i64) -> Self {
        Self(Duration::from_micros(micros))
    }

    /// Creates an instant `millis` milliseconds from the origin.
    #[must_use]
    pub const fn from_millis(millis: i64) -> Self {
        Self(Duration::from_millis(millis))
    }

    /// Creates an instant `secs` seconds from the origin.
    #[must_use]
    pub const fn from_secs(secs: i64) -> Self {
        Self(Duration::from_secs(secs))
    }

    /// Offset of this instant from the origin.
    #[must_use]
    pub const fn since_origin(self) -> Duration {
        self.0
    }

    /// Signed distance from `self` to `other` (`other` minus `self`),
    /// saturating at the representable extremes.
    #[must_use]
    pub const fn distance_to(self, other: Self) -> Duration {
        other.0.saturating_sub(self.0)
    }

    /// Returns this instant moved by `offset`, saturating at the
    /// representable extremes. Negative offsets move toward the past.
    #[must_use]
    pub const fn advanced_by(self, offset: Duration) -> Self {
        Self(self.0.saturating_add(offset))
    }
}

impl Add<Duration> for Instant {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        self.advanced_by(rhs)
    }
}

impl Sub<Duration> for Instant {
    type Output = Self;

    fn sub(self, rhs: Duration) -> Self::Output {
        self.advanced_by(rhs.saturating_neg())
    }
}

impl Sub for Instant {
    type Output = Duration;

    fn sub(self, rhs: Self) -> Self::Output {
        rhs.distance_to(self)
    }
}

impl fmt::Debug for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Instant({}ns)", self.0.as_nanos())
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_negative() {
            write!(f, "-")?;
        }
        format_nanos(f, self.0.as_nanos().unsigned_abs())
    }
}
