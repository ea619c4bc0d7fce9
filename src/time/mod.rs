//! Virtual time primitives.
//!
//! [`Duration`] is a signed nanosecond span with saturating arithmetic;
//! [`Instant`] is an opaque timestamp measured from [`Instant::ORIGIN`].
//! Nothing here reads the wall clock: instants move only when a
//! [`VirtualScheduler`](crate::VirtualScheduler) is told to move them.

mod duration;
mod instant;

pub use duration::Duration;
pub use instant::Instant;
