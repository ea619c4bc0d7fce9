//! Timelab: a deterministic, manually-driven scheduler over virtual time.
//!
//! # Overview
//!
//! Timelab tests time-dependent code without wall-clock delays. A test
//! enqueues actions against a virtual clock, then advances that clock
//! explicitly; due actions fire synchronously, in due-time order with FIFO
//! ties, including actions scheduled by other actions during the same
//! advance. There is no background thread and no sleeping: every firing is
//! caused by a call the test makes.
//!
//! # Core Guarantees
//!
//! - **Deterministic order**: earlier due times fire first; equal due times fire in submission order
//! - **Single active drain**: nested time changes made by firing actions are absorbed by the loop already running
//! - **Catch-up firing**: a time jump across several repeat intervals fires every skipped occurrence
//! - **Total arithmetic**: durations and instants saturate instead of wrapping or panicking
//! - **Cancellation is forward-only**: cancelling a repeating action stops future firings, never an in-flight one
//!
//! # Module Structure
//!
//! - [`time`]: Virtual [`Duration`] and [`Instant`] primitives
//! - [`scheduler`]: The [`VirtualScheduler`] engine and drain loop
//! - [`cancel`]: [`CancelToken`] handles for repeating actions
//! - [`test_utils`]: Logging setup and assertion macros for tests
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use timelab::{Duration, Instant, VirtualScheduler};
//!
//! let scheduler = VirtualScheduler::new();
//! let log = Rc::new(RefCell::new(Vec::new()));
//!
//! let sink = Rc::clone(&log);
//! scheduler.schedule_after(Instant::from_secs(2), move || sink.borrow_mut().push("second"));
//! let sink = Rc::clone(&log);
//! scheduler.schedule_after(Instant::from_secs(1), move || sink.borrow_mut().push("first"));
//!
//! scheduler.run();
//! assert_eq!(*log.borrow(), ["first", "second"]);
//! assert_eq!(scheduler.now(), Instant::from_secs(2));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]

pub mod cancel;
mod queue;
pub mod scheduler;
pub mod test_utils;
pub mod time;

pub use cancel::CancelToken;
pub use scheduler::{NegativeInterval, VirtualScheduler};
pub use time::{Duration, Instant};
