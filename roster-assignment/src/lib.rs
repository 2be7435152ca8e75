//! Interview roster assignment.
//!
//! Two independent allocators share this crate:
//!
//! - [`schedule::allocate_slots`] spreads a shift's slot count over the
//!   interviewers available for that shift, proportional to their declared
//!   capacity (largest-remainder method), never exceeding anyone's capacity.
//! - [`schedule::WindowMatcher`] assigns timestamped interview requests to
//!   the first interviewer whose category flags and availability windows
//!   cover them.
//!
//! [`parser`] loads and validates the CSV inputs, [`display`] and
//! [`export`] render the results, and [`web`] serves both allocators over
//! HTTP.

pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod parser;
pub mod schedule;
pub mod web;
