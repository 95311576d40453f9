//! Domain layer - Pricing logic and money types.
//!
//! Pure, synchronous code: no I/O, no shared mutable state. Every type
//! here is immutable once built and safe to share across threads.

pub mod book;
pub mod fees;
pub mod money;
pub mod schedule;

// Re-export core types for convenience
pub use book::{BookError, NamedSchedule, ScheduleBook};
pub use fees::{FeeCalculator, PriceBreakdown, Settlement};
pub use money::{format_eur, Cents};
pub use schedule::{FeeSchedule, FeeScheduleError};
