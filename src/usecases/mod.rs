//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic into the operations the checkout flow
//! calls. Each use case is a self-contained business operation.
//!
//! Use cases:
//! - `QuoteService`: Schedule selection + price breakdown + settlement

pub mod quote;

pub use quote::{Quote, QuoteService};
