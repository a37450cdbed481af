//! Stream context module
//!
//! A context is the small set of parameters a parent record hands to a
//! child stream (for example `{"board_id": 10000}`). The child runs once per
//! context; the context fills the child's path template and keys its
//! bookmark.

mod propagator;
mod types;

pub use propagator::ContextRule;
pub use types::Context;

#[cfg(test)]
mod tests;
