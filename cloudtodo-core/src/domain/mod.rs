//! Core domain entities
//!
//! Pure data structures with validation logic - no I/O or external dependencies.

mod account;
pub mod email;
pub mod result;
mod task;

pub use account::Account;
pub use email::{is_valid_email, normalize_email};
pub use task::{Outcome, Task, TaskChanges};
