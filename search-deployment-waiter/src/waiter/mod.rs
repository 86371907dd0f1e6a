//! Waiters for search deployment state transitions.
//!
//! Both waiters drive the same polling engine and differ only in their decision
//! function: `wait_for_state` after a create or update request, `wait_for_deletion`
//! after a delete request.

mod delete;
mod state;

pub use delete::wait_for_deletion;
pub use state::wait_for_state;
