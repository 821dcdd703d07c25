//! Services shared by firecheck clients

mod reconciler;

pub use reconciler::{Reconciler, Scope};
