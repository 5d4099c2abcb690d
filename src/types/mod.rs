//! Event type relationships.
//!
//! ## Contents
//! - [`TypeHierarchy`] declared supertype/interface table answering assignability
//! - `Upcast` (internal) resolved, type-erased path from a concrete type to a declared one

mod hierarchy;
mod upcast;

pub use hierarchy::TypeHierarchy;
pub(crate) use upcast::{Finish, Upcast, identity};
