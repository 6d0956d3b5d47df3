//! Marker traits separating writes from reads

use std::fmt::Debug;

/// A request that changes stored state (create, update, delete).
pub trait Command: Debug + Send {}

/// A request that only reads stored state.
pub trait Query: Debug + Send {}
