//! Navigation paths and the pre-navigation guard.

pub mod guard;
pub mod paths;
