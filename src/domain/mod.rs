//! Domain types for the access-control engine.
//!
//! Roles are a closed set and every permission decision in the system
//! goes through the single capability table in [`role`]. Call sites never
//! compare role strings directly.

pub mod role;

pub use role::{Capability, DrawerAction, ParseRoleError, Role};
