//! Shared types used across all modules.
//!
//! Defines the value sum type stored in configuration trees and the
//! environment marker. Other modules import from here rather than
//! reaching into each other's internals.

pub mod environment;
pub mod value;

pub use environment::Environment;
pub use value::ConfigValue;
