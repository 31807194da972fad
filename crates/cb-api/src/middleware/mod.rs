//! Middleware modules
//!
//! Contains the interaction signature check.

pub mod signature;
