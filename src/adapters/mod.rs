//! Infrastructure adapters. Implement outbound ports.
//!
//! Weather, mail, persistence, observability. Map errors to DomainError.

pub mod email;
pub mod observability;
pub mod persistence;
pub mod weather;
