//! lawn-sensei: daily lawn watering advisory daemon with Hexagonal Architecture.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
