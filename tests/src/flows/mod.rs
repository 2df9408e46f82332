//! Cross-subsystem flows.

pub mod acceptance_race;
pub mod gateway;
pub mod lifecycle;
