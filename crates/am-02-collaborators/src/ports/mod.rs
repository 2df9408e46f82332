//! # Ports Layer
//!
//! Outbound ports only: this subsystem is called, never calls back.

pub mod outbound;
