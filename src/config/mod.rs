//! # Configuration Module
//!
//! This module provides the intake configuration shared by the CLI and by
//! hosts that embed upload slots.

pub mod config;

pub use config::{IntakeConfig, SlotKind};
