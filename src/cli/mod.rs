//! CLI infrastructure for xo-break
//!
//! This module provides the command-line interface for playing pop-up matches,
//! simulating sessions and managing stored settings and points.

pub mod commands;
pub mod config;
pub mod output;
