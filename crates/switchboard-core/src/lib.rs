// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Switchboard: Core types and error definitions shared across all crates.

pub mod codes;
pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::SwitchboardError;
pub use types::*;
