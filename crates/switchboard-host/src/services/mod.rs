// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Host services: configuration lookup and the JSON-lines boundary.

pub mod boundary;
pub mod data_dir;
