// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Phase catalog & loader (spec §4.1): built-in presets plus parsing and
//! validation of user-supplied phase lists.

mod loader;
mod presets;
mod raw;
mod validate;

pub use loader::{load, load_file, load_str, LoadError};
pub use presets::{default_preset, lookup, minimal_preset, thorough_preset};
pub use raw::{RawPhase, RawPhaseList};
pub use validate::{validate, CatalogError};
