// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types are defined in `passkeep-core::types` for use across
//! crate boundaries. This module re-exports them for convenience within the
//! storage crate.

pub use passkeep_core::types::{EntryId, SealedEntry};
