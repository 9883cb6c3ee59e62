// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules over the vault schema.

pub mod entries;
pub mod meta;
pub mod rekey;
