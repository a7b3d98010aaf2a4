// SPDX-FileCopyrightText: Copyright © 2025 Serpent OS Developers
//
// SPDX-License-Identifier: MPL-2.0

//! Generate files of a fixed size, sparse by default

mod errors;
pub use errors::*;

mod units;
pub use units::*;

pub mod plan;
pub mod prompt;
pub mod sparsefile;

pub use plan::Plan;
pub use prompt::Prompt;
pub use sparsefile::{generate, FillMethod, Report, Request};
