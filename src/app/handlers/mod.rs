// SPDX-License-Identifier: GPL-3.0-only

//! Message handler modules
//!
//! Handlers are grouped by the screen and workflow they drive.

pub mod capture;
pub mod feature;
pub mod library;
pub mod preview;
