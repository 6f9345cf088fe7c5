// SPDX-License-Identifier: GPL-3.0-only

//! Filter picker UI module
//!
//! One control per filter, each showing a thumbnail of the captured still
//! rendered through that filter.

pub mod view;
