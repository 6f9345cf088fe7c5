// SPDX-License-Identifier: GPL-3.0-only

//! Settings drawer UI module

pub mod view;
