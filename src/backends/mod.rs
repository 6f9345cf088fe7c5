// SPDX-License-Identifier: GPL-3.0-only

//! Platform backends
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                    App Layer                     │
//! └────────────────────────┬─────────────────────────┘
//!                          │
//! ┌────────────────────────┴─────────────────────────┐
//! │                  Backend Layer                   │
//! │  ┌─────────────┐ ┌─────────────┐ ┌────────────┐  │
//! │  │   Camera    │ │ Permissions │ │   Media    │  │
//! │  │ (PipeWire)  │ │  (Portal)   │ │  Library   │  │
//! │  └─────────────┘ └─────────────┘ └────────────┘  │
//! │  ┌─────────────┐ ┌──────────────────────────┐    │
//! │  │ Push (D-Bus)│ │ Notifications (fd.o)     │    │
//! │  └─────────────┘ └──────────────────────────┘    │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! - [`camera`]: device enumeration and live preview frames
//! - [`permissions`]: camera and photo library access
//! - [`media_library`]: assets and albums on disk
//! - [`push`]: foreground push message delivery
//! - [`notifications`]: local desktop notifications

pub mod camera;
pub mod media_library;
pub mod notifications;
pub mod permissions;
pub mod push;
