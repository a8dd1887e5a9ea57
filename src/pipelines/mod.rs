// SPDX-License-Identifier: GPL-3.0-only

//! Frame processing pipelines
//!
//! ```text
//! ┌──────────────┐     ┌─────────────────────────┐     ┌──────────────┐
//! │  HDR source  │ ──▶ │  Gaze tone mapper       │ ──▶ │ Destination  │
//! │  (RGBA32F)   │     │  - weighted luminance   │     │  (RGBA32F)   │
//! │              │     │  - temporal adaptation  │     │              │
//! │              │     │  - tone mapping         │     │              │
//! └──────────────┘     └─────────────────────────┘     └──────────────┘
//!         ▲
//!   gaze center (eye tracker / simulator)
//! ```
//!
//! - [`tonemapper`]: per-frame pass sequencing and the temporal luminance store

pub mod tonemapper;
