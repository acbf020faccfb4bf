// SPDX-FileCopyrightText: 2025 barry contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Shared data model for the barry renderer crates.
//!
//! The geometry pipeline, the texture manager, and the rasterizer all speak
//! in terms of these types: screen-space vertices with pre-divided depth
//! terms, power-of-two textures in swizzled storage order, and the video
//! mode settings the presentation layer is configured with.

pub mod settings;
pub mod texture;
pub mod types;

pub use settings::{SettingsError, VideoSettings};
pub use texture::{Texture, TextureError};
pub use types::*;
