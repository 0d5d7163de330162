//! Seasonal scene library - testable modules for the animated desktop panel.
//!
//! This library contains the rendering and animation logic that can be tested
//! on the host machine. The binary (`main.rs`) uses this library and adds the
//! embedded-specific code (SPI panel driver, executor tasks, logging).
//!
//! # Testing
//!
//! Run tests on host with:
//! ```bash
//! cargo test --lib --target x86_64-unknown-linux-gnu  # Linux/macOS
//! cargo test --lib --target x86_64-pc-windows-msvc    # Windows
//! ```
//!
//! Tests run with `std` enabled (via `cfg_attr`), allowing use of the standard
//! test framework while the actual firmware runs as `no_std`.

// Use no_std only when NOT testing (tests need std for the test harness)
#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

// === Pure logic modules (testable on host, no ARM dependencies) ===

// Configuration
pub mod config;

// Rendering
pub mod background;
pub mod color;
pub mod framebuffer;
pub mod geometry;

// Animation
pub mod animator;
pub mod scene;
pub mod sprites;
pub mod weather;

#[cfg(test)]
mod testing;
