//! # UI Module
//!
//! This module contains the layout of the Pitchscope window.

pub mod main_display;
