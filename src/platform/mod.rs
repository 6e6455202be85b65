// src/platform/mod.rs
//
// Windowing backends hosting a GL canvas.

pub mod x11;
