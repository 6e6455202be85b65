// src/lib.rs

//! Micro-benchmark of two ways of reaching the immediate-mode GL API: entry
//! points bound once and dispatched statically, versus an interface object
//! fetched from the current context and dispatched through a vtable.

pub mod bench;
pub mod canvas;
pub mod config;
pub mod context;
pub mod gl;
pub mod platform;
pub mod stopwatch;
