//! # DSP (Digital Signal Processing) Primitives
//!
//! This module contains the building blocks of the echo:
//!
//! - **`ramp`**: Linear gain ramps and the wrapped copy/add that moves
//!   audio in and out of a ring buffer. Every gain the engine applies goes
//!   through here.
//!
//! - **`delay_line`**: A per-channel ring buffer with one shared write
//!   cursor, advanced a block at a time.
//!
//! - **`settings`**: The parameter snapshot the engine reads each block,
//!   and a lock-free store a control thread can write into.
//!
//! - **`engine`**: The delay itself: fill, read, feedback and mix.

pub mod delay_line;
pub mod engine;
pub mod ramp;
pub mod settings;
