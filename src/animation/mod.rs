//! Wipe timing: the animation config and per-frame wipe state.

pub mod wipe;
