//! Input asset decoding: still images and the caption font.

pub mod decode;
