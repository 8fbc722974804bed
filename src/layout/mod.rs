//! Canvas layout: fitting the image pair into the margin-and-caption frame.

pub mod fit;
