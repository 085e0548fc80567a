#![doc = include_str!("../README.md")]

pub use wk_codec as codec;
pub use wk_custom as custom;
