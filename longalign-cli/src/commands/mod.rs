//! Command implementations for the longalign CLI

pub mod align;
