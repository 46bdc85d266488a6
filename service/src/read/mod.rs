//! Read entities definitions.

pub mod tender;
