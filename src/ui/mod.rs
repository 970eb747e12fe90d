//! Presentation glue. Every renderer reads the same `DerivedView`
//! snapshot handed down by the app for the current frame.

pub mod map;
pub mod panels;
pub mod plot;
pub mod table;
