//! Distance-band level-of-detail selection.

mod selector;

pub use selector::LodBands;
