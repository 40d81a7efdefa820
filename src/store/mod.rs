pub mod entries;
pub mod multivar;
pub mod persistence;

pub use entries::EntryMap;
pub use persistence::{Format, WriteGate};
