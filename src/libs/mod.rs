pub mod confidence;
pub mod coord;
pub mod error;
pub mod fmt;
pub mod format;
pub mod geometry;
pub mod io;
pub mod maf;
