//! Encoders from MAF blocks to other alignment formats.

pub mod axt;
pub mod blast;
pub mod html;
pub mod psl;
pub mod sam;
pub mod tab;
