//! Attack Helper - combat resolution engine for tabletop wargame rosters

pub mod broadcast;
pub mod combat;
pub mod core;
pub mod dice;
pub mod records;
