//! Post Mortem Possession - keep fighting after your character falls

pub mod core;
pub mod possession;
