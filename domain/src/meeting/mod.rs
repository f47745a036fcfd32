//! Meeting domain logic: speaker profiles and speaker resolution

pub mod roster;
