//! Weather resolution: approximate location, provider lookup, and the mapping
//! onto the discrete conditions that drive theming and particle physics.

pub mod condition;
pub mod context;
pub mod fetch;
pub mod theme;
