//! Engine configuration.

use chess_core::{Geometry, GeometryError};
use serde::{Deserialize, Serialize};

/// Settings that shape a new game.
///
/// Deserializes from a table such as:
///
/// ```toml
/// origin = 1
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Lowest file/rank coordinate. 0 numbers the board `0..=7`, 1 numbers it `1..=8`.
    #[serde(default)]
    pub origin: i8,
}

impl EngineConfig {
    /// The board geometry these settings describe.
    pub fn geometry(&self) -> Result<Geometry, GeometryError> {
        Geometry::new(self.origin)
    }
}
