//! IFU design codes and the output grid each bundle size maps to.

use std::fmt;

use crate::cube::GridShape;
use crate::error::{Error, Result};

/// IFU design identifier as found in RSS headers, e.g. `12701`.
///
/// All digits but the last two give the bundle size (number of fibers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IfuDesign(pub u32);

impl IfuDesign {
    /// Bundle size, e.g. `127` for design `12701`.
    pub fn size(self) -> u32 {
        self.0 / 100
    }

    /// Output `(rows, cols)` for this bundle size.
    ///
    /// Fails with [`Error::NotImplemented`] for sizes without a known mapping.
    pub fn cube_shape(self) -> Result<GridShape> {
        let (rows, cols) = match self.size() {
            19 => (34, 34),
            127 => (72, 72),
            other => {
                return Err(Error::NotImplemented(format!(
                    "ifusize {other} (design {self})"
                )))
            }
        };
        GridShape::new(rows, cols)
    }
}

impl fmt::Display for IfuDesign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for IfuDesign {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.len() < 3 {
            return Err(Error::NotImplemented(format!(
                "IFU design '{trimmed}' has no bundle size digits"
            )));
        }
        trimmed
            .parse::<u32>()
            .map(IfuDesign)
            .map_err(|e| Error::NotImplemented(format!("IFU design '{trimmed}': {e}")))
    }
}
