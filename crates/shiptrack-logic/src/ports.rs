//! The two ports served by the fleet.

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// Port of call. The route network is exactly Curacao ⇄ Bonaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Port {
    Curacao,
    Bonaire,
}

impl Port {
    pub const ALL: [Port; 2] = [Port::Curacao, Port::Bonaire];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Curacao => "Curacao",
            Self::Bonaire => "Bonaire",
        }
    }

    /// Harbour coordinates.
    pub fn coords(&self) -> GeoPoint {
        match self {
            Self::Curacao => GeoPoint::new(12.1696, -68.9900),
            Self::Bonaire => GeoPoint::new(12.2019, -68.2624),
        }
    }

    /// The port at the other end of the route.
    pub fn opposite(&self) -> Port {
        match self {
            Self::Curacao => Self::Bonaire,
            Self::Bonaire => Self::Curacao,
        }
    }

    /// Case-insensitive lookup by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl std::fmt::Display for Port {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
