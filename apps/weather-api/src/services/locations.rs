use serde::Serialize;

/// WGS84 point in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, utoipa::ToSchema)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocationMatch {
    /// Canonical table name the input resolved to.
    pub name: &'static str,
    pub coordinate: Coordinate,
    /// True when the input was not in the table and the default location was used.
    pub fallback: bool,
}

pub const DEFAULT_LOCATION: &str = "stockholm";

struct KnownLocation {
    name: &'static str,
    aliases: &'static [&'static str],
    coordinate: Coordinate,
}

const LOCATIONS: &[KnownLocation] = &[
    KnownLocation {
        name: "stockholm",
        aliases: &[],
        coordinate: Coordinate::new(59.3293, 18.0686),
    },
    KnownLocation {
        name: "gothenburg",
        aliases: &["göteborg", "goteborg"],
        coordinate: Coordinate::new(57.7089, 11.9746),
    },
    KnownLocation {
        name: "malmo",
        aliases: &["malmö"],
        coordinate: Coordinate::new(55.6050, 13.0038),
    },
    KnownLocation {
        name: "uppsala",
        aliases: &[],
        coordinate: Coordinate::new(59.8586, 17.6389),
    },
];

/// Canonical names accepted by [`lookup`], in table order.
pub fn known_locations() -> impl Iterator<Item = (&'static str, Coordinate)> {
    LOCATIONS.iter().map(|loc| (loc.name, loc.coordinate))
}

/// Resolves a free-text location name. Matching is case-insensitive and
/// ignores surrounding whitespace; unknown names resolve to [`DEFAULT_LOCATION`].
pub fn lookup(name: &str) -> LocationMatch {
    let key = name.trim().to_lowercase();
    let found = LOCATIONS
        .iter()
        .find(|loc| loc.name == key || loc.aliases.iter().any(|alias| *alias == key));

    if let Some(loc) = found {
        return LocationMatch {
            name: loc.name,
            coordinate: loc.coordinate,
            fallback: false,
        };
    }

    tracing::warn!(
        location = %name,
        fallback = DEFAULT_LOCATION,
        "unknown location; using default"
    );
    let default = default_location();
    LocationMatch {
        name: default.name,
        coordinate: default.coordinate,
        fallback: true,
    }
}

fn default_location() -> &'static KnownLocation {
    LOCATIONS
        .iter()
        .find(|loc| loc.name == DEFAULT_LOCATION)
        .unwrap_or(&LOCATIONS[0])
}
