//! Compile-time embedded city boundary table.
//!
//! Supported cities are defined in `boundaries/cities.toml` and embedded
//! at build time. The table is immutable after construction; substitute
//! tables for tests can be built with [`CityBoundaryTable::from_toml_str`].

use std::collections::BTreeMap;

use flood_watch_geography_models::BoundingBox;
use serde::Deserialize;

const CITY_TOML: &str = include_str!("../boundaries/cities.toml");

#[derive(Debug, Deserialize)]
struct BoundaryFile {
    cities: Vec<CityBoundary>,
}

#[derive(Debug, Deserialize)]
struct CityBoundary {
    name: String,
    west: f64,
    south: f64,
    east: f64,
    north: f64,
}

/// Read-only mapping from city name to its fixed rectangular boundary.
#[derive(Debug, Clone)]
pub struct CityBoundaryTable {
    cities: BTreeMap<String, BoundingBox>,
}

impl CityBoundaryTable {
    /// Builds the table from the embedded `boundaries/cities.toml`.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed (a build-time guarantee,
    /// since the file ships inside the binary).
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_toml_str(CITY_TOML).expect("embedded cities.toml is malformed")
    }

    /// Parses a boundary table from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `toml` deserialization error if the document does not
    /// match the expected `[[cities]]` schema.
    pub fn from_toml_str(document: &str) -> Result<Self, toml::de::Error> {
        let file: BoundaryFile = toml::from_str(document)?;
        let cities = file
            .cities
            .into_iter()
            .map(|city| {
                (
                    city.name,
                    BoundingBox::new(city.west, city.south, city.east, city.north),
                )
            })
            .collect();
        Ok(Self { cities })
    }

    /// Looks up a city boundary by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&BoundingBox> {
        self.cities.get(name)
    }

    /// Supported city names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.cities.keys().map(String::as_str)
    }

    /// Number of supported cities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}
