//! Aspect/elevation rose model
//!
//! The rose always holds all eight compass aspects. It is stored as a fixed
//! array indexed by [`Aspect`], so a partial rose cannot be represented.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Compass aspect of a slope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aspect {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

/// Elevation band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Elevation {
    Alpine,
    Treeline,
    BelowTreeline,
}

impl Aspect {
    /// Canonical order, clockwise from north
    pub const ALL: [Aspect; 8] = [
        Aspect::N,
        Aspect::NE,
        Aspect::E,
        Aspect::SE,
        Aspect::S,
        Aspect::SW,
        Aspect::W,
        Aspect::NW,
    ];

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Aspect::N => "N",
            Aspect::NE => "NE",
            Aspect::E => "E",
            Aspect::SE => "SE",
            Aspect::S => "S",
            Aspect::SW => "SW",
            Aspect::W => "W",
            Aspect::NW => "NW",
        }
    }

    /// Parse a two-letter code such as `"NE"`
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Aspect::ALL.into_iter().find(|a| a.code() == code)
    }

    /// Parse a spelled-out aspect such as `"northeast"`
    #[must_use]
    pub fn from_word(word: &str) -> Option<Self> {
        match word.to_lowercase().as_str() {
            "north" => Some(Aspect::N),
            "northeast" => Some(Aspect::NE),
            "east" => Some(Aspect::E),
            "southeast" => Some(Aspect::SE),
            "south" => Some(Aspect::S),
            "southwest" => Some(Aspect::SW),
            "west" => Some(Aspect::W),
            "northwest" => Some(Aspect::NW),
            _ => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl Elevation {
    /// Map API elevation words (`upper`, `middle`, `lower`)
    #[must_use]
    pub fn from_api_word(word: &str) -> Option<Self> {
        match word.to_lowercase().as_str() {
            "upper" => Some(Elevation::Alpine),
            "middle" => Some(Elevation::Treeline),
            "lower" => Some(Elevation::BelowTreeline),
            _ => None,
        }
    }
}

/// Which elevation bands of one aspect a problem affects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElevationCells {
    /// Above treeline
    #[serde(default)]
    pub alpine: bool,
    /// Near treeline
    #[serde(default)]
    pub treeline: bool,
    /// Below treeline
    #[serde(default)]
    pub below_treeline: bool,
}

impl ElevationCells {
    #[must_use]
    pub fn get(&self, elevation: Elevation) -> bool {
        match elevation {
            Elevation::Alpine => self.alpine,
            Elevation::Treeline => self.treeline,
            Elevation::BelowTreeline => self.below_treeline,
        }
    }

    pub fn set(&mut self, elevation: Elevation, value: bool) {
        match elevation {
            Elevation::Alpine => self.alpine = value,
            Elevation::Treeline => self.treeline = value,
            Elevation::BelowTreeline => self.below_treeline = value,
        }
    }

    fn count(&self) -> usize {
        [self.alpine, self.treeline, self.below_treeline]
            .iter()
            .filter(|v| **v)
            .count()
    }
}

/// 8 aspects x 3 elevations grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AspectElevationRose {
    cells: [ElevationCells; 8],
}

impl AspectElevationRose {
    /// All cells false
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a rose from API location strings like `"north upper"`.
    /// Entries with fewer than two tokens or unknown words are skipped.
    #[must_use]
    pub fn from_locations<S: AsRef<str>>(locations: &[S]) -> Self {
        let mut rose = Self::empty();
        for location in locations {
            let mut parts = location.as_ref().split_whitespace();
            let (Some(aspect_word), Some(elevation_word)) = (parts.next(), parts.next()) else {
                continue;
            };
            if let (Some(aspect), Some(elevation)) = (
                Aspect::from_word(aspect_word),
                Elevation::from_api_word(elevation_word),
            ) {
                rose.mark(aspect, elevation);
            }
        }
        rose
    }

    pub fn mark(&mut self, aspect: Aspect, elevation: Elevation) {
        self.cells[aspect.index()].set(elevation, true);
    }

    #[must_use]
    pub fn cells(&self, aspect: Aspect) -> &ElevationCells {
        &self.cells[aspect.index()]
    }

    #[must_use]
    pub fn is_affected(&self, aspect: Aspect, elevation: Elevation) -> bool {
        self.cells(aspect).get(elevation)
    }

    /// Number of affected aspect/elevation cells
    #[must_use]
    pub fn affected_count(&self) -> usize {
        self.cells.iter().map(ElevationCells::count).sum()
    }

    /// Iterate all eight aspects in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Aspect, &ElevationCells)> {
        Aspect::ALL.into_iter().map(|a| (a, &self.cells[a.index()]))
    }
}

impl Serialize for AspectElevationRose {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Aspect::ALL.len()))?;
        for (aspect, cells) in self.iter() {
            map.serialize_entry(aspect.code(), cells)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AspectElevationRose {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RoseVisitor;

        impl<'de> Visitor<'de> for RoseVisitor {
            type Value = AspectElevationRose;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of compass aspects to elevation cells")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut rose = AspectElevationRose::empty();
                while let Some(key) = access.next_key::<String>()? {
                    match Aspect::from_code(&key) {
                        Some(aspect) => rose.cells[aspect.index()] = access.next_value()?,
                        None => {
                            access.next_value::<serde::de::IgnoredAny>()?;
                        }
                    }
                }
                Ok(rose)
            }
        }

        deserializer.deserialize_map(RoseVisitor)
    }
}
