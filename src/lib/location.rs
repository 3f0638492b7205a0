use super::*;
use serde_derive::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Park,
    Monument,
    Seaside,
    Religious,
    Palace,
    Fort,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Park,
        Category::Monument,
        Category::Seaside,
        Category::Religious,
        Category::Palace,
        Category::Fort,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Category::Park => "Park",
            Category::Monument => "Monument",
            Category::Seaside => "Seaside",
            Category::Religious => "Religious",
            Category::Palace => "Palace",
            Category::Fort => "Fort",
        }
    }

    /// Search keywords used when looking for nearby places of this category.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Category::Park => &["park", "garden"],
            Category::Monument => &["monument", "memorial"],
            Category::Seaside => &["beach", "promenade"],
            Category::Religious => &["temple", "church", "mosque"],
            Category::Palace => &["palace"],
            Category::Fort => &["fort", "castle"],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .find(|category| category.name().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| format!("Unknown category {:?}.", s))
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
    pub category: Category,
}

impl Location {
    pub fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }
}

const fn location(name: &'static str, lat: f64, lng: f64, category: Category) -> Location {
    Location {
        name,
        lat,
        lng,
        category,
    }
}

/// The fixed landmark dataset. Defined at load time, never mutated.
pub static LOCATIONS: [Location; 10] = [
    // Karnataka
    location("Lalbagh Botanical Garden", 12.9507, 77.5848, Category::Park),
    location("Cubbon Park", 12.9763, 77.5929, Category::Park),
    // Delhi
    location("India Gate", 28.6129, 77.2295, Category::Monument),
    location("Red Fort", 28.6562, 77.2410, Category::Monument),
    // Maharashtra
    location("Gateway of India", 18.9220, 72.8347, Category::Monument),
    location("Marine Drive", 18.9430, 72.8238, Category::Seaside),
    // Uttar Pradesh
    location("Taj Mahal", 27.1751, 78.0421, Category::Monument),
    location("Varanasi Ghats", 25.3109, 83.0104, Category::Religious),
    // Rajasthan
    location("Hawa Mahal", 26.9239, 75.8267, Category::Palace),
    location("Jaisalmer Fort", 26.9124, 70.9120, Category::Fort),
];
