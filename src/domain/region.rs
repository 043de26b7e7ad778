use serde::{Deserialize, Serialize};

use super::Coordinates;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: String,
    pub name: String,
    pub coordinates: Coordinates,
}

/// Resolves region identities to the coordinates used for weather lookups.
#[derive(Debug, Clone, Default)]
pub struct RegionDirectory {
    regions: Vec<Region>,
}

impl RegionDirectory {
    pub fn new(regions: Vec<Region>) -> Self {
        Self { regions }
    }

    pub fn builtin() -> Self {
        let region = |id: &str, name: &str, latitude, longitude| Region {
            id: id.to_string(),
            name: name.to_string(),
            coordinates: Coordinates { latitude, longitude },
        };
        Self::new(vec![
            region("north", "Northern Grid", 65.5848, 22.1547),
            region("central", "Central Grid", 59.3293, 18.0686),
            region("south", "Southern Grid", 55.6050, 13.0038),
            region("west", "Western Grid", 57.7089, 11.9746),
        ])
    }

    pub fn coordinates(&self, id: &str) -> Option<Coordinates> {
        self.get(id).map(|r| r.coordinates)
    }

    pub fn get(&self, id: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.id.eq_ignore_ascii_case(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let dir = RegionDirectory::builtin();
        assert_eq!(dir.coordinates("SOUTH").unwrap().latitude, 55.6050);
        assert!(dir.coordinates("atlantis").is_none());
    }
}
