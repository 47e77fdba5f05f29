//! Catalog item value object.

/// A single catalog entry.
///
/// Pure data plus display helpers; no behavior beyond derived strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: u64,
    pub title: String,
    pub status: String,
    pub species: String,
    pub gender: String,
    pub origin: String,
    pub location: String,
    pub episode_count: usize,
    pub image_url: String,
}

impl Item {
    /// Rendered description lines for a detail view.
    pub fn description_lines(&self) -> Vec<String> {
        vec![
            format!("Species: {}", self.species),
            format!("Status: {}", self.status),
            format!("Gender: {}", self.gender),
            format!("Origin: {}", self.origin),
            format!("Location: {}", self.location),
            format!("Appears in {} episodes", self.episode_count),
        ]
    }
}
