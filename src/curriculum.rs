use crate::persistence::UnitRow;
use std::collections::HashMap;

/// One teaching-content item in a curriculum, ordered by `sequence`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub sequence: u32,
    pub code: String,
    pub label: String,
    pub full_name: String,
}

/// An ordered, cyclic list of teaching units. Units are sorted by sequence at
/// construction; storage order is untrusted.
#[derive(Debug, Clone, PartialEq)]
pub struct Curriculum {
    pub id: String,
    pub name: String,
    pub level_id: String,
    units: Vec<Unit>,
}

impl Curriculum {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        level_id: impl Into<String>,
        mut units: Vec<Unit>,
    ) -> Self {
        units.sort_by_key(|unit| unit.sequence);
        Self {
            id: id.into(),
            name: name.into(),
            level_id: level_id.into(),
            units,
        }
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Unit for the `index`-th lesson (0-based), wrapping around when the
    /// curriculum is exhausted. `None` only for an empty curriculum.
    pub fn unit_at(&self, index: usize) -> Option<&Unit> {
        if self.units.is_empty() {
            return None;
        }
        Some(&self.units[index % self.units.len()])
    }
}

/// All curricula known to the store, keyed by curriculum id.
#[derive(Debug, Clone, Default)]
pub struct CurriculumCatalog {
    curricula: HashMap<String, Curriculum>,
}

impl CurriculumCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the catalog from flat unit rows, grouping by curriculum id.
    /// Curriculum name and level come from the group's first row.
    pub fn from_rows(rows: &[UnitRow]) -> Self {
        let mut grouped: HashMap<String, Vec<&UnitRow>> = HashMap::new();
        for row in rows {
            grouped.entry(row.curriculum_id.clone()).or_default().push(row);
        }

        let mut catalog = Self::new();
        for (id, group) in grouped {
            let units = group
                .iter()
                .map(|row| Unit {
                    sequence: row.sequence,
                    code: row.unit_code.clone(),
                    label: row.unit_label.clone(),
                    full_name: row.book_full_name.clone(),
                })
                .collect();
            let first = group[0];
            catalog.insert(Curriculum::new(
                id,
                first.curriculum_name.clone(),
                first.level_id.clone(),
                units,
            ));
        }
        catalog
    }

    pub fn insert(&mut self, curriculum: Curriculum) {
        self.curricula.insert(curriculum.id.clone(), curriculum);
    }

    pub fn get(&self, curriculum_id: &str) -> Option<&Curriculum> {
        self.curricula.get(curriculum_id)
    }

    pub fn len(&self) -> usize {
        self.curricula.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curricula.is_empty()
    }
}
