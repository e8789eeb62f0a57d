use std::collections::BTreeSet;

use fgd_common::{RecordStore, MANDATORY_CLASS};

/// Names of the placeable (point or solid) classes of a record table.
///
/// Built once from the master table. Base-only records never appear here;
/// they are only reached through another record's bases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    entities: BTreeSet<String>,
}

impl Classification {
    pub fn classify(store: &RecordStore) -> Self {
        let entities: BTreeSet<String> = store
            .records()
            .filter(|record| record.is_concrete())
            .map(|record| record.name.clone())
            .collect();

        tracing::debug!(entities = entities.len(), "Classified concrete entities");
        Self { entities }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entities.contains(name)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entity names in lexicographic order.
    pub fn entities(&self) -> impl Iterator<Item = &str> {
        self.entities.iter().map(String::as_str)
    }

    /// Top-level resolution order of a pass: `Mandatory` first when the
    /// table defines it, then every entity.
    pub fn emission_order(&self, store: &RecordStore) -> Vec<String> {
        let mut order = Vec::with_capacity(self.entities.len() + 1);
        if store.contains(MANDATORY_CLASS) {
            order.push(MANDATORY_CLASS.to_string());
        }
        order.extend(
            self.entities
                .iter()
                .filter(|name| name.as_str() != MANDATORY_CLASS)
                .cloned(),
        );
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use fgd_common::{ClassKind, ClassRecord};

    #[test]
    fn test_only_point_and_solid_are_entities() {
        let store: RecordStore = [
            ClassRecord::new("Mandatory", ClassKind::Base),
            ClassRecord::new("monster_zombie", ClassKind::Point),
            ClassRecord::new("func_wall", ClassKind::Solid),
            ClassRecord::new("Targetx", ClassKind::Base),
            ClassRecord::new("ambient_generic", ClassKind::Point),
        ]
        .into_iter()
        .collect();

        let classification = Classification::classify(&store);
        assert_eq!(
            classification.entities().collect::<Vec<_>>(),
            vec!["ambient_generic", "func_wall", "monster_zombie"]
        );
        assert!(!classification.contains("Targetx"));
        assert_eq!(
            classification.emission_order(&store),
            vec!["Mandatory", "ambient_generic", "func_wall", "monster_zombie"]
        );
    }

    #[test]
    fn test_no_mandatory_root() {
        let store: RecordStore = [ClassRecord::new("b", ClassKind::Point)].into_iter().collect();
        assert_eq!(Classification::classify(&store).emission_order(&store), vec!["b"]);
    }
}
