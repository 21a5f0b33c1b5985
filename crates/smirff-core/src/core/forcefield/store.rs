use super::category::ParameterCategory;
use super::definitions::{Parameter, ParameterError};
use slotmap::{SlotMap, new_key_type};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

new_key_type! {
    /// Stable handle of a definition inside a [`ParameterStore`].
    pub struct DefinitionKey;
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    #[error("{category} already contains a parameter with id '{id}'")]
    DuplicateIdentifier {
        category: ParameterCategory,
        id: String,
    },
    #[error("{category} has no parameter matching {key}")]
    NotFound {
        category: ParameterCategory,
        key: String,
    },
    #[error("SMIRKS '{smirks}' is held by {count} {category} parameters; look it up by id")]
    AmbiguousKey {
        category: ParameterCategory,
        smirks: String,
        count: usize,
    },
    #[error("Invalid {category} parameter: {source}")]
    Invalid {
        category: ParameterCategory,
        #[source]
        source: ParameterError,
    },
}

/// How a caller refers to one definition of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKey<'a> {
    Position(usize),
    Id(&'a str),
    Smirks(&'a str),
}

impl fmt::Display for StoreKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position(position) => write!(f, "position {position}"),
            Self::Id(id) => write!(f, "id '{id}'"),
            Self::Smirks(smirks) => write!(f, "SMIRKS '{smirks}'"),
        }
    }
}

/// Ordered collection of definitions for one category.
///
/// Store order is precedence order: when several definitions match the same unit,
/// the one with the highest position wins. Definitions live in a slot arena so that
/// deleting one does not invalidate the handles of the others.
#[derive(Debug, Clone)]
pub struct ParameterStore<P: Parameter> {
    slots: SlotMap<DefinitionKey, P>,
    order: Vec<DefinitionKey>,
    ids: HashMap<String, DefinitionKey>,
}

impl<P: Parameter> Default for ParameterStore<P> {
    fn default() -> Self {
        Self {
            slots: SlotMap::with_key(),
            order: Vec::new(),
            ids: HashMap::new(),
        }
    }
}

impl<P: Parameter> ParameterStore<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and appends a definition, returning its position.
    pub fn add(&mut self, parameter: P) -> Result<usize, StoreError> {
        self.insert(self.order.len(), parameter)
    }

    /// Validates and inserts a definition at `position`, shifting later ones back.
    pub fn insert(&mut self, position: usize, parameter: P) -> Result<usize, StoreError> {
        if position > self.order.len() {
            return Err(self.not_found(StoreKey::Position(position)));
        }
        Self::check(&parameter)?;
        if self.ids.contains_key(parameter.id()) {
            return Err(StoreError::DuplicateIdentifier {
                category: P::CATEGORY,
                id: parameter.id().to_string(),
            });
        }
        let id = parameter.id().to_string();
        let key = self.slots.insert(parameter);
        self.ids.insert(id, key);
        self.order.insert(position, key);
        Ok(position)
    }

    pub fn by_position(&self, position: usize) -> Result<&P, StoreError> {
        self.order
            .get(position)
            .map(|&key| &self.slots[key])
            .ok_or_else(|| self.not_found(StoreKey::Position(position)))
    }

    pub fn by_identifier(&self, id: &str) -> Result<&P, StoreError> {
        self.ids
            .get(id)
            .map(|&key| &self.slots[key])
            .ok_or_else(|| self.not_found(StoreKey::Id(id)))
    }

    /// Looks a definition up by its exact SMIRKS text. Fails with
    /// [`StoreError::AmbiguousKey`] when more than one definition shares it.
    pub fn by_smirks(&self, smirks: &str) -> Result<&P, StoreError> {
        let position = self.position_of(StoreKey::Smirks(smirks))?;
        Ok(&self.slots[self.order[position]])
    }

    pub fn get(&self, key: StoreKey<'_>) -> Result<&P, StoreError> {
        match key {
            StoreKey::Position(position) => self.by_position(position),
            StoreKey::Id(id) => self.by_identifier(id),
            StoreKey::Smirks(smirks) => self.by_smirks(smirks),
        }
    }

    pub fn position_of(&self, key: StoreKey<'_>) -> Result<usize, StoreError> {
        match key {
            StoreKey::Position(position) if position < self.order.len() => Ok(position),
            StoreKey::Position(_) => Err(self.not_found(key)),
            StoreKey::Id(id) => {
                let slot = self.ids.get(id).ok_or_else(|| self.not_found(key))?;
                self.order
                    .iter()
                    .position(|k| k == slot)
                    .ok_or_else(|| self.not_found(key))
            }
            StoreKey::Smirks(smirks) => {
                let positions: Vec<usize> = self
                    .order
                    .iter()
                    .enumerate()
                    .filter(|(_, k)| self.slots[**k].smirks() == smirks)
                    .map(|(i, _)| i)
                    .collect();
                match positions.as_slice() {
                    [] => Err(self.not_found(key)),
                    [position] => Ok(*position),
                    _ => Err(StoreError::AmbiguousKey {
                        category: P::CATEGORY,
                        smirks: smirks.to_string(),
                        count: positions.len(),
                    }),
                }
            }
        }
    }

    /// Edits a definition in place.
    ///
    /// The edit is applied to a copy that must pass the same checks as [`Self::add`];
    /// on failure the store is left untouched. The definition keeps its position.
    pub fn update<F>(&mut self, key: StoreKey<'_>, edit: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut P),
    {
        let position = self.position_of(key)?;
        let slot = self.order[position];
        let mut edited = self.slots[slot].clone();
        edit(&mut edited);
        Self::check(&edited)?;

        let old_id = self.slots[slot].id().to_string();
        if edited.id() != old_id {
            if self.ids.contains_key(edited.id()) {
                return Err(StoreError::DuplicateIdentifier {
                    category: P::CATEGORY,
                    id: edited.id().to_string(),
                });
            }
            self.ids.remove(&old_id);
            self.ids.insert(edited.id().to_string(), slot);
        }
        self.slots[slot] = edited;
        Ok(())
    }

    /// Removes a definition; the others keep their ids and relative order.
    pub fn delete(&mut self, key: StoreKey<'_>) -> Result<P, StoreError> {
        let position = self.position_of(key)?;
        let slot = self.order.remove(position);
        let removed = self
            .slots
            .remove(slot)
            .ok_or_else(|| self.not_found(key))?;
        self.ids.remove(removed.id());
        Ok(removed)
    }

    /// Definitions in precedence order, lowest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &P> + ExactSizeIterator + '_ {
        self.order.iter().map(|&key| &self.slots[key])
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn check(parameter: &P) -> Result<usize, StoreError> {
        parameter.validate().map_err(|source| StoreError::Invalid {
            category: P::CATEGORY,
            source,
        })
    }

    fn not_found(&self, key: StoreKey<'_>) -> StoreError {
        StoreError::NotFound {
            category: P::CATEGORY,
            key: key.to_string(),
        }
    }
}

impl<P: Parameter + PartialEq> PartialEq for ParameterStore<P> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::forcefield::definitions::{AngleParameter, ChargeIncrementParameter};

    fn angle(id: &str, smirks: &str, angle: f64) -> AngleParameter {
        AngleParameter {
            id: id.into(),
            smirks: smirks.into(),
            angle,
            k: 100.0,
        }
    }

    fn populated() -> ParameterStore<AngleParameter> {
        let mut store = ParameterStore::new();
        store.add(angle("a1", "[*:1]~[#6X4:2]-[*:3]", 109.5)).unwrap();
        store.add(angle("a2", "[#1:1]-[#6X4:2]-[#1:3]", 107.8)).unwrap();
        store.add(angle("a3", "[*:1]~[#8X2:2]~[*:3]", 104.5)).unwrap();
        store
    }

    fn ids(store: &ParameterStore<AngleParameter>) -> Vec<String> {
        store.iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn add_preserves_insertion_order() {
        let store = populated();
        assert_eq!(ids(&store), vec!["a1", "a2", "a3"]);
        assert_eq!(store.by_position(1).unwrap().id, "a2");
        assert_eq!(store.by_identifier("a3").unwrap().angle, 104.5);
        assert_eq!(
            store.by_smirks("[#1:1]-[#6X4:2]-[#1:3]").unwrap().id,
            "a2"
        );
    }

    #[test]
    fn add_rejects_duplicate_identifiers() {
        let mut store = populated();
        let result = store.add(angle("a2", "[#7:1]~[#6:2]~[#7:3]", 120.0));
        assert_eq!(
            result,
            Err(StoreError::DuplicateIdentifier {
                category: ParameterCategory::Angles,
                id: "a2".into()
            })
        );
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn add_rejects_invalid_definitions() {
        let mut store = ParameterStore::new();
        let result = store.add(ChargeIncrementParameter {
            id: "ci".into(),
            smirks: "[#6:1]-[#1:2]-[#8:3]".into(),
            increments: vec![0.02, -0.01, -0.005],
        });
        assert!(matches!(
            result,
            Err(StoreError::Invalid {
                source: ParameterError::ChargeSumInvalid { .. },
                ..
            })
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn by_smirks_reports_ambiguity() {
        let mut store = populated();
        store.add(angle("a4", "[#1:1]-[#6X4:2]-[#1:3]", 110.0)).unwrap();
        assert!(matches!(
            store.by_smirks("[#1:1]-[#6X4:2]-[#1:3]"),
            Err(StoreError::AmbiguousKey { count: 2, .. })
        ));
        assert!(matches!(
            store.by_smirks("[#9:1]-[#6:2]-[#9:3]"),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn delete_of_added_definition_restores_store() {
        let mut store = populated();
        let before = store.clone();
        store.add(angle("extra", "[#7:1]~[#6:2]~[#7:3]", 120.0)).unwrap();
        let removed = store.delete(StoreKey::Id("extra")).unwrap();
        assert_eq!(removed.id, "extra");
        assert_eq!(store, before);
        assert_eq!(ids(&store), ids(&before));
    }

    #[test]
    fn delete_keeps_relative_order_of_others() {
        let mut store = populated();
        store.delete(StoreKey::Position(0)).unwrap();
        assert_eq!(ids(&store), vec!["a2", "a3"]);
        assert_eq!(store.position_of(StoreKey::Id("a3")), Ok(1));
        assert!(store.by_identifier("a1").is_err());
    }

    #[test]
    fn update_edits_in_place_and_revalidates() {
        let mut store = populated();
        store
            .update(StoreKey::Id("a2"), |p| p.angle = 108.0)
            .unwrap();
        assert_eq!(store.by_position(1).unwrap().angle, 108.0);

        let result = store.update(StoreKey::Id("a2"), |p| p.smirks = "[#1:1]-[#6X4:2]".into());
        assert!(matches!(result, Err(StoreError::Invalid { .. })));
        assert_eq!(store.by_position(1).unwrap().smirks, "[#1:1]-[#6X4:2]-[#1:3]");
    }

    #[test]
    fn update_renames_and_rejects_id_collisions() {
        let mut store = populated();
        store
            .update(StoreKey::Position(0), |p| p.id = "renamed".into())
            .unwrap();
        assert!(store.by_identifier("renamed").is_ok());
        assert!(store.by_identifier("a1").is_err());

        let result = store.update(StoreKey::Id("renamed"), |p| p.id = "a3".into());
        assert!(matches!(result, Err(StoreError::DuplicateIdentifier { .. })));
        assert_eq!(store.by_position(0).unwrap().id, "renamed");
    }

    #[test]
    fn insert_places_definition_at_position() {
        let mut store = populated();
        store
            .insert(1, angle("early", "[#6:1]~[#6:2]~[#6:3]", 111.0))
            .unwrap();
        assert_eq!(ids(&store), vec!["a1", "early", "a2", "a3"]);
        assert!(store.insert(9, angle("late", "[#6:1]~[#7:2]~[#6:3]", 111.0)).is_err());
    }
}
