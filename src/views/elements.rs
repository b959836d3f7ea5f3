// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Presentation identity.
//!
//! On screen an element is addressed by its position in the rendered list,
//! in storage by the id the library assigned. [`ElementMap`] is the lookup
//! table between the two, rebuilt whenever a screen's contents are replaced,
//! so neither identity ever stands in for the other.

use std::{collections::HashMap, hash::Hash};

/// Reference to a rendered element, such as a grid tile or a table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub usize);

#[derive(Debug, Clone)]
pub struct ElementMap<K> {
    ids: Vec<K>,
    elements: HashMap<K, ElementId>,
}

impl<K> Default for ElementMap<K> {
    fn default() -> Self {
        Self {
            ids: Vec::new(),
            elements: HashMap::new(),
        }
    }
}

impl<K: Copy + Eq + Hash> ElementMap<K> {
    /// Builds the map for elements rendered in the order of `ids`.
    pub fn from_ids(ids: impl IntoIterator<Item = K>) -> Self {
        let mut map = Self::default();
        for id in ids {
            map.push(id);
        }
        map
    }

    /// Registers the next rendered element, returning its reference.
    pub fn push(&mut self, id: K) -> ElementId {
        let element = ElementId(self.ids.len());
        self.ids.push(id);
        self.elements.entry(id).or_insert(element);
        element
    }

    pub fn id_of(&self, element: ElementId) -> Option<K> {
        self.ids.get(element.0).copied()
    }

    /// First element showing `id`.
    pub fn element_of(&self, id: K) -> Option<ElementId> {
        self.elements.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PlaylistId;

    #[test]
    fn maps_both_ways() {
        let map = ElementMap::from_ids([PlaylistId(0), PlaylistId(7), PlaylistId(3)]);

        assert_eq!(map.id_of(ElementId(1)), Some(PlaylistId(7)));
        assert_eq!(map.element_of(PlaylistId(3)), Some(ElementId(2)));
        assert_eq!(map.id_of(ElementId(3)), None);
        assert_eq!(map.element_of(PlaylistId(9)), None);
    }

    #[test]
    fn duplicate_ids_resolve_to_first_element() {
        let mut map = ElementMap::default();
        map.push(5_i64);
        map.push(5_i64);

        assert_eq!(map.len(), 2);
        assert_eq!(map.element_of(5), Some(ElementId(0)));
        assert_eq!(map.id_of(ElementId(1)), Some(5));
    }
}
