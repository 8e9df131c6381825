mod config;
use log::{debug, info};

use std::collections::HashSet;

pub use crate::config::*;

/// The whole standings table, in file order.
///
/// All the edits keep the invariant that no two rows share the same key,
/// where the key is the event name for the flat layout and the pair
/// (event, category) for the categorized layout.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Table {
    layout: Layout,
    rows: Vec<Standing>,
}

impl Table {
    pub fn new(layout: Layout, rows: Vec<Standing>) -> Table {
        Table { layout, rows }
    }

    /// The starter table of the layout, with all the places unfilled.
    pub fn seeded(layout: Layout) -> Table {
        Table::new(layout, layout.seed())
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn rows(&self) -> &[Standing] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Builds the lookup key for this table. The category is dropped for the flat layout.
    pub fn key<'a>(&self, event: &'a str, category: Option<&'a str>) -> StandingKey<'a> {
        match self.layout {
            Layout::Categorized => StandingKey::new(event, category),
            Layout::Flat => StandingKey::new(event, None),
        }
    }

    pub fn position(&self, key: StandingKey) -> Option<usize> {
        self.rows.iter().position(|s| s.key() == key)
    }

    pub fn contains(&self, key: StandingKey) -> bool {
        self.position(key).is_some()
    }

    /// The distinct categories, in order of first appearance.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: HashSet<&str> = HashSet::new();
        self.rows
            .iter()
            .filter_map(|s| s.category.as_deref())
            .filter(|c| seen.insert(*c))
            .collect()
    }

    /// The distinct event names of a category (or of the whole table for the
    /// flat layout), in order of first appearance.
    pub fn events(&self, category: Option<&str>) -> Vec<&str> {
        let mut seen: HashSet<&str> = HashSet::new();
        self.rows
            .iter()
            .filter(|s| !self.layout.is_categorized() || s.category.as_deref() == category)
            .map(|s| s.event.as_str())
            .filter(|e| seen.insert(*e))
            .collect()
    }

    /// Resolves the admin selection.
    ///
    /// A requested category or event that is not (or no longer) among the
    /// available options falls back to the first option, the same way a
    /// dropdown starts on its first entry.
    pub fn select(&self, category: Option<&str>, event: Option<&str>) -> Selection {
        let category: Option<&str> = if self.layout.is_categorized() {
            let categories = self.categories();
            match category {
                Some(c) if categories.contains(&c) => Some(c),
                _ => match categories.first() {
                    Some(c) => Some(*c),
                    None => return Selection::Nothing,
                },
            }
        } else {
            None
        };
        let events = self.events(category);
        let event: &str = match event {
            Some(e) if events.contains(&e) => e,
            _ => match events.first() {
                Some(e) => *e,
                None => return Selection::Nothing,
            },
        };
        match self.position(self.key(event, category)) {
            Some(index) => {
                debug!("select: {:?} {:?} -> row {}", category, event, index);
                Selection::Row {
                    index,
                    category: category.map(|c| c.to_string()),
                    event: event.to_string(),
                }
            }
            None => Selection::Nothing,
        }
    }

    /// Overwrites the three places of one standing. Returns the index of the row.
    pub fn update_standings(
        &mut self,
        key: StandingKey,
        placings: Placings,
    ) -> Result<usize, EditError> {
        let Some(index) = self.position(key) else {
            return Err(EditError::UnknownEvent {
                event: key.event.to_string(),
                category: key.category.map(|c| c.to_string()),
            });
        };
        let row = &mut self.rows[index];
        row.first = placings.first;
        row.second = placings.second;
        row.third = placings.third;
        info!("update_standings: row {} is now {:?}", index, row);
        Ok(index)
    }

    /// Appends a new unfilled standing at the end of the table.
    pub fn add_event(&mut self, event: &str, category: Option<&str>) -> Result<(), EditError> {
        if event.is_empty() {
            return Err(EditError::EmptyEventName);
        }
        let category = match self.layout {
            Layout::Categorized => match category {
                Some(c) if !c.is_empty() => Some(c),
                _ => return Err(EditError::EmptyCategory),
            },
            Layout::Flat => None,
        };
        if self.contains(StandingKey::new(event, category)) {
            return Err(EditError::DuplicateEvent {
                event: event.to_string(),
                category: category.map(|c| c.to_string()),
            });
        }
        info!("add_event: {:?} in {:?}", event, category);
        self.rows.push(Standing::unfilled(event, category));
        Ok(())
    }

    /// Removes every standing matching the key. Returns how many rows were removed.
    pub fn delete_event(&mut self, key: StandingKey) -> usize {
        let before = self.rows.len();
        self.rows.retain(|s| s.key() != key);
        let removed = before - self.rows.len();
        info!("delete_event: {:?} removed {} row(s)", key, removed);
        removed
    }

    /// The rows grouped by category, categories in order of first appearance.
    /// The flat layout has no categories and yields no group.
    pub fn grouped(&self) -> Vec<(&str, Vec<&Standing>)> {
        self.categories()
            .into_iter()
            .map(|c| {
                let rows: Vec<&Standing> = self
                    .rows
                    .iter()
                    .filter(|s| s.category.as_deref() == Some(c))
                    .collect();
                (c, rows)
            })
            .collect()
    }
}

/// The highlight rule of the leaderboard: an empty cell is never highlighted,
/// a filled cell gets the color of its column whatever its content.
pub fn style(value: &str, place: Place) -> Option<CellStyle> {
    if value.is_empty() {
        return None;
    }
    Some(match place {
        Place::First => CellStyle::Gold,
        Place::Second => CellStyle::Silver,
        Place::Third => CellStyle::Bronze,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn placings(first: &str, second: &str, third: &str) -> Placings {
        Placings {
            first: first.to_string(),
            second: second.to_string(),
            third: third.to_string(),
        }
    }

    #[test]
    fn seeds_follow_the_layout() {
        let cat = Table::seeded(Layout::Categorized);
        assert_eq!(cat.len(), 15);
        assert_eq!(
            cat.categories(),
            vec!["Boys A", "Girls A", "Boys B", "Girls B", "Boys C", "Girls C", "CWSN"]
        );
        assert_eq!(
            cat.events(Some("Boys A")),
            vec!["100m Run", "200m Run", "Long Jump"]
        );

        let flat = Table::seeded(Layout::Flat);
        assert_eq!(
            flat.events(None),
            vec!["100m Run", "400m Run", "Long Jump", "High Jump"]
        );
        assert!(flat.categories().is_empty());
        assert!(flat
            .rows()
            .iter()
            .all(|s| s.first.is_empty() && s.second.is_empty() && s.third.is_empty()));
    }

    #[test]
    fn update_changes_only_the_selected_row() {
        init();
        let mut table = Table::seeded(Layout::Categorized);
        let before = table.clone();
        let key = table.key("High Jump", Some("Boys B"));
        let idx = table
            .update_standings(key, placings("Ann", "Ben", "Cid"))
            .unwrap();

        for (i, (old, new)) in before.rows().iter().zip(table.rows()).enumerate() {
            if i == idx {
                assert_eq!(new.event, "High Jump");
                assert_eq!(new.category.as_deref(), Some("Boys B"));
                assert_eq!(
                    (new.first.as_str(), new.second.as_str(), new.third.as_str()),
                    ("Ann", "Ben", "Cid")
                );
            } else {
                assert_eq!(old, new);
            }
        }
    }

    #[test]
    fn update_of_missing_key_is_rejected() {
        let mut table = Table::seeded(Layout::Flat);
        let before = table.clone();
        let res = table.update_standings(table.key("Relay", None), placings("a", "b", "c"));
        assert!(matches!(res, Err(EditError::UnknownEvent { .. })));
        assert_eq!(table, before);
    }

    #[test]
    fn add_rejects_empty_and_duplicate() {
        let mut table = Table::seeded(Layout::Categorized);
        let before = table.clone();
        assert_eq!(
            table.add_event("", Some("Boys A")),
            Err(EditError::EmptyEventName)
        );
        assert_eq!(
            table.add_event("Relay", None),
            Err(EditError::EmptyCategory)
        );
        let dup = table.add_event("100m Run", Some("Girls A"));
        assert!(matches!(dup, Err(EditError::DuplicateEvent { .. })));
        assert_eq!(
            dup.unwrap_err().to_string(),
            "This event already exists in the selected category!"
        );
        assert_eq!(table, before);

        // Same name in another category is a different key.
        table.add_event("100m Run", Some("Boys B")).unwrap();
        assert_eq!(table.len(), before.len() + 1);
        let last = table.rows().last().unwrap();
        assert_eq!(last, &Standing::unfilled("100m Run", Some("Boys B")));
    }

    #[test]
    fn flat_layout_ignores_categories() {
        let mut table = Table::seeded(Layout::Flat);
        table.add_event("Relay", Some("Boys A")).unwrap();
        assert_eq!(table.rows().last().unwrap().category, None);
        assert_eq!(
            table.add_event("Relay", None).unwrap_err().to_string(),
            "This event already exists!"
        );
        assert_eq!(table.delete_event(table.key("Relay", Some("Girls C"))), 1);
    }

    #[test]
    fn delete_counts() {
        let mut table = Table::seeded(Layout::Flat);
        assert_eq!(table.delete_event(table.key("High Jump", None)), 1);
        assert_eq!(table.len(), 3);
        assert_eq!(table.delete_event(table.key("High Jump", None)), 0);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn selection_defaults_to_first_option() {
        let table = Table::seeded(Layout::Categorized);
        assert_eq!(
            table.select(None, None),
            Selection::Row {
                index: 0,
                category: Some("Boys A".to_string()),
                event: "100m Run".to_string()
            }
        );
        // An event of another category falls back to the first event of the chosen one.
        assert_eq!(
            table.select(Some("CWSN"), Some("High Jump")),
            Selection::Row {
                index: 13,
                category: Some("CWSN".to_string()),
                event: "50m Walk".to_string()
            }
        );
        match table.select(Some("Girls C"), Some("Long Jump")) {
            Selection::Row { index, .. } => assert_eq!(table.rows()[index].event, "Long Jump"),
            Selection::Nothing => panic!("expected a row"),
        }
    }

    #[test]
    fn selection_on_empty_table_is_nothing() {
        let mut table = Table::seeded(Layout::Flat);
        for e in ["100m Run", "400m Run", "Long Jump", "High Jump"] {
            table.delete_event(table.key(e, None));
        }
        assert!(table.is_empty());
        assert_eq!(table.select(None, Some("100m Run")), Selection::Nothing);
        assert_eq!(
            Table::new(Layout::Categorized, vec![]).select(Some("Boys A"), None),
            Selection::Nothing
        );
    }

    #[test]
    fn style_depends_only_on_place_and_emptiness() {
        for place in Place::ALL {
            assert_eq!(style("", place), None);
        }
        assert_eq!(style("Alice", Place::First), Some(CellStyle::Gold));
        assert_eq!(style(" ", Place::Second), Some(CellStyle::Silver));
        assert_eq!(style("0", Place::Third), Some(CellStyle::Bronze));
        assert_eq!(
            CellStyle::Bronze.css(),
            "background-color: #cd7f32; color: black; font-weight: bold;"
        );
    }

    #[test]
    fn grouped_keeps_first_appearance_order() {
        let table = Table::new(
            Layout::Categorized,
            vec![
                Standing::unfilled("a", Some("Girls A")),
                Standing::unfilled("b", Some("Boys A")),
                Standing::unfilled("c", Some("Girls A")),
            ],
        );
        let groups = table.grouped();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "Girls A");
        assert_eq!(
            groups[0].1.iter().map(|s| s.event.as_str()).collect::<Vec<_>>(),
            vec!["a", "c"]
        );
        assert_eq!(groups[1].0, "Boys A");
        assert!(Table::seeded(Layout::Flat).grouped().is_empty());
    }
}
