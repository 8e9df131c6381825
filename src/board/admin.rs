use log::{info, warn};

use crate::board::store::Store;
use crate::board::*;

/// The shared admin password, read once at startup.
///
/// Without a configured password the gate never opens.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AdminSecret(Option<String>);

impl AdminSecret {
    pub fn new(password: Option<String>) -> AdminSecret {
        AdminSecret(password.filter(|p| !p.is_empty()))
    }

    pub fn is_configured(&self) -> bool {
        self.0.is_some()
    }

    pub fn check(&self, submitted: &str) -> Gate {
        if submitted.is_empty() {
            return Gate::NotSubmitted;
        }
        match &self.0 {
            Some(secret) if secret == submitted => Gate::Granted,
            _ => {
                warn!("Admin gate: incorrect password submitted");
                Gate::Denied
            }
        }
    }
}

// Never print the password.
impl std::fmt::Debug for AdminSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(_) => write!(f, "AdminSecret(<set>)"),
            None => write!(f, "AdminSecret(<unset>)"),
        }
    }
}

/// Outcome of the admin password check.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Gate {
    /// The password field was left empty: show nothing.
    NotSubmitted,
    Granted,
    Denied,
}

/// A message shown on the admin page after an action.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Notice {
    Success(String),
    Warning(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Success(s) | Notice::Warning(s) | Notice::Error(s) => s.as_str(),
        }
    }

    fn rejected(e: EditError) -> Notice {
        warn!("Edit rejected: {}", e);
        match e {
            EditError::DuplicateEvent { .. } => Notice::Warning(e.to_string()),
            _ => Notice::Error(e.to_string()),
        }
    }
}

fn in_category(category: Option<&str>) -> String {
    match category {
        Some(c) => format!(" in category '{}'", c),
        None => String::new(),
    }
}

/// Overwrites the three places of an event and saves the table.
pub fn update_standings(
    store: &Store,
    category: Option<&str>,
    event: &str,
    placings: Placings,
) -> BoardResult<Notice> {
    let mut table = store.load()?;
    let key = table.key(event, category);
    match table.update_standings(key, placings) {
        Ok(_) => {
            store.save(&table)?;
            info!("Standings of {:?}{} updated", event, in_category(key.category));
            Ok(Notice::Success("Standings updated successfully!".to_string()))
        }
        Err(e) => Ok(Notice::rejected(e)),
    }
}

/// Appends a new event with empty places and saves the table.
pub fn add_event(store: &Store, event: &str, category: Option<&str>) -> BoardResult<Notice> {
    let mut table = store.load()?;
    let category = table.key(event, category).category;
    match table.add_event(event, category) {
        Ok(()) => {
            store.save(&table)?;
            let msg = match category {
                Some(c) => format!(
                    "Event '{}' added successfully to category '{}'!",
                    event, c
                ),
                None => format!("Event '{}' added successfully!", event),
            };
            Ok(Notice::Success(msg))
        }
        Err(e) => Ok(Notice::rejected(e)),
    }
}

/// Removes an event and saves the table. Removing an absent event leaves the
/// content unchanged.
pub fn delete_event(store: &Store, category: Option<&str>, event: &str) -> BoardResult<Notice> {
    let mut table = store.load()?;
    let key = table.key(event, category);
    let removed = table.delete_event(key);
    store.save(&table)?;
    let msg = match (removed, key.category) {
        (0, _) => {
            return Ok(Notice::Warning(format!(
                "Event '{}' was not found{}.",
                event,
                in_category(key.category)
            )))
        }
        (_, Some(c)) => format!(
            "Event '{}' deleted successfully from category '{}'!",
            event, c
        ),
        (_, None) => format!("Event '{}' deleted successfully!", event),
    };
    Ok(Notice::Success(msg))
}
