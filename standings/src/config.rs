// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

use serde::Serialize;

/// One recorded standing: the podium of a single event.
///
/// The category is always present for the categorized layout and always
/// absent for the flat layout. Empty placement strings mean the place has
/// not been filled yet.
#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct Standing {
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub first: String,
    pub second: String,
    pub third: String,
}

impl Standing {
    /// A standing with all the places left empty.
    pub fn unfilled(event: &str, category: Option<&str>) -> Standing {
        Standing {
            event: event.to_string(),
            category: category.map(|c| c.to_string()),
            first: String::new(),
            second: String::new(),
            third: String::new(),
        }
    }

    pub fn key(&self) -> StandingKey<'_> {
        StandingKey {
            event: self.event.as_str(),
            category: self.category.as_deref(),
        }
    }

    pub fn get(&self, place: Place) -> &str {
        match place {
            Place::First => self.first.as_str(),
            Place::Second => self.second.as_str(),
            Place::Third => self.third.as_str(),
        }
    }
}

/// The identity of a standing inside a table.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub struct StandingKey<'a> {
    pub event: &'a str,
    pub category: Option<&'a str>,
}

impl<'a> StandingKey<'a> {
    pub fn new(event: &'a str, category: Option<&'a str>) -> StandingKey<'a> {
        StandingKey { event, category }
    }
}

/// The three values submitted when updating a standing.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Placings {
    pub first: String,
    pub second: String,
    pub third: String,
}

/// A rank column.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Place {
    First,
    Second,
    Third,
}

impl Place {
    pub const ALL: [Place; 3] = [Place::First, Place::Second, Place::Third];

    /// The header of this column in the backing file.
    pub fn column(&self) -> &'static str {
        match self {
            Place::First => "1st Place",
            Place::Second => "2nd Place",
            Place::Third => "3rd Place",
        }
    }
}

pub const EVENT_COLUMN: &str = "Event";
pub const CATEGORY_COLUMN: &str = "Category";

// ********* Layouts **********

/// The two shapes of standings tables.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Events grouped by category; an event name is unique per category.
    Categorized,
    /// A single list of events; an event name is unique in the table.
    Flat,
}

// The starter set written when no backing file exists yet.
const CATEGORIZED_SEED: [(&str, &[&str]); 7] = [
    ("Boys A", &["100m Run", "200m Run", "Long Jump"]),
    ("Girls A", &["100m Run", "High Jump"]),
    ("Boys B", &["400m Run", "High Jump"]),
    ("Girls B", &["200m Run", "Long Jump"]),
    ("Boys C", &["100m Run", "400m Run"]),
    ("Girls C", &["High Jump", "Long Jump"]),
    ("CWSN", &["50m Walk", "Ball Throw"]),
];

const FLAT_SEED: [&str; 4] = ["100m Run", "400m Run", "Long Jump", "High Jump"];

impl Layout {
    pub fn is_categorized(&self) -> bool {
        matches!(self, Layout::Categorized)
    }

    /// The header row of the backing file, in column order.
    pub fn columns(&self) -> Vec<&'static str> {
        let mut cols = vec![EVENT_COLUMN];
        if self.is_categorized() {
            cols.push(CATEGORY_COLUMN);
        }
        cols.extend(Place::ALL.iter().map(|p| p.column()));
        cols
    }

    /// The built-in categories, empty for the flat layout.
    pub fn default_categories(&self) -> Vec<&'static str> {
        match self {
            Layout::Categorized => CATEGORIZED_SEED.iter().map(|(c, _)| *c).collect(),
            Layout::Flat => vec![],
        }
    }

    /// The fixed starter standings, all unfilled.
    pub fn seed(&self) -> Vec<Standing> {
        match self {
            Layout::Categorized => CATEGORIZED_SEED
                .iter()
                .flat_map(|&(category, events)| {
                    events
                        .iter()
                        .map(move |&event| Standing::unfilled(event, Some(category)))
                })
                .collect(),
            Layout::Flat => FLAT_SEED
                .iter()
                .map(|&event| Standing::unfilled(event, None))
                .collect(),
        }
    }
}

impl std::str::FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "categorized" => Ok(Layout::Categorized),
            "flat" => Ok(Layout::Flat),
            x => Err(format!(
                "unknown layout {:?} (expected 'categorized' or 'flat')",
                x
            )),
        }
    }
}

impl Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Layout::Categorized => write!(f, "categorized"),
            Layout::Flat => write!(f, "flat"),
        }
    }
}

// ******** Output data structures *********

/// The highlight given to a filled podium cell.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum CellStyle {
    Gold,
    Silver,
    Bronze,
}

impl CellStyle {
    pub fn background(&self) -> &'static str {
        match self {
            CellStyle::Gold => "gold",
            CellStyle::Silver => "silver",
            CellStyle::Bronze => "#cd7f32",
        }
    }

    /// Inline CSS for the cell.
    pub fn css(&self) -> String {
        format!(
            "background-color: {}; color: black; font-weight: bold;",
            self.background()
        )
    }
}

/// Result of resolving the admin selection against the current table.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Selection {
    /// The row index of the selected standing, with the resolved key.
    Row {
        index: usize,
        category: Option<String>,
        event: String,
    },
    /// No option is available: the table (or the chosen category) has no events.
    Nothing,
}

/// Errors that reject an edit of the table. The table is left unchanged.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum EditError {
    EmptyEventName,
    EmptyCategory,
    DuplicateEvent {
        event: String,
        category: Option<String>,
    },
    UnknownEvent {
        event: String,
        category: Option<String>,
    },
}

impl Error for EditError {}

impl Display for EditError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditError::EmptyEventName => write!(f, "Event name cannot be empty."),
            EditError::EmptyCategory => write!(f, "Category cannot be empty."),
            EditError::DuplicateEvent {
                category: Some(_), ..
            } => write!(f, "This event already exists in the selected category!"),
            EditError::DuplicateEvent { category: None, .. } => {
                write!(f, "This event already exists!")
            }
            EditError::UnknownEvent {
                event,
                category: Some(c),
            } => write!(f, "No event '{}' in category '{}'.", event, c),
            EditError::UnknownEvent {
                event,
                category: None,
            } => write!(f, "No event '{}'.", event),
        }
    }
}
