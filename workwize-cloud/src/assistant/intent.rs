//! Heuristic filter extraction from a chat message
//!
//! Best effort only: a fixed table of whole-word triggers, matched
//! case-insensitively after punctuation is folded to spaces.

use serde::Serialize;

/// Device family recognised in a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Laptop,
    Monitor,
    Phone,
    Tablet,
    Keyboard,
    Mouse,
    Headset,
    Dock,
}

impl DeviceClass {
    /// `ILIKE` patterns matched against asset and product names and categories
    pub fn patterns(&self) -> &'static [&'static str] {
        match self {
            DeviceClass::Laptop => &["%laptop%", "%notebook%", "%macbook%"],
            DeviceClass::Monitor => &["%monitor%", "%display%", "%screen%"],
            DeviceClass::Phone => &["%iphone%", "%smartphone%", "%mobile%", "phone%", "% phone%"],
            DeviceClass::Tablet => &["%tablet%", "%ipad%"],
            DeviceClass::Keyboard => &["%keyboard%"],
            DeviceClass::Mouse => &["%mouse%", "%mice%"],
            DeviceClass::Headset => &["%headset%", "%headphone%"],
            DeviceClass::Dock => &["%dock%"],
        }
    }
}

/// Filters handed to the asset search and echoed back to the client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssetFilters {
    pub country: Option<String>,
    pub device_class: Option<DeviceClass>,
    pub warehouse_only: bool,
    pub assigned_only: bool,
    pub manufacturer: Option<String>,
}

/// `(alias, canonical name)`
const COUNTRIES: &[(&str, &str)] = &[
    ("usa", "United States"),
    ("united states", "United States"),
    ("america", "United States"),
    ("uk", "United Kingdom"),
    ("britain", "United Kingdom"),
    ("great britain", "United Kingdom"),
    ("england", "United Kingdom"),
    ("scotland", "United Kingdom"),
    ("wales", "United Kingdom"),
    ("northern ireland", "United Kingdom"),
    ("united kingdom", "United Kingdom"),
    ("holland", "Netherlands"),
    ("netherlands", "Netherlands"),
    ("the netherlands", "Netherlands"),
    ("germany", "Germany"),
    ("france", "France"),
    ("spain", "Spain"),
    ("italy", "Italy"),
    ("portugal", "Portugal"),
    ("belgium", "Belgium"),
    ("luxembourg", "Luxembourg"),
    ("switzerland", "Switzerland"),
    ("austria", "Austria"),
    ("ireland", "Ireland"),
    ("sweden", "Sweden"),
    ("norway", "Norway"),
    ("denmark", "Denmark"),
    ("finland", "Finland"),
    ("poland", "Poland"),
    ("czech republic", "Czech Republic"),
    ("czechia", "Czech Republic"),
    ("romania", "Romania"),
    ("greece", "Greece"),
    ("canada", "Canada"),
    ("mexico", "Mexico"),
    ("brazil", "Brazil"),
    ("colombia", "Colombia"),
    ("argentina", "Argentina"),
    ("australia", "Australia"),
    ("new zealand", "New Zealand"),
    ("japan", "Japan"),
    ("singapore", "Singapore"),
    ("india", "India"),
    ("china", "China"),
    ("philippines", "Philippines"),
    ("uae", "United Arab Emirates"),
    ("united arab emirates", "United Arab Emirates"),
    ("israel", "Israel"),
    ("south africa", "South Africa"),
    ("jamaica", "Jamaica"),
];

const DEVICES: &[(&[&str], DeviceClass)] = &[
    (
        &["laptop", "laptops", "notebook", "notebooks", "macbook", "macbooks"],
        DeviceClass::Laptop,
    ),
    (
        &["monitor", "monitors", "display", "displays", "screen", "screens"],
        DeviceClass::Monitor,
    ),
    (
        &["phone", "phones", "iphone", "iphones", "smartphone", "smartphones", "mobile", "mobiles"],
        DeviceClass::Phone,
    ),
    (&["tablet", "tablets", "ipad", "ipads"], DeviceClass::Tablet),
    (&["keyboard", "keyboards"], DeviceClass::Keyboard),
    (&["mouse", "mice"], DeviceClass::Mouse),
    (
        &["headset", "headsets", "headphone", "headphones"],
        DeviceClass::Headset,
    ),
    (
        &["dock", "docks", "docking station", "docking stations"],
        DeviceClass::Dock,
    ),
];

const WAREHOUSE_PHRASES: &[&str] = &[
    "in warehouse",
    "in warehouses",
    "in the warehouse",
    "in the warehouses",
    "at warehouse",
    "at warehouses",
    "at the warehouse",
    "at the warehouses",
    "in stock",
    "unassigned",
    "not assigned",
    "available",
];

const ASSIGNED_PHRASES: &[&str] = &["in use", "with employees", "deployed"];

/// `(trigger, canonical manufacturer)`
const MANUFACTURERS: &[(&str, &str)] = &[
    ("apple", "Apple"),
    ("macbook", "Apple"),
    ("macbooks", "Apple"),
    ("iphone", "Apple"),
    ("iphones", "Apple"),
    ("ipad", "Apple"),
    ("ipads", "Apple"),
    ("dell", "Dell"),
    ("lenovo", "Lenovo"),
    ("hp", "HP"),
    ("microsoft", "Microsoft"),
    ("samsung", "Samsung"),
    ("logitech", "Logitech"),
    ("asus", "Asus"),
    ("acer", "Acer"),
    ("google", "Google"),
];

/// Lowercased words joined by single spaces, padded on both sides.
fn normalize(message: &str) -> String {
    let folded: String = message
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    let words: Vec<&str> = folded.split_whitespace().collect();
    format!(" {} ", words.join(" "))
}

fn has_phrase(normalized: &str, phrase: &str) -> bool {
    normalized.contains(&format!(" {phrase} "))
}

/// "US", "U.S." or "U.S.A." as written.
///
/// The lower-cased pronoun never counts, nor does an all-caps message.
fn mentions_us_abbreviation(message: &str) -> bool {
    if !message.chars().any(char::is_lowercase) {
        return false;
    }
    message
        .split(|c: char| !c.is_alphanumeric() && c != '.')
        .map(|w| w.trim_end_matches('.'))
        .any(|w| matches!(w, "US" | "U.S" | "U.S.A"))
}

/// "assigned" on its own, not as "not assigned"
fn mentions_assigned(normalized: &str) -> bool {
    let words: Vec<&str> = normalized.split_whitespace().collect();
    words
        .iter()
        .enumerate()
        .any(|(i, w)| *w == "assigned" && (i == 0 || words[i - 1] != "not"))
}

pub fn extract_filters(message: &str) -> AssetFilters {
    let text = normalize(message);

    let country = COUNTRIES
        .iter()
        .filter(|(alias, _)| has_phrase(&text, alias))
        .max_by_key(|(alias, _)| alias.len())
        .map(|(_, canonical)| canonical.to_string())
        .or_else(|| mentions_us_abbreviation(message).then(|| "United States".to_string()));

    let device_class = DEVICES
        .iter()
        .find(|(triggers, _)| triggers.iter().any(|t| has_phrase(&text, t)))
        .map(|(_, class)| *class);

    let warehouse_only = WAREHOUSE_PHRASES.iter().any(|p| has_phrase(&text, p));
    let assigned_only = !warehouse_only
        && (mentions_assigned(&text) || ASSIGNED_PHRASES.iter().any(|p| has_phrase(&text, p)));

    let manufacturer = MANUFACTURERS
        .iter()
        .find(|(trigger, _)| has_phrase(&text, trigger))
        .map(|(_, canonical)| canonical.to_string());

    AssetFilters {
        country,
        device_class,
        warehouse_only,
        assigned_only,
        manufacturer,
    }
}
