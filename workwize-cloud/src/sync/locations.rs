//! Known Workwize warehouse sites
//!
//! The provider returns most warehouses without an address. Sites with a
//! known code get a synthetic `wh-<code>` address (city and country only).

use shared::models::Address;
use shared::util::now_millis;

/// `(code, city, country)`
const WAREHOUSE_SITES: &[(&str, &str, &str)] = &[
    ("LDW", "London", "United Kingdom"),
    ("ER3", "Rotterdam", "Netherlands"),
    ("VEW", "Veldhoven", "Netherlands"),
    ("LBZ", "Labège", "France"),
    ("LPB", "Leipzig", "Germany"),
    ("YYZ", "Toronto", "Canada"),
    ("SYD", "Sydney", "Australia"),
    ("LPP", "Lappeenranta", "Finland"),
    ("MXW", "Manassas", "United States"),
    ("SIW", "Singapore", "Singapore"),
    ("SOA", "Soacha", "Colombia"),
    ("CSW", "Columbus", "United States"),
    ("TYO", "Tokyo", "Japan"),
    ("DXB", "Dubai", "United Arab Emirates"),
    ("MEX", "Mexico City", "Mexico"),
    ("MRS", "Marseille", "France"),
    ("JER", "Jersey", "United Kingdom"),
    ("IND", "Indianapolis", "United States"),
];

/// City and country of a warehouse code, case-insensitive.
pub fn site_for(code: &str) -> Option<(&'static str, &'static str)> {
    let code = code.trim();
    WAREHOUSE_SITES
        .iter()
        .find(|(c, _, _)| c.eq_ignore_ascii_case(code))
        .map(|&(_, city, country)| (city, country))
}

/// Synthetic address for a known warehouse code.
pub fn synthetic_address(code: &str) -> Option<Address> {
    let (city, country) = site_for(code)?;
    let now = now_millis();
    Some(Address {
        id: format!("wh-{}", code.trim().to_ascii_uppercase()),
        employee_id: None,
        city: Some(city.to_string()),
        region: None,
        country: Some(country.to_string()),
        postal_code: None,
        latitude: None,
        longitude: None,
        created_at: now,
        updated_at: now,
    })
}
