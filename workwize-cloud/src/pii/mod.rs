//! PII scrubbing applied to every Workwize record before persistence
//!
//! Each resource type has a static table of `(path, class)` rules. Paths are
//! dotted, `*` walks every element of an array. Fields not on a table pass
//! through unchanged. Scrubbing is idempotent: masked values and redaction
//! tokens are fixed points.

pub mod patterns;

use serde_json::{Map, Value};
use shared::sync::SyncResource;

use patterns::Patterns;

/// Masked placeholder for an empty or unusable name
pub const MASKED: &str = "***";
/// Masked placeholder for a malformed email
pub const MASKED_EMAIL: &str = "***@***.com";

/// How a field is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldClass {
    /// First character + `***`
    FirstName,
    /// Set to null
    LastName,
    /// First character of the first word + `***`
    FullName,
    /// First character of the local part + `***@***.com`
    Email,
    /// Key removed
    Phone,
    /// Key removed
    StreetLine,
    /// Embedded identifiers replaced by redaction tokens
    FreeText,
}

use FieldClass::*;

type Rules = &'static [(&'static str, FieldClass)];

const EMPLOYEE_FIELDS: Rules = &[
    ("first_name", FirstName),
    ("firstName", FirstName),
    ("last_name", LastName),
    ("lastName", LastName),
    ("name", FullName),
    ("email", Email),
    ("personal_email", Email),
    ("phone", Phone),
    ("phone_number", Phone),
    ("mobile", Phone),
    ("address.address_line_1", StreetLine),
    ("address.address_line_2", StreetLine),
    ("address.street", StreetLine),
    ("address.house_number", StreetLine),
    ("address.additional_address_line", StreetLine),
    ("notes", FreeText),
];

const ADDRESS_FIELDS: Rules = &[
    ("address_line_1", StreetLine),
    ("address_line_2", StreetLine),
    ("street", StreetLine),
    ("house_number", StreetLine),
    ("additional_address_line", StreetLine),
    ("phone", Phone),
    ("phone_number", Phone),
    ("first_name", FirstName),
    ("last_name", LastName),
    ("name", FullName),
    ("email", Email),
    ("additional_info", FreeText),
];

const ASSET_FIELDS: Rules = &[
    ("location.location_detail.first_name", FirstName),
    ("location.location_detail.last_name", LastName),
    ("location.location_detail.name", FullName),
    ("location.location_detail.email", Email),
    ("location.location_detail.phone", Phone),
    ("location.location_detail.phone_number", Phone),
    ("location.location_detail.address_line_1", StreetLine),
    ("location.location_detail.address_line_2", StreetLine),
    ("location.location_detail.street", StreetLine),
    ("location.location_detail.house_number", StreetLine),
    ("notes", FreeText),
    ("description", FreeText),
];

const ORDER_FIELDS: Rules = &[
    ("receiver", FullName),
    ("receiver_name", FullName),
    ("receiver_email", Email),
    ("receiver_phone", Phone),
    ("actor.name", FullName),
    ("actor.first_name", FirstName),
    ("actor.last_name", LastName),
    ("actor.email", Email),
    ("actor.phone", Phone),
    ("shipping_info.first_name", FirstName),
    ("shipping_info.last_name", LastName),
    ("shipping_info.name", FullName),
    ("shipping_info.email", Email),
    ("shipping_info.phone", Phone),
    ("shipping_info.phone_number", Phone),
    ("shipping_info.address_line_1", StreetLine),
    ("shipping_info.address_line_2", StreetLine),
    ("shipping_info.street", StreetLine),
    ("shipping_info.house_number", StreetLine),
    ("shipping_info.company_name", FreeText),
    ("notes", FreeText),
    ("description", FreeText),
];

const OFFBOARD_FIELDS: Rules = &[
    ("employee.first_name", FirstName),
    ("employee.last_name", LastName),
    ("employee.name", FullName),
    ("employee.email", Email),
    ("employee.phone", Phone),
    ("employee.phone_number", Phone),
    ("employee_name", FullName),
    ("employee_email", Email),
    ("reason", FreeText),
    ("notes", FreeText),
    ("extra_info", FreeText),
    ("assets.*.location.location_detail.first_name", FirstName),
    ("assets.*.location.location_detail.last_name", LastName),
    ("assets.*.location.location_detail.email", Email),
    ("assets.*.location.location_detail.phone", Phone),
];

const OFFICE_FIELDS: Rules = &[
    ("phone", Phone),
    ("phone_number", Phone),
    ("email", Email),
    ("contact_email", Email),
    ("address_line_1", StreetLine),
    ("address_line_2", StreetLine),
    ("street", StreetLine),
    ("house_number", StreetLine),
    ("address.address_line_1", StreetLine),
    ("address.address_line_2", StreetLine),
    ("address.street", StreetLine),
    ("address.house_number", StreetLine),
    ("address.additional_address_line", StreetLine),
];

const WAREHOUSE_FIELDS: Rules = &[
    ("phone", Phone),
    ("phone_number", Phone),
    ("email", Email),
    ("contact_email", Email),
    ("address.address_line_1", StreetLine),
    ("address.address_line_2", StreetLine),
    ("address.street", StreetLine),
    ("address.house_number", StreetLine),
    ("address.additional_address_line", StreetLine),
];

/// The static rule table for a resource type.
pub fn fields_for(resource: SyncResource) -> &'static [(&'static str, FieldClass)] {
    match resource {
        SyncResource::Employees => EMPLOYEE_FIELDS,
        SyncResource::Addresses => ADDRESS_FIELDS,
        SyncResource::Assets => ASSET_FIELDS,
        SyncResource::Orders => ORDER_FIELDS,
        SyncResource::Offboards => OFFBOARD_FIELDS,
        SyncResource::Offices => OFFICE_FIELDS,
        SyncResource::Warehouses => WAREHOUSE_FIELDS,
        SyncResource::Products => &[],
    }
}

/// Scrub one raw record of the given resource type.
pub fn scrub(record: &Value, resource: SyncResource) -> Value {
    let rules = fields_for(resource);
    let mut out = record.clone();

    // Collect the record's own names before masking so free text can drop them.
    let mut names = Vec::new();
    for (path, class) in rules {
        if matches!(class, FirstName | LastName | FullName) {
            collect_strings(&out, &split(path), &mut names);
        }
    }
    let names = name_words(&names);

    for (path, class) in rules {
        apply(&mut out, &split(path), *class, &names);
    }
    out
}

/// Mask a first name: `"John"` → `"J***"`.
pub fn mask_name(raw: &str) -> String {
    let trimmed = raw.trim();
    if is_masked_name(trimmed) {
        return trimmed.to_string();
    }
    match trimmed.chars().next() {
        Some(first) => format!("{first}{MASKED}"),
        None => MASKED.to_string(),
    }
}

/// Mask a full name: `"John Smith"` → `"J***"`.
pub fn mask_full_name(raw: &str) -> String {
    mask_name(raw.split_whitespace().next().unwrap_or(""))
}

/// Mask an email: `"john@acme.io"` → `"j***@***.com"`.
pub fn mask_email(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.split_once('@') {
        Some((local, _)) if local.ends_with(MASKED) && trimmed.ends_with("@***.com") => {
            trimmed.to_string()
        }
        Some((local, domain)) if !domain.is_empty() => match local.chars().next() {
            Some(first) => format!("{first}***@***.com"),
            None => MASKED_EMAIL.to_string(),
        },
        _ => MASKED_EMAIL.to_string(),
    }
}

/// Redact embedded identifiers and the given names from free text.
///
/// Without a compiled pattern set the text is dropped entirely.
pub fn scrub_text(text: &str, names: &[String]) -> Option<String> {
    match Patterns::get() {
        Ok(p) => Some(patterns::redact_names(&p.redact(text), names)),
        Err(e) => {
            tracing::error!(error = %e, "PII patterns unavailable, dropping free text");
            None
        }
    }
}

/// `"J***"` or `"***"`
fn is_masked_name(s: &str) -> bool {
    s == MASKED || (s.ends_with(MASKED) && s.chars().count() == 4)
}

fn split(path: &str) -> Vec<&str> {
    path.split('.').collect()
}

fn collect_strings(value: &Value, path: &[&str], out: &mut Vec<String>) {
    let Some((head, rest)) = path.split_first() else {
        if let Some(s) = value.as_str() {
            out.push(s.to_string());
        }
        return;
    };
    match (*head, value) {
        ("*", Value::Array(items)) => {
            for item in items {
                collect_strings(item, rest, out);
            }
        }
        (key, Value::Object(map)) => {
            if let Some(child) = map.get(key) {
                collect_strings(child, rest, out);
            }
        }
        _ => {}
    }
}

/// Split collected names into distinct words worth redacting from free text.
fn name_words(names: &[String]) -> Vec<String> {
    let mut words: Vec<String> = names
        .iter()
        .flat_map(|n| n.split_whitespace())
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| w.chars().count() >= 2 && !w.contains('*'))
        .map(str::to_string)
        .collect();
    words.sort();
    words.dedup();
    words
}

fn apply(value: &mut Value, path: &[&str], class: FieldClass, names: &[String]) {
    let Some((head, rest)) = path.split_first() else {
        return;
    };
    match value {
        Value::Array(items) if *head == "*" => {
            for item in items {
                apply(item, rest, class, names);
            }
        }
        Value::Object(map) if rest.is_empty() => apply_leaf(map, head, class, names),
        Value::Object(map) => {
            if let Some(child) = map.get_mut(*head) {
                apply(child, rest, class, names);
            }
        }
        _ => {}
    }
}

fn apply_leaf(map: &mut Map<String, Value>, key: &str, class: FieldClass, names: &[String]) {
    if !map.contains_key(key) {
        return;
    }
    match class {
        Phone | StreetLine => {
            map.remove(key);
        }
        LastName => {
            map.insert(key.to_string(), Value::Null);
        }
        FirstName | FullName => {
            let masked = match map.get(key) {
                Some(Value::String(s)) if class == FirstName => mask_name(s),
                Some(Value::String(s)) => mask_full_name(s),
                _ => MASKED.to_string(),
            };
            map.insert(key.to_string(), Value::String(masked));
        }
        Email => {
            let masked = match map.get(key) {
                Some(Value::String(s)) if !s.trim().is_empty() => Value::String(mask_email(s)),
                _ => Value::Null,
            };
            map.insert(key.to_string(), masked);
        }
        FreeText => {
            let scrubbed = match map.get(key) {
                Some(Value::String(s)) => scrub_text(s, names).map_or(Value::Null, Value::String),
                Some(Value::Null) => Value::Null,
                // Structured "free text" is not inspected; drop it.
                Some(_) => Value::Null,
                None => return,
            };
            map.insert(key.to_string(), scrubbed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mask_name() {
        assert_eq!(mask_name("John"), "J***");
        assert_eq!(mask_name(" émile "), "é***");
        assert_eq!(mask_name(""), "***");
        assert_eq!(mask_name("J***"), "J***");
        assert_eq!(mask_name("***"), "***");
    }

    #[test]
    fn test_mask_full_name() {
        assert_eq!(mask_full_name("John Smith"), "J***");
        assert_eq!(mask_full_name("   "), "***");
    }

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("john@acme.io"), "j***@***.com");
        assert_eq!(mask_email("j***@***.com"), "j***@***.com");
        assert_eq!(mask_email("not-an-email"), "***@***.com");
        assert_eq!(mask_email("@acme.io"), "***@***.com");
        assert_eq!(mask_email("***@***.com"), "***@***.com");
    }

    fn employee() -> Value {
        json!({
            "id": 42,
            "first_name": "Alice",
            "last_name": "Wong",
            "email": "alice.wong@acme.io",
            "personal_email": "ally@gmail.com",
            "phone": "+31 6 1234 5678",
            "mobile": "555-222-3333",
            "department": {"name": "Engineering"},
            "address": {
                "id": 9,
                "address_line_1": "12 Canal Street",
                "house_number": "12",
                "city": "Amsterdam"
            },
            "notes": "Alice asked to ship to 12 Canal Street, call 555-222-3333"
        })
    }

    #[test]
    fn test_scrub_employee() {
        let out = scrub(&employee(), SyncResource::Employees);
        assert_eq!(out["first_name"], "A***");
        assert_eq!(out["last_name"], Value::Null);
        assert_eq!(out["email"], "a***@***.com");
        assert_eq!(out["personal_email"], "a***@***.com");
        assert!(out.get("phone").is_none());
        assert!(out.get("mobile").is_none());
        assert!(out["address"].get("address_line_1").is_none());
        assert!(out["address"].get("house_number").is_none());
        assert_eq!(out["address"]["city"], "Amsterdam");
        assert_eq!(out["department"]["name"], "Engineering");
        assert_eq!(
            out["notes"],
            "[NAME_REDACTED] asked to ship to [ADDRESS_REDACTED], call [PHONE_REDACTED]"
        );
    }

    #[test]
    fn test_scrub_is_idempotent() {
        for (record, resource) in [
            (employee(), SyncResource::Employees),
            (order(), SyncResource::Orders),
            (offboard(), SyncResource::Offboards),
        ] {
            let once = scrub(&record, resource);
            assert_eq!(scrub(&once, resource), once);
        }
    }

    #[test]
    fn test_no_raw_pii_survives() {
        let raw = employee();
        let out = scrub(&raw, SyncResource::Employees).to_string();
        for needle in ["alice.wong@acme.io", "ally@gmail.com", "555-222-3333", "12 Canal Street", "Wong"] {
            assert!(!out.contains(needle), "{needle} leaked: {out}");
        }
    }

    #[test]
    fn test_free_text_national_numbers() {
        let cases = [
            ("Call (555) 123-4567 before pickup", "Call [PHONE_REDACTED] before pickup"),
            ("mobile 555 123 4567", "mobile [PHONE_REDACTED]"),
            ("London desk 020 7946 0958", "London desk [PHONE_REDACTED]"),
            ("NL: 06 12345678, evenings", "NL: [PHONE_REDACTED], evenings"),
            ("Collected 2024-03-01, 2 chargers", "Collected 2024-03-01, 2 chargers"),
        ];
        for (input, expected) in cases {
            assert_eq!(scrub_text(input, &[]).as_deref(), Some(expected), "{input}");
        }

        let out = scrub(
            &json!({"id": 3, "notes": "courier rang 06 12345678 twice"}),
            SyncResource::Assets,
        );
        assert_eq!(out["notes"], "courier rang [PHONE_REDACTED] twice");
    }

    fn order() -> Value {
        json!({
            "id": 7,
            "receiver": "Bob Marley",
            "receiver_email": "bob@music.com",
            "receiver_phone": "555-987-6543",
            "actor": {"id": 3, "name": "Carol King", "email": "carol@acme.io"},
            "shipping_info": {
                "first_name": "Bob",
                "last_name": "Marley",
                "address_line_1": "56 Hope Road",
                "city": "Kingston",
                "postal_code": "JM1",
                "country": "Jamaica",
                "phone": "555-987-6543"
            },
            "notes": "Leave with Bob Marley's neighbour"
        })
    }

    #[test]
    fn test_scrub_order() {
        let out = scrub(&order(), SyncResource::Orders);
        assert_eq!(out["receiver"], "B***");
        assert_eq!(out["receiver_email"], "b***@***.com");
        assert!(out.get("receiver_phone").is_none());
        assert_eq!(out["actor"]["id"], 3);
        assert_eq!(out["actor"]["name"], "C***");
        assert_eq!(out["shipping_info"]["first_name"], "B***");
        assert_eq!(out["shipping_info"]["last_name"], Value::Null);
        assert!(out["shipping_info"].get("address_line_1").is_none());
        assert_eq!(out["shipping_info"]["city"], "Kingston");
        assert_eq!(
            out["notes"],
            "Leave with [NAME_REDACTED] [NAME_REDACTED]'s neighbour"
        );
    }

    fn offboard() -> Value {
        json!({
            "id": 11,
            "employee_id": 42,
            "employee": {"first_name": "Dana", "last_name": "Scully", "email": "dana@fbi.gov"},
            "reason": "Resigned, contact dana@fbi.gov",
            "assets": [
                {"status": "returned", "location": {"location_type": "employee",
                    "location_detail": {"id": 42, "first_name": "Dana", "phone": "555-000-1111"}}},
                {"status": "available"}
            ]
        })
    }

    #[test]
    fn test_scrub_offboard_walks_arrays() {
        let out = scrub(&offboard(), SyncResource::Offboards);
        assert_eq!(out["employee"]["first_name"], "D***");
        assert_eq!(out["employee"]["last_name"], Value::Null);
        assert_eq!(out["reason"], "Resigned, contact [EMAIL_REDACTED]");
        let detail = &out["assets"][0]["location"]["location_detail"];
        assert_eq!(detail["first_name"], "D***");
        assert_eq!(detail["id"], 42);
        assert!(detail.get("phone").is_none());
        assert_eq!(out["assets"][1]["status"], "available");
    }

    #[test]
    fn test_empty_and_missing_names() {
        let out = scrub(
            &json!({"id": 1, "first_name": "", "name": null, "email": ""}),
            SyncResource::Employees,
        );
        assert_eq!(out["first_name"], "***");
        assert_eq!(out["name"], "***");
        assert_eq!(out["email"], Value::Null);
        // Absent keys are not invented
        assert!(out.get("last_name").is_none());
    }

    #[test]
    fn test_products_pass_through() {
        let product = json!({"id": 1, "name": "Dell Latitude 7440", "description": "<p>14 inch</p>"});
        assert_eq!(scrub(&product, SyncResource::Products), product);
    }

    #[test]
    fn test_office_phone_dropped_and_email_masked() {
        let out = scrub(
            &json!({"id": 2, "name": "HQ", "phone": "555-123-4567", "contact_email": "hq@acme.io",
                    "address": {"id": 5, "street": "Main", "city": "Utrecht"}}),
            SyncResource::Offices,
        );
        assert!(out.get("phone").is_none());
        assert_eq!(out["contact_email"], "h***@***.com");
        assert!(out["address"].get("street").is_none());
        assert_eq!(out["name"], "HQ");
    }

    #[test]
    fn test_every_resource_has_a_table() {
        for resource in SyncResource::ALL {
            let rules = fields_for(resource);
            if resource != SyncResource::Products {
                assert!(!rules.is_empty(), "{resource} has no PII rules");
            }
        }
    }
}
