//! Map scrubbed Workwize records to typed rows
//!
//! The provider mixes snake and camel case, sometimes nests references as
//! `{id, name}` objects and sometimes sends bare ids. Every accessor here
//! tries the known aliases in order.

use rust_decimal::Decimal;
use serde_json::{Map, Value, json};
use shared::models::{Address, Asset, Country, Employee, Offboard, Office, Order, Product, Warehouse};
use shared::util::{now_millis, parse_timestamp};

use crate::pii::MASKED;

/// Longest product description kept, in characters
const MAX_DESCRIPTION_CHARS: usize = 5000;

/// Asset statuses that count as "back with the company"
const RETURNED_STATUSES: [&str; 3] = ["returned", "received", "available"];

/// Shipping keys kept on an order
const SHIPPING_KEYS: [&str; 6] = ["city", "region", "state", "postal_code", "postcode", "country"];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TransformError {
    #[error("record has no id")]
    MissingId,
    #[error("record is not a JSON object")]
    NotAnObject,
}

// ── Field accessors ──

/// Render a scalar as text; empty strings count as absent.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// First non-empty scalar among `keys`.
fn text(v: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| v.get(*k).and_then(scalar_text))
}

/// A string, or the `name` (then `code`) of a nested object.
fn label(v: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| match v.get(*k)? {
        Value::Object(obj) => ["display_name", "name", "code"]
            .iter()
            .find_map(|f| obj.get(*f).and_then(scalar_text)),
        other => scalar_text(other),
    })
}

/// Id of a nested `{id}` object or a bare id under `object_key`, then the flat aliases.
fn reference(v: &Value, object_key: &str, flat_keys: &[&str]) -> Option<String> {
    let nested = match v.get(object_key) {
        Some(Value::Object(obj)) => obj.get("id").and_then(scalar_text),
        Some(other) => scalar_text(other),
        None => None,
    };
    nested.or_else(|| text(v, flat_keys))
}

fn flag(v: &Value, keys: &[&str]) -> Option<bool> {
    keys.iter().find_map(|k| match v.get(*k)? {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|i| i != 0),
        Value::String(s) => match s.as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

fn decimal(v: &Value, keys: &[&str]) -> Option<Decimal> {
    text(v, keys).and_then(|s| s.parse::<Decimal>().ok())
}

fn integer(v: &Value, keys: &[&str]) -> Option<i32> {
    keys.iter().find_map(|k| match v.get(*k)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .and_then(|i| i32::try_from(i).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn float(v: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|k| match v.get(*k)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn timestamp(v: &Value, keys: &[&str]) -> Option<i64> {
    text(v, keys).and_then(|s| parse_timestamp(&s))
}

fn record_id(v: &Value) -> Result<String, TransformError> {
    if !v.is_object() {
        return Err(TransformError::NotAnObject);
    }
    text(v, &["id"]).ok_or(TransformError::MissingId)
}

/// `(created_at, updated_at)`, falling back to now
fn stamps(v: &Value, now: i64) -> (i64, i64) {
    (
        timestamp(v, &["created_at", "createdAt"]).unwrap_or(now),
        timestamp(v, &["updated_at", "updatedAt"]).unwrap_or(now),
    )
}

// ── Entities ──

pub fn employee(v: &Value) -> Result<Employee, TransformError> {
    let id = record_id(v)?;
    let now = now_millis();
    let (created_at, updated_at) = stamps(v, now);

    let status = match flag(v, &["isDeactivated", "is_deactivated"]) {
        Some(true) => Some("inactive".to_string()),
        Some(false) => Some("active".to_string()),
        None => text(v, &["status"]).or_else(|| Some("active".to_string())),
    };

    Ok(Employee {
        id,
        first_name: text(v, &["first_name", "firstName", "name"]).or_else(|| Some(MASKED.to_string())),
        last_name: None,
        email: text(v, &["email"]),
        department: label(v, &["department", "team"]),
        role: label(v, &["original_role", "role"]),
        status,
        job_title: text(v, &["job_title", "jobTitle"]),
        manager_id: reference(v, "manager", &["manager_id", "managerId"]),
        office_id: reference(v, "office", &["office_id", "officeId"]),
        address_id: reference(v, "address", &["address_id", "addressId"]),
        start_date: text(v, &["start_date", "startDate", "created_at"]),
        end_date: text(v, &["end_date", "endDate"]),
        created_at,
        updated_at,
    })
}

pub fn address(v: &Value, employee_id: Option<&str>) -> Result<Address, TransformError> {
    let id = record_id(v)?;
    let (created_at, updated_at) = stamps(v, now_millis());
    Ok(Address {
        id,
        employee_id: employee_id.map(str::to_string),
        city: text(v, &["city"]),
        region: text(v, &["region", "state"]),
        country: label(v, &["country"]),
        postal_code: text(v, &["postal_code", "postcode", "zip"]),
        latitude: float(v, &["latitude", "lat"]),
        longitude: float(v, &["longitude", "lng", "lon"]),
        created_at,
        updated_at,
    })
}

/// Address object embedded under `address`, when it carries an id.
pub fn embedded_address(v: &Value, employee_id: Option<&str>) -> Option<Address> {
    match v.get("address") {
        Some(inner @ Value::Object(_)) => address(inner, employee_id).ok(),
        _ => None,
    }
}

/// Country reference data from an address's `country` object.
pub fn country(address: &Value) -> Option<Country> {
    let obj = address.get("country").filter(|c| c.is_object())?;
    let id = text(obj, &["id"])?;
    let name = text(obj, &["name"])?;
    let code = text(obj, &["code"])?;
    let now = now_millis();
    Some(Country {
        id,
        name,
        code,
        requires_tin: flag(obj, &["requires_tin"]).unwrap_or(false),
        invoice_currency: label(obj, &["invoice_currency"]),
        is_offboardable: flag(obj, &["is_offboardable"]).unwrap_or(true),
        created_at: now,
        updated_at: now,
    })
}

pub fn office(v: &Value) -> Result<Office, TransformError> {
    let id = record_id(v)?;
    let (created_at, updated_at) = stamps(v, now_millis());
    Ok(Office {
        name: text(v, &["name"]).or_else(|| Some(format!("Office {id}"))),
        code: text(v, &["code", "office_code"]),
        address_id: reference(v, "address", &["address_id", "addressId"]),
        contact_email: text(v, &["contact_email", "email"]),
        capacity: integer(v, &["capacity", "max_capacity"]),
        status: text(v, &["status"]).or_else(|| Some("active".to_string())),
        id,
        created_at,
        updated_at,
    })
}

pub fn warehouse(v: &Value) -> Result<Warehouse, TransformError> {
    let id = record_id(v)?;
    let (created_at, updated_at) = stamps(v, now_millis());
    Ok(Warehouse {
        name: text(v, &["name"]).or_else(|| Some(format!("Warehouse {id}"))),
        code: text(v, &["code", "warehouse_code"]),
        address_id: reference(v, "address", &["address_id", "addressId"]),
        capacity: integer(v, &["capacity", "max_capacity"]),
        status: text(v, &["status"]).or_else(|| Some("active".to_string())),
        warehouse_type: label(v, &["type", "warehouse_type", "warehouse_provider"]),
        id,
        created_at,
        updated_at,
    })
}

pub fn product(v: &Value) -> Result<Product, TransformError> {
    let id = record_id(v)?;
    let (created_at, updated_at) = stamps(v, now_millis());
    let raw_name = text(v, &["name"]);

    let manufacturer = label(v, &["manufacturer", "brand"]).or_else(|| {
        raw_name
            .as_deref()
            .and_then(|n| n.split(',').next())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    });

    Ok(Product {
        name: raw_name.clone().or_else(|| Some(format!("Product {id}"))),
        sku: text(v, &["sku", "article_code", "ean"]),
        category: label(v, &["category"]),
        description: text(v, &["description", "short_description"])
            .map(|d| truncate_chars(&strip_html(&d), MAX_DESCRIPTION_CHARS))
            .filter(|d| !d.is_empty()),
        manufacturer,
        model: text(v, &["model"]),
        price: decimal(v, &["price", "buy_price", "rental_price"]),
        currency: label(v, &["currency"]),
        status: text(v, &["status"]).or_else(|| Some("active".to_string())),
        stock_quantity: integer(v, &["stock_quantity", "quantity"]),
        id,
        created_at,
        updated_at,
    })
}

pub fn asset(v: &Value) -> Result<Asset, TransformError> {
    let id = record_id(v)?;
    let (created_at, updated_at) = stamps(v, now_millis());

    let location = v.get("location").filter(|l| l.is_object());
    let detail = location
        .and_then(|l| l.get("location_detail"))
        .filter(|d| d.is_object());
    let location_type = location.and_then(|l| text(l, &["location_type"]));
    let detail_id = detail.and_then(|d| text(d, &["id"]));

    let (mut assigned_to_id, mut office_id, mut warehouse_id) = (None, None, None);
    match location_type.as_deref() {
        Some("employee") => assigned_to_id = detail_id,
        Some("office") => office_id = detail_id,
        Some("warehouse") => warehouse_id = detail_id,
        _ => {}
    }

    Ok(Asset {
        asset_tag: text(v, &["asset_tag", "assetTag", "tag"]).or_else(|| Some(format!("ASSET-{id}"))),
        name: text(v, &["name", "product_name"]).or_else(|| Some("Unknown".to_string())),
        category: label(v, &["category"]),
        status: text(v, &["status"]),
        serial_number: text(v, &["serial_number", "serialNumber"]),
        product_id: reference(v, "product", &["product_id", "productId"]),
        assigned_to_id,
        location: detail.and_then(coarse_location),
        purchase_date: text(v, &["purchase_date", "purchaseDate"]),
        purchase_price: decimal(v, &["purchase_price", "price"]),
        currency: label(v, &["currency", "invoice_currency"]),
        warranty_expires: text(v, &["warranty_expires", "warrantyExpires"]),
        notes: text(v, &["notes", "description"]),
        office_id,
        warehouse_id,
        id,
        created_at,
        updated_at,
    })
}

/// `"City, Region"`, falling back to the country name for the second part.
fn coarse_location(detail: &Value) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(city) = text(detail, &["city"]) {
        parts.push(city);
    }
    if let Some(region) = text(detail, &["region", "state"]) {
        parts.push(region);
    } else if let Some(country) = detail
        .get("country")
        .filter(|c| c.is_object())
        .and_then(|c| text(c, &["name"]))
    {
        parts.push(country);
    }
    (!parts.is_empty()).then(|| parts.join(", "))
}

pub fn order(v: &Value) -> Result<Order, TransformError> {
    let id = record_id(v)?;
    let now = now_millis();
    let (created_at, updated_at) = stamps(v, now);

    let customer_id = match v.get("actor") {
        Some(actor @ Value::Object(_)) => text(actor, &["id"]),
        _ => text(v, &["customer_id", "customerId"]),
    };

    let receiver_type = text(v, &["receiver_type", "receiverType"]);
    let employee_id = match (receiver_type.as_deref(), text(v, &["receiver_id", "receiverId"])) {
        (Some("employee"), Some(receiver_id)) => Some(receiver_id),
        _ => text(v, &["employee_id", "employeeId"]),
    };

    Ok(Order {
        order_number: text(v, &["number", "order_number", "orderNumber"])
            .or_else(|| Some(format!("ORDER-{id}"))),
        status: text(v, &["status"]).or_else(|| Some("unknown".to_string())),
        order_date: text(v, &["created_at", "createdAt"]),
        delivery_date: text(v, &["delivery_date", "deliveryDate"]),
        total_amount: decimal(v, &["total_amount", "buy_subtotal"]),
        currency: label(v, &["currency"]),
        customer_id,
        employee_id,
        warehouse_id: reference(v, "warehouse", &["warehouse_id", "warehouseId"]),
        notes: text(v, &["notes", "description"]),
        po_number: text(v, &["po_number", "poNumber"]),
        total_products: integer(v, &["total_products", "totalProducts"]),
        receiver: text(v, &["receiver", "receiver_name"]),
        receiver_type,
        express_delivery: flag(v, &["express_delivery", "expressDelivery"]).unwrap_or(false),
        shipping_info: ["shipping_info", "shippingInfo"]
            .iter()
            .find_map(|k| v.get(*k).filter(|s| s.is_object()))
            .map(coarse_shipping),
        id,
        created_at,
        updated_at,
    })
}

/// Keep only the coarse location keys of a shipping block.
fn coarse_shipping(info: &Value) -> Value {
    let mut out = Map::new();
    for key in SHIPPING_KEYS {
        let Some(value) = info.get(key) else { continue };
        let kept = match value {
            Value::Object(_) => label(info, &[key]).map(Value::String),
            other => scalar_text(other).map(Value::String),
        };
        if let Some(kept) = kept {
            out.insert(key.to_string(), kept);
        }
    }
    json!(out)
}

pub fn offboard(v: &Value) -> Result<Offboard, TransformError> {
    let id = record_id(v)?;
    let (created_at, updated_at) = stamps(v, now_millis());

    let assets: Vec<&Value> = v
        .get("assets")
        .and_then(Value::as_array)
        .map(|a| a.iter().filter(|x| x.is_object()).collect())
        .unwrap_or_default();
    let assets_count = integer(v, &["assets_count"]).map_or(assets.len() as i64, i64::from);
    let all_returned = !assets.is_empty()
        && assets.iter().all(|a| {
            text(a, &["status"]).is_some_and(|s| RETURNED_STATUSES.contains(&s.as_str()))
        });

    Ok(Offboard {
        employee_id: reference(v, "employee", &["employee_id", "employeeId"]),
        offboard_date: text(v, &["offboard_date", "scheduled_date", "approved_at"]),
        reason: text(v, &["reason", "type"]),
        status: text(v, &["status"]).or_else(|| Some("pending".to_string())),
        returned_assets: assets_count == 0 || all_returned,
        notes: text(v, &["notes", "extra_info"]),
        processed_by: reference(v, "processed_by", &[])
            .or_else(|| reference(v, "approved_by", &[])),
        id,
        created_at,
        updated_at,
    })
}

// ── Text helpers ──

/// Remove HTML tags and decode the handful of entities product feeds use.
pub fn strip_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_tag = false;
    for c in raw.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}

fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max - 3).collect();
    out.push_str("...");
    out
}
