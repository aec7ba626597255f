//! Order rows

use shared::models::Order;
use shared::request::PageRequest;
use sqlx::PgPool;

use super::BoxError;
use super::listing::{self, Filter};

pub const TABLE: &str = "orders";
const COLUMNS: &str = "id, order_number, status, order_date, delivery_date, total_amount, currency, \
     customer_id, employee_id, warehouse_id, notes, po_number, total_products, receiver, \
     receiver_type, express_delivery, shipping_info, created_at, updated_at";

// ── Sync ──

pub async fn upsert(pool: &PgPool, row: &Order) -> Result<(), BoxError> {
    sqlx::query(
        r#"
        INSERT INTO orders (
            id, order_number, status, order_date, delivery_date, total_amount, currency,
            customer_id, employee_id, warehouse_id, notes, po_number, total_products,
            receiver, receiver_type, express_delivery, shipping_info, created_at, updated_at
        )
        VALUES (
            $1, $2, $3, $4, $5, $6, $7, $8,
            (SELECT id FROM employees WHERE id = $9),
            (SELECT id FROM warehouses WHERE id = $10),
            $11, $12, $13, $14, $15, $16, $17, $18, $19
        )
        ON CONFLICT (id)
        DO UPDATE SET
            order_number = EXCLUDED.order_number, status = EXCLUDED.status,
            order_date = EXCLUDED.order_date, delivery_date = EXCLUDED.delivery_date,
            total_amount = EXCLUDED.total_amount, currency = EXCLUDED.currency,
            customer_id = EXCLUDED.customer_id, employee_id = EXCLUDED.employee_id,
            warehouse_id = EXCLUDED.warehouse_id, notes = EXCLUDED.notes,
            po_number = EXCLUDED.po_number, total_products = EXCLUDED.total_products,
            receiver = EXCLUDED.receiver, receiver_type = EXCLUDED.receiver_type,
            express_delivery = EXCLUDED.express_delivery, shipping_info = EXCLUDED.shipping_info,
            updated_at = EXCLUDED.updated_at
        "#,
    )
    .bind(&row.id)
    .bind(&row.order_number)
    .bind(&row.status)
    .bind(&row.order_date)
    .bind(&row.delivery_date)
    .bind(row.total_amount)
    .bind(&row.currency)
    .bind(&row.customer_id)
    .bind(&row.employee_id)
    .bind(&row.warehouse_id)
    .bind(&row.notes)
    .bind(&row.po_number)
    .bind(row.total_products)
    .bind(&row.receiver)
    .bind(&row.receiver_type)
    .bind(row.express_delivery)
    .bind(&row.shipping_info)
    .bind(row.created_at)
    .bind(row.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

// ── Console Read ──

pub async fn list(
    pool: &PgPool,
    filters: &[Filter],
    page: PageRequest,
) -> Result<(Vec<Order>, i64), BoxError> {
    listing::fetch_page(pool, TABLE, COLUMNS, filters, page).await
}

pub async fn get(pool: &PgPool, id: &str) -> Result<Option<Order>, BoxError> {
    listing::fetch_one(pool, TABLE, COLUMNS, id).await
}
