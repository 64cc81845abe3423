use sqlx::PgPool;
use uuid::Uuid;
use crate::models::Order;

const COLUMNS: &str = "id, portfolio_id, symbol, side, quantity, price, total_value, \
                       fees, order_date, notes, notion_page_id, created_at";

pub async fn insert(pool: &PgPool, input: Order) -> Result<Order, sqlx::Error> {
    sqlx::query_as::<_, Order>(&format!(
        "INSERT INTO orders \
         (id, portfolio_id, symbol, side, quantity, price, total_value, fees, order_date, notes, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
         RETURNING {COLUMNS}"
    ))
    .bind(input.id)
    .bind(input.portfolio_id)
    .bind(input.symbol)
    .bind(input.side)
    .bind(input.quantity)
    .bind(input.price)
    .bind(input.total_value)
    .bind(input.fees)
    .bind(input.order_date)
    .bind(input.notes)
    .bind(input.created_at)
    .fetch_one(pool)
    .await
}

pub async fn fetch_all(pool: &PgPool, portfolio_id: Option<Uuid>) -> Result<Vec<Order>, sqlx::Error> {
    match portfolio_id {
        Some(pid) => {
            sqlx::query_as::<_, Order>(&format!(
                "SELECT {COLUMNS} FROM orders WHERE portfolio_id = $1 ORDER BY order_date DESC"
            ))
            .bind(pid)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, Order>(&format!(
                "SELECT {COLUMNS} FROM orders ORDER BY order_date DESC"
            ))
            .fetch_all(pool)
            .await
        }
    }
}

pub async fn fetch_one(pool: &PgPool, id: Uuid) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as::<_, Order>(&format!(
        "SELECT {COLUMNS} FROM orders WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}
