// src/store.rs
//! SQLite-backed event store.
//!
//! One table, `events`, keyed by `event_id`. The store owns schema
//! bootstrap, row-level reads and writes, and bulk NDJSON seeding; it knows
//! nothing about HTTP or pricing.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::io::{BufRead, BufReader, Read};
use std::str::FromStr;

use crate::pricing::Inventory;

const SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS events (
    event_id          TEXT PRIMARY KEY,
    event_description TEXT,
    start_time        TEXT NOT NULL,
    capacity          INTEGER NOT NULL DEFAULT 0,
    price             REAL NOT NULL,
    sold              INTEGER NOT NULL DEFAULT 0
)";

/// One ticketed event, as stored and as accepted on create.
///
/// Optional request fields default the way the write path expects:
/// missing description stays NULL, missing capacity/sold start at zero.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Event {
    pub event_id: String,
    #[serde(default)]
    pub event_description: Option<String>,
    pub start_time: String,
    #[serde(default)]
    pub capacity: i64,
    pub price: f64,
    #[serde(default)]
    pub sold: i64,
}

/// Open (creating if missing) the database at `url` and bootstrap the
/// schema. Accepts any sqlx SQLite URL, e.g. `sqlite:boxoffice.sqlite`.
pub async fn connect(url: &str) -> Result<SqlitePool> {
    let opts = SqliteConnectOptions::from_str(url)
        .with_context(|| format!("parse database url {url:?}"))?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(opts)
        .await
        .with_context(|| format!("open database {url:?}"))?;

    sqlx::query(SCHEMA).execute(&pool).await?;
    Ok(pool)
}

async fn insert_row<'e, E>(ex: E, ev: &Event) -> Result<(), sqlx::Error>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    sqlx::query(
        "INSERT INTO events (event_id, event_description, start_time, capacity, price, sold) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(&ev.event_id)
    .bind(&ev.event_description)
    .bind(&ev.start_time)
    .bind(ev.capacity)
    .bind(ev.price)
    .bind(ev.sold)
    .execute(ex)
    .await?;
    Ok(())
}

pub async fn insert_event(pool: &SqlitePool, ev: &Event) -> Result<(), sqlx::Error> {
    insert_row(pool, ev).await
}

pub async fn list_events(pool: &SqlitePool) -> Result<Vec<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>("SELECT * FROM events ORDER BY event_id")
        .fetch_all(pool)
        .await
}

/// Capacity/sold snapshot for one event, `None` if the id is unknown.
pub async fn inventory(
    pool: &SqlitePool,
    event_id: &str,
) -> Result<Option<Inventory>, sqlx::Error> {
    let row: Option<(i64, i64)> =
        sqlx::query_as("SELECT capacity, sold FROM events WHERE event_id = ?1")
            .bind(event_id)
            .fetch_optional(pool)
            .await?;
    Ok(row.map(|(capacity, sold)| Inventory { capacity, sold }))
}

/// Load events from an NDJSON stream, one JSON object per line; blank
/// lines are skipped. All rows land in a single transaction. Returns the
/// number of events inserted.
pub async fn seed_ndjson<R: Read>(pool: &SqlitePool, r: R) -> Result<usize> {
    let mut br = BufReader::new(r);
    let mut line = String::new();
    let mut rows: Vec<Event> = Vec::new();

    loop {
        line.clear();
        if br.read_line(&mut line)? == 0 {
            break;
        }

        let s = line.trim();
        if s.is_empty() {
            continue;
        }

        let ev: Event =
            serde_json::from_str(s).with_context(|| format!("bad event line {:?}", s))?;
        rows.push(ev);
    }

    let mut tx = pool.begin().await?;
    for ev in &rows {
        insert_row(&mut *tx, ev)
            .await
            .with_context(|| format!("insert event {:?}", ev.event_id))?;
    }
    tx.commit().await?;

    Ok(rows.len())
}
