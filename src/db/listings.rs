use crate::db::connection::Database;
use crate::domain::Listing;
use crate::errors::DbError;
use rusqlite::{params, OptionalExtension, Row};
use serde_json::Value;

/// A listing as read back from the store, with its row id.
#[derive(Debug, Clone)]
pub struct StoredListing {
    pub id: i64,
    pub listing: Listing,
}

const SELECT_COLUMNS: &str = r#"
    id, source, url, address, price, beds, baths, living_area, lot_size,
    year_built, days_on_market, status, description, raw_json, score,
    classified_label, created_at, processed_at
"#;

/// Insert-or-update keyed by URL, in one statement.
///
/// Every mutable column takes the new value, including NULLs (last write wins,
/// no merging). `created_at` is written on insert only, so it keeps the date the
/// URL was first seen.
pub fn upsert_listing(db: &Database, listing: &Listing) -> Result<(), DbError> {
    let raw_json = listing
        .raw_json_text()
        .map_err(|e| DbError::Query(format!("raw_json for {}: {e}", listing.url)))?;

    db.with_conn(|conn| {
        conn.execute(
            r#"
            INSERT INTO listings (
                source, url, address, price, beds, baths, living_area, lot_size,
                year_built, days_on_market, status, description, raw_json, score,
                classified_label, created_at, processed_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8,
                ?9, ?10, ?11, ?12, ?13, ?14,
                ?15, ?16, ?17
            )
            ON CONFLICT(url) DO UPDATE SET
                source = excluded.source,
                address = excluded.address,
                price = excluded.price,
                beds = excluded.beds,
                baths = excluded.baths,
                living_area = excluded.living_area,
                lot_size = excluded.lot_size,
                year_built = excluded.year_built,
                days_on_market = excluded.days_on_market,
                status = excluded.status,
                description = excluded.description,
                raw_json = excluded.raw_json,
                score = excluded.score,
                classified_label = excluded.classified_label,
                processed_at = excluded.processed_at
            "#,
            params![
                listing.source,
                listing.url,
                listing.address,
                listing.price,
                listing.beds,
                listing.baths,
                listing.living_area,
                listing.lot_size,
                listing.year_built,
                listing.days_on_market,
                listing.status,
                listing.description,
                raw_json,
                listing.score,
                listing.classified_label,
                listing.created_at,
                listing.processed_at,
            ],
        )?;
        Ok(())
    })?;

    tracing::debug!(url = %listing.url, "upserted listing");
    Ok(())
}

pub fn get_listing_by_url(db: &Database, url: &str) -> Result<Option<StoredListing>, DbError> {
    db.with_conn(|conn| {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM listings WHERE url = ?1");
        let found = conn.query_row(&sql, params![url], row_to_stored).optional()?;
        Ok(found)
    })
}

pub fn count_listings(db: &Database) -> Result<i64, DbError> {
    db.with_conn(|conn| {
        let n = conn.query_row("SELECT COUNT(*) FROM listings", [], |r| r.get(0))?;
        Ok(n)
    })
}

/// Every stored listing, best score first.
pub fn all_listings(db: &Database) -> Result<Vec<StoredListing>, DbError> {
    db.with_conn(|conn| {
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM listings ORDER BY score IS NULL, score DESC, url"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], row_to_stored)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    })
}

fn row_to_stored(row: &Row<'_>) -> rusqlite::Result<StoredListing> {
    let raw_text: Option<String> = row.get(13)?;
    // Rows written by other tools may hold plain text here.
    let raw_json = match raw_text {
        Some(text) => serde_json::from_str(&text).unwrap_or(Value::String(text)),
        None => Value::Null,
    };

    Ok(StoredListing {
        id: row.get(0)?,
        listing: Listing {
            source: row.get(1)?,
            url: row.get(2)?,
            address: row.get(3)?,
            price: row.get(4)?,
            beds: row.get(5)?,
            baths: row.get(6)?,
            living_area: row.get(7)?,
            lot_size: row.get(8)?,
            year_built: row.get(9)?,
            days_on_market: row.get(10)?,
            status: row.get(11)?,
            description: row.get(12)?,
            raw_json,
            score: row.get(14)?,
            classified_label: row.get(15)?,
            created_at: row.get(16)?,
            processed_at: row.get(17)?,
        },
    })
}
