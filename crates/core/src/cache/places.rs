//! Place lookup and insert operations.
//!
//! Rows are append-only. Reads group identical `(name, lat, lon, details)`
//! tuples together so repeated inserts of the same record come back once,
//! in first-insertion order.

use super::connection::{CacheDb, NameMatch, StorageLayout};
use crate::StoreError;
use crate::place::{Coordinate, LookupKey, PlaceDetails, PlaceRecord};
use tokio_rusqlite::params;

const SELECT_COLUMNS: &str = "SELECT name, lat, lon, details_json FROM places";
const GROUP_ORDER: &str = "GROUP BY name, lat, lon, details_json ORDER BY MIN(id)";

/// A row as read back from the `places` table.
struct StoredRow {
    name: String,
    lat: f64,
    lon: f64,
    details_json: Option<String>,
}

/// A row ready to be written, with the originating key split into columns.
struct NewRow {
    query: Option<String>,
    query_lat: Option<f64>,
    query_lon: Option<f64>,
    name: String,
    lat: f64,
    lon: f64,
    details_json: Option<String>,
}

impl StoredRow {
    fn into_record(self) -> Result<PlaceRecord, StoreError> {
        let coordinate = Coordinate::new(self.lat, self.lon).map_err(|e| StoreError::Document(e.to_string()))?;
        let record = PlaceRecord::new(coordinate, self.name);
        match self.details_json {
            Some(json) => {
                let details: PlaceDetails =
                    serde_json::from_str(&json).map_err(|e| StoreError::Document(e.to_string()))?;
                Ok(record.with_details(details))
            }
            None => Ok(record),
        }
    }
}

impl CacheDb {
    /// Find cached records for a lookup key.
    pub async fn find(&self, key: &LookupKey) -> Result<Vec<PlaceRecord>, StoreError> {
        match key {
            LookupKey::Name(name) => self.find_by_name(name).await,
            LookupKey::Coordinate(coord) => self.find_by_coordinate(*coord).await,
        }
    }

    /// Find cached records by name.
    ///
    /// Depending on [`NameMatch`], matches the original query text only, or
    /// the query text and the resolved display name. Returns an empty vec
    /// when nothing matches.
    pub async fn find_by_name(&self, name: &str) -> Result<Vec<PlaceRecord>, StoreError> {
        let name = name.to_string();
        let sql = match self.options.name_match {
            NameMatch::QueryOnly => format!("{SELECT_COLUMNS} WHERE query = ?1 {GROUP_ORDER}"),
            NameMatch::QueryOrName => format!("{SELECT_COLUMNS} WHERE query = ?1 OR name = ?1 {GROUP_ORDER}"),
        };

        let rows = self
            .conn
            .call(move |conn| -> Result<Vec<StoredRow>, StoreError> {
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map(params![name], read_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await
            .map_err(StoreError::from)?;

        rows.into_iter().map(StoredRow::into_record).collect()
    }

    /// Find cached records by exact coordinate.
    ///
    /// A row matches when either the resolved record sits at `coord` or the
    /// reverse lookup that produced it was issued for `coord`.
    pub async fn find_by_coordinate(&self, coord: Coordinate) -> Result<Vec<PlaceRecord>, StoreError> {
        let (lat, lon) = (coord.lat(), coord.lon());
        let sql = format!(
            "{SELECT_COLUMNS} WHERE (lat = ?1 AND lon = ?2) OR (query_lat = ?1 AND query_lon = ?2) {GROUP_ORDER}"
        );

        let rows = self
            .conn
            .call(move |conn| -> Result<Vec<StoredRow>, StoreError> {
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map(params![lat, lon], read_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await
            .map_err(StoreError::from)?;

        rows.into_iter().map(StoredRow::into_record).collect()
    }

    /// Append one record under the key that produced it.
    ///
    /// No uniqueness is enforced; inserting the same record twice stores two rows.
    pub async fn insert(&self, key: &LookupKey, record: &PlaceRecord) -> Result<(), StoreError> {
        self.insert_many(key, std::slice::from_ref(record)).await
    }

    /// Append several records under one key in a single transaction.
    pub async fn insert_many(&self, key: &LookupKey, records: &[PlaceRecord]) -> Result<(), StoreError> {
        if records.is_empty() {
            return Ok(());
        }

        let rows = records
            .iter()
            .map(|record| self.new_row(key, record))
            .collect::<Result<Vec<_>, _>>()?;
        let fetched_at = chrono::Utc::now().to_rfc3339();

        self.conn
            .call(move |conn| -> Result<(), StoreError> {
                let tx = conn.transaction()?;
                {
                    let mut stmt = tx.prepare(
                        "INSERT INTO places (query, query_lat, query_lon, name, lat, lon, details_json, fetched_at)
                        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    )?;
                    for row in &rows {
                        stmt.execute(params![
                            &row.query,
                            &row.query_lat,
                            &row.query_lon,
                            &row.name,
                            &row.lat,
                            &row.lon,
                            &row.details_json,
                            &fetched_at,
                        ])?;
                    }
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(StoreError::from)
    }

    /// Total number of stored rows, duplicates included.
    pub async fn count(&self) -> Result<u64, StoreError> {
        self.conn
            .call(|conn| -> Result<u64, StoreError> {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM places", [], |row| row.get(0))?;
                Ok(count as u64)
            })
            .await
            .map_err(StoreError::from)
    }

    fn new_row(&self, key: &LookupKey, record: &PlaceRecord) -> Result<NewRow, StoreError> {
        let (query, query_lat, query_lon) = match key {
            LookupKey::Name(name) => (Some(name.clone()), None, None),
            LookupKey::Coordinate(coord) => (None, Some(coord.lat()), Some(coord.lon())),
        };

        let details_json = match self.options.layout {
            StorageLayout::Columns => None,
            StorageLayout::Document if record.details().is_empty() => None,
            StorageLayout::Document => {
                Some(serde_json::to_string(record.details()).map_err(|e| StoreError::Document(e.to_string()))?)
            }
        };

        let coordinate = record.coordinate();
        Ok(NewRow {
            query,
            query_lat,
            query_lon,
            name: record.display_name().to_string(),
            lat: coordinate.lat(),
            lon: coordinate.lon(),
            details_json,
        })
    }
}

fn read_row(row: &tokio_rusqlite::rusqlite::Row<'_>) -> tokio_rusqlite::rusqlite::Result<StoredRow> {
    Ok(StoredRow { name: row.get(0)?, lat: row.get(1)?, lon: row.get(2)?, details_json: row.get(3)? })
}
