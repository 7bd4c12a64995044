use anyhow::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::parse_enum;
use crate::domain::models::{IllinoisRate, NebraskaRate, Rate, RateRef};
use crate::storage::connection::DbConnection;
use shared::LicenseType;

/// Repository for the subsidy rate tables.
///
/// Rates are reference data loaded by operators; the API only reads them.
#[derive(Clone)]
pub struct RateRepository {
    db: DbConnection,
}

impl RateRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn store_illinois_rate(&self, rate: &IllinoisRate) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO illinois_rates (id, name, county, license_type, full_day_rate, part_day_rate,
                                        effective_on, expires_on)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&rate.id)
        .bind(&rate.name)
        .bind(&rate.county)
        .bind(rate.license_type.as_str())
        .bind(rate.full_day_rate)
        .bind(rate.part_day_rate)
        .bind(rate.effective_on)
        .bind(rate.expires_on)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    pub async fn store_nebraska_rate(&self, rate: &NebraskaRate) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO nebraska_rates (id, name, region, license_type, daily_rate, hourly_rate,
                                        accredited_rate, effective_on, expires_on)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&rate.id)
        .bind(&rate.name)
        .bind(&rate.region)
        .bind(rate.license_type.as_str())
        .bind(rate.daily_rate)
        .bind(rate.hourly_rate)
        .bind(rate.accredited_rate)
        .bind(rate.effective_on)
        .bind(rate.expires_on)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    /// Resolve a rate reference to its row
    pub async fn get_rate(&self, rate: &RateRef) -> Result<Option<Rate>> {
        match rate {
            RateRef::Illinois(id) => {
                let row = sqlx::query(
                    "SELECT id, name, county, license_type, full_day_rate, part_day_rate, effective_on, expires_on \
                     FROM illinois_rates WHERE id = ?",
                )
                .bind(id)
                .fetch_optional(self.db.pool())
                .await?;
                row.as_ref()
                    .map(|r| row_to_illinois_rate(r).map(Rate::Illinois))
                    .transpose()
            }
            RateRef::Nebraska(id) => {
                let row = sqlx::query(
                    "SELECT id, name, region, license_type, daily_rate, hourly_rate, accredited_rate, \
                     effective_on, expires_on FROM nebraska_rates WHERE id = ?",
                )
                .bind(id)
                .fetch_optional(self.db.pool())
                .await?;
                row.as_ref()
                    .map(|r| row_to_nebraska_rate(r).map(Rate::Nebraska))
                    .transpose()
            }
        }
    }
}

fn row_to_illinois_rate(row: &SqliteRow) -> Result<IllinoisRate> {
    let license_type: String = row.try_get("license_type")?;
    Ok(IllinoisRate {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        county: row.try_get("county")?,
        license_type: parse_enum("license_type", &license_type, LicenseType::parse)?,
        full_day_rate: row.try_get("full_day_rate")?,
        part_day_rate: row.try_get("part_day_rate")?,
        effective_on: row.try_get("effective_on")?,
        expires_on: row.try_get("expires_on")?,
    })
}

fn row_to_nebraska_rate(row: &SqliteRow) -> Result<NebraskaRate> {
    let license_type: String = row.try_get("license_type")?;
    Ok(NebraskaRate {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        region: row.try_get("region")?,
        license_type: parse_enum("license_type", &license_type, LicenseType::parse)?,
        daily_rate: row.try_get("daily_rate")?,
        hourly_rate: row.try_get("hourly_rate")?,
        accredited_rate: row.try_get("accredited_rate")?,
        effective_on: row.try_get("effective_on")?,
        expires_on: row.try_get("expires_on")?,
    })
}
