use std::str::FromStr;

use anyhow::{Context, anyhow};
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{FromRow, QueryBuilder, SqlitePool};

use crate::domain::device::models::device::{
    Device, DeviceBrand, DeviceFilters, DeviceId, DeviceName, DeviceState,
};
use crate::domain::device::ports::DeviceRepository;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

const SELECT_DEVICES: &str = "SELECT id, name, brand, state, creation_time FROM devices";

#[derive(Debug, Clone)]
pub struct Sqlite {
    pool: SqlitePool,
}

impl Sqlite {
    /// Opens the database at `path` and applies pending migrations.
    pub async fn new(path: &str) -> Result<Sqlite, anyhow::Error> {
        let options = SqliteConnectOptions::from_str(path)
            .with_context(|| format!("invalid database path {}", path))?
            .create_if_missing(true);

        // Every connection to an in-memory database sees its own empty database, so keep exactly
        // one connection alive for the lifetime of the pool.
        let in_memory = path.contains(":memory:") || path.contains("mode=memory");
        let max_connections = if in_memory {
            1
        } else {
            DEFAULT_MAX_CONNECTIONS
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .min_connections(if in_memory { 1 } else { 0 })
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .with_context(|| format!("failed to open database at {}", path))?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to run database migrations")?;

        tracing::debug!("opened database at {}", path);

        Ok(Sqlite { pool })
    }
}

#[derive(Debug, FromRow)]
struct DeviceRow {
    id: i64,
    name: String,
    brand: String,
    state: i64,
    creation_time: DateTime<Utc>,
}

impl TryFrom<DeviceRow> for Device {
    type Error = anyhow::Error;

    fn try_from(row: DeviceRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let invalid = |what: &str| format!("device {} has an invalid stored {}", id, what);

        Ok(Device::new(
            Some(DeviceId::new(row.id)),
            DeviceName::new(&row.name).with_context(|| invalid("name"))?,
            DeviceBrand::new(&row.brand).with_context(|| invalid("brand"))?,
            DeviceState::from_code(row.state).with_context(|| invalid("state"))?,
            row.creation_time,
        ))
    }
}

impl DeviceRepository for Sqlite {
    async fn create_device(&self, device: &Device) -> Result<Device, anyhow::Error> {
        let result = sqlx::query(
            "INSERT INTO devices (name, brand, brand_key, state, creation_time) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(device.name().to_string())
        .bind(device.brand().to_string())
        .bind(device.brand().key())
        .bind(device.state().code())
        .bind(*device.creation_time())
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to save device with name {:?}", device.name()))?;

        let id = DeviceId::new(result.last_insert_rowid());
        tracing::debug!("created device {}", id);

        Ok(device.clone().with_id(id))
    }

    async fn get_devices(&self, filters: &DeviceFilters) -> Result<Vec<Device>, anyhow::Error> {
        let mut query_builder = QueryBuilder::<sqlx::Sqlite>::new(SELECT_DEVICES);
        let mut separator = " WHERE ";

        if let Some(brand_key) = filters.brand_key() {
            query_builder
                .push(separator)
                .push("brand_key = ")
                .push_bind(brand_key.to_string());
            separator = " AND ";
        }

        if let Some(state) = filters.state() {
            query_builder
                .push(separator)
                .push("state = ")
                .push_bind(state.code());
        }

        query_builder.push(" ORDER BY id");

        let rows: Vec<DeviceRow> = query_builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .context("failed to fetch devices")?;

        rows.into_iter().map(Device::try_from).collect()
    }

    async fn get_device_by_id(&self, id: &DeviceId) -> Result<Option<Device>, anyhow::Error> {
        let row: Option<DeviceRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_DEVICES))
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("failed to fetch device {}", id))?;

        row.map(Device::try_from).transpose()
    }

    async fn update_device(&self, id: &DeviceId, device: &Device) -> Result<Device, anyhow::Error> {
        let result = sqlx::query(
            "UPDATE devices SET name = $1, brand = $2, brand_key = $3, state = $4, creation_time = $5 \
             WHERE id = $6",
        )
        .bind(device.name().to_string())
        .bind(device.brand().to_string())
        .bind(device.brand().key())
        .bind(device.state().code())
        .bind(*device.creation_time())
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to update device {}", id))?;

        if result.rows_affected() == 0 {
            return Err(anyhow!("device {} disappeared before it could be updated", id));
        }

        Ok(device.clone().with_id(*id))
    }

    async fn delete_device(&self, id: &DeviceId) -> Result<(), anyhow::Error> {
        sqlx::query("DELETE FROM devices WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to delete device {}", id))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 19, 22, 51, 41).unwrap()
    }

    async fn database() -> Sqlite {
        Sqlite::new("sqlite::memory:").await.unwrap()
    }

    fn device(name: &str, brand: &str, state: DeviceState) -> Device {
        Device::new(
            None,
            DeviceName::new(name).unwrap(),
            DeviceBrand::new(brand).unwrap(),
            state,
            created_at(),
        )
    }

    #[tokio::test]
    async fn test_create_assigns_increasing_ids() {
        let db = database().await;

        let first = db
            .create_device(&device("iPhone 14", "Apple", DeviceState::Available))
            .await
            .unwrap();
        let second = db
            .create_device(&device("Pixel 7", "Google", DeviceState::InUse))
            .await
            .unwrap();

        assert!(first.id().is_some());
        assert!(second.id() > first.id());
    }

    #[tokio::test]
    async fn test_get_device_by_id_round_trips_fields() {
        let db = database().await;
        let created = db
            .create_device(&device("Galaxy S21", "Samsung", DeviceState::Inactive))
            .await
            .unwrap();
        let id = created.id().unwrap();

        let found = db.get_device_by_id(&id).await.unwrap();

        assert_eq!(found, Some(created));
    }

    #[tokio::test]
    async fn test_get_device_by_id_missing() {
        let db = database().await;

        let found = db.get_device_by_id(&DeviceId::new(99)).await.unwrap();

        assert_eq!(found, None);
    }

    #[tokio::test]
    async fn test_get_devices_filters() {
        let db = database().await;
        for (name, brand, state) in [
            ("iPhone 14", "Apple", DeviceState::Available),
            ("iPhone 13", "Apple", DeviceState::InUse),
            ("Galaxy S21", "Samsung", DeviceState::Available),
            ("Pixel 5", "Google", DeviceState::Inactive),
        ] {
            db.create_device(&device(name, brand, state)).await.unwrap();
        }

        let all = db.get_devices(&DeviceFilters::default()).await.unwrap();
        assert_eq!(all.len(), 4);

        let apple = db
            .get_devices(&DeviceFilters::new(Some("aPPle"), None))
            .await
            .unwrap();
        let names: Vec<String> = apple.iter().map(|d| d.name().to_string()).collect();
        assert_eq!(names, vec!["iPhone 14", "iPhone 13"]);

        let available_apple = db
            .get_devices(&DeviceFilters::new(Some("apple"), Some("AVAILABLE")))
            .await
            .unwrap();
        assert_eq!(available_apple.len(), 1);
        assert_eq!(available_apple[0].name().to_string(), "iPhone 14");

        let unknown_state_ignored = db
            .get_devices(&DeviceFilters::new(None, Some("broken")))
            .await
            .unwrap();
        assert_eq!(unknown_state_ignored.len(), 4);
    }

    #[tokio::test]
    async fn test_get_devices_brand_filter_folds_non_ascii_case() {
        let db = database().await;
        db.create_device(&device("Octavia", "ŠKODA", DeviceState::Available))
            .await
            .unwrap();
        db.create_device(&device("Golf", "Volkswagen", DeviceState::Available))
            .await
            .unwrap();

        let found = db
            .get_devices(&DeviceFilters::new(Some("škoda"), None))
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].brand().to_string(), "ŠKODA");
    }

    #[tokio::test]
    async fn test_update_refreshes_brand_key() {
        let db = database().await;
        let created = db
            .create_device(&device("Octavia", "Skoda", DeviceState::Available))
            .await
            .unwrap();
        let id = created.id().unwrap();

        db.update_device(&id, &device("Octavia", "ŠKODA", DeviceState::Available))
            .await
            .unwrap();

        let old_brand = db
            .get_devices(&DeviceFilters::new(Some("skoda"), None))
            .await
            .unwrap();
        let new_brand = db
            .get_devices(&DeviceFilters::new(Some("Škoda"), None))
            .await
            .unwrap();
        assert!(old_brand.is_empty());
        assert_eq!(new_brand.len(), 1);
    }

    #[tokio::test]
    async fn test_update_overwrites_fields() {
        let db = database().await;
        let created_at = created_at();
        let created = db
            .create_device(&Device::new(
                None,
                DeviceName::new("iPhone").unwrap(),
                DeviceBrand::new("Apple").unwrap(),
                DeviceState::InUse,
                created_at,
            ))
            .await
            .unwrap();
        let id = created.id().unwrap();

        let changed = Device::new(
            Some(id),
            DeviceName::new("iPhone SE").unwrap(),
            DeviceBrand::new("Apple").unwrap(),
            DeviceState::Available,
            created_at,
        );
        let updated = db.update_device(&id, &changed).await.unwrap();

        assert_eq!(updated, changed);
        assert_eq!(db.get_device_by_id(&id).await.unwrap(), Some(changed));
    }

    #[tokio::test]
    async fn test_update_missing_device_fails() {
        let db = database().await;
        let id = DeviceId::new(5);

        let result = db
            .update_device(&id, &device("iPhone", "Apple", DeviceState::InUse))
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_delete_removes_device() {
        let db = database().await;
        let created = db
            .create_device(&device("Pixel 6", "Google", DeviceState::Inactive))
            .await
            .unwrap();
        let id = created.id().unwrap();

        db.delete_device(&id).await.unwrap();

        assert_eq!(db.get_device_by_id(&id).await.unwrap(), None);
    }
}
