//! Administrative settings store
//!
//! Holds the similarity thresholds and the other tunables administrators
//! change at runtime. `seed_defaults` is the startup routine: it creates
//! missing keys and fills empty values, and never overwrites a value an
//! administrator has set.

use anyhow::{Context, Result};
use deadpool_postgres::Pool;
use tokio_postgres::Row;
use uuid::Uuid;

use crate::models::{NewSystemSetting, SystemSetting};

fn setting_from_row(r: &Row) -> Result<SystemSetting> {
    let setting_type: String = r.get(4);
    Ok(SystemSetting {
        id: r.get(0),
        key: r.get(1),
        value: r.get(2),
        description: r.get(3),
        setting_type: setting_type.parse()?,
    })
}

/// Get a setting by key
pub async fn get_setting(pool: &Pool, key: &str) -> Result<Option<SystemSetting>> {
    let client = pool.get().await?;

    let row = client
        .query_opt(
            "SELECT id, key, value, description, type FROM system_settings WHERE key = $1",
            &[&key],
        )
        .await
        .with_context(|| format!("Failed to get setting {}", key))?;

    row.as_ref().map(setting_from_row).transpose()
}

/// Get all settings ordered by key
pub async fn get_all_settings(pool: &Pool) -> Result<Vec<SystemSetting>> {
    let client = pool.get().await?;

    let rows = client
        .query(
            "SELECT id, key, value, description, type FROM system_settings ORDER BY key",
            &[],
        )
        .await
        .context("Failed to get settings")?;

    rows.iter().map(setting_from_row).collect()
}

/// Update the value of an existing setting
///
/// Returns false when the key does not exist.
pub async fn update_setting(pool: &Pool, key: &str, value: &str) -> Result<bool> {
    let client = pool.get().await?;

    let updated = client
        .execute(
            "UPDATE system_settings SET value = $2 WHERE key = $1",
            &[&key, &value],
        )
        .await
        .with_context(|| format!("Failed to update setting {}", key))?;

    Ok(updated == 1)
}

/// Insert missing settings and fill empty values
///
/// Returns the number of rows inserted or patched.
pub async fn seed_defaults(pool: &Pool, defaults: &[NewSystemSetting]) -> Result<u64> {
    let client = pool.get().await?;
    let mut changed = 0;

    for setting in defaults {
        let inserted = client
            .execute(
                "INSERT INTO system_settings (id, key, value, description, type)
                 VALUES ($1, $2, $3, $4, $5)
                 ON CONFLICT (key) DO NOTHING",
                &[
                    &Uuid::new_v4(),
                    &setting.key,
                    &setting.value,
                    &setting.description,
                    &setting.setting_type.as_str(),
                ],
            )
            .await
            .with_context(|| format!("Failed to seed setting {}", setting.key))?;

        if inserted == 1 {
            log::info!("Seeded setting {} = {}", setting.key, setting.value);
            changed += 1;
            continue;
        }

        if setting.value.is_empty() {
            continue;
        }

        let patched = client
            .execute(
                "UPDATE system_settings SET value = $2 WHERE key = $1 AND value = ''",
                &[&setting.key, &setting.value],
            )
            .await
            .with_context(|| format!("Failed to patch setting {}", setting.key))?;

        if patched == 1 {
            log::info!("Filled empty setting {} = {}", setting.key, setting.value);
            changed += 1;
        }
    }

    Ok(changed)
}
