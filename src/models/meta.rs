use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::db::{decode_err, is_unique_violation, now_rfc3339};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Country {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub code: String,
    pub states: Vec<State>,
}

/// Result of inserting a fixed reference list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedOutcome {
    pub inserted: usize,
    pub already_present: usize,
}

impl Category {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
        })
    }

    pub async fn list_active(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query("SELECT id, name, description FROM categories WHERE is_active = 1 ORDER BY name")
            .fetch_all(pool)
            .await?
            .iter()
            .map(Self::from_row)
            .collect()
    }

    /// Insert each `(name, description)`; names that already exist are
    /// counted, not treated as failures.
    pub async fn seed(pool: &SqlitePool, rows: &[(&str, &str)]) -> Result<SeedOutcome, sqlx::Error> {
        let mut outcome = SeedOutcome::default();
        for (name, description) in rows {
            let result = sqlx::query(
                "INSERT INTO categories (id, name, description, is_active, created_at) VALUES (?, ?, ?, 1, ?)",
            )
            .bind(uuid::Uuid::new_v4().to_string())
            .bind(name)
            .bind(description)
            .bind(now_rfc3339())
            .execute(pool)
            .await;
            match result {
                Ok(_) => outcome.inserted += 1,
                Err(err) if is_unique_violation(&err) => outcome.already_present += 1,
                Err(err) => return Err(err),
            }
        }
        Ok(outcome)
    }
}

impl Country {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        let states: String = row.try_get("states")?;
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            code: row.try_get("code")?,
            states: serde_json::from_str(&states).map_err(|e| decode_err("states", e))?,
        })
    }

    pub async fn list_active(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query("SELECT id, name, code, states FROM countries WHERE is_active = 1 ORDER BY name")
            .fetch_all(pool)
            .await?
            .iter()
            .map(Self::from_row)
            .collect()
    }

    pub async fn find_active_by_code(pool: &SqlitePool, code: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query(
            "SELECT id, name, code, states FROM countries WHERE code = ? AND is_active = 1 LIMIT 1",
        )
        .bind(code.trim().to_uppercase())
        .fetch_optional(pool)
        .await?
        .as_ref()
        .map(Self::from_row)
        .transpose()
    }

    pub async fn seed(
        pool: &SqlitePool,
        rows: &[(&str, &str, &[(&str, &str)])],
    ) -> Result<SeedOutcome, sqlx::Error> {
        let mut outcome = SeedOutcome::default();
        for (name, code, states) in rows {
            let states: Vec<State> = states
                .iter()
                .map(|(name, code)| State {
                    name: name.to_string(),
                    code: Some(code.to_string()),
                })
                .collect();
            let states = serde_json::to_string(&states).map_err(|e| decode_err("states", e))?;
            let result = sqlx::query(
                "INSERT INTO countries (id, name, code, states, is_active, created_at) VALUES (?, ?, ?, ?, 1, ?)",
            )
            .bind(uuid::Uuid::new_v4().to_string())
            .bind(name)
            .bind(code.to_uppercase())
            .bind(states)
            .bind(now_rfc3339())
            .execute(pool)
            .await;
            match result {
                Ok(_) => outcome.inserted += 1,
                Err(err) if is_unique_violation(&err) => outcome.already_present += 1,
                Err(err) => return Err(err),
            }
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn seeding_twice_counts_existing_rows() {
        let pool = crate::db::init_pool("sqlite::memory:", 1).await.unwrap();
        let rows = [("Retail", "Shops"), ("Healthcare", "Clinics")];

        let first = Category::seed(&pool, &rows).await.unwrap();
        assert_eq!(first, SeedOutcome { inserted: 2, already_present: 0 });

        let second = Category::seed(&pool, &[("Retail", "Shops"), ("Fitness", "Gyms")])
            .await
            .unwrap();
        assert_eq!(second, SeedOutcome { inserted: 1, already_present: 1 });

        let names: Vec<_> = Category::list_active(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, ["Fitness", "Healthcare", "Retail"]);
    }

    #[actix_web::test]
    async fn country_lookup_ignores_code_case() {
        let pool = crate::db::init_pool("sqlite::memory:", 1).await.unwrap();
        let states: &[(&str, &str)] = &[("England", "ENG"), ("Wales", "WLS")];
        Country::seed(&pool, &[("United Kingdom", "gb", states)]).await.unwrap();

        let uk = Country::find_active_by_code(&pool, "gb").await.unwrap().unwrap();
        assert_eq!(uk.code, "GB");
        assert_eq!(uk.states[1].name, "Wales");
        assert!(Country::find_active_by_code(&pool, "FR").await.unwrap().is_none());
    }
}
