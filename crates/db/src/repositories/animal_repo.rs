//! Repository for the `animals` table.

use openpaws_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::animal::{Animal, CreateAnimal};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, animal_type, age, gender, temperament, health_notes, backstory, \
     ideal_home, images, keywords, features, colors, distinctive_features, breed, coat, \
     physical_characteristics, health_indicators, generated_profile, created_at, updated_at";

/// Provides create/read operations for animal records plus profile regeneration.
pub struct AnimalRepo;

impl AnimalRepo {
    /// Insert a new record, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateAnimal) -> Result<Animal, sqlx::Error> {
        let s = &input.submission;
        let query = format!(
            "INSERT INTO animals (
                name, animal_type, age, gender, temperament, health_notes, backstory,
                ideal_home, images, keywords, features, colors, distinctive_features, breed,
                coat, physical_characteristics, health_indicators, generated_profile
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Animal>(&query)
            .bind(&s.name)
            .bind(&s.animal_type)
            .bind(&s.age)
            .bind(&s.gender)
            .bind(&s.temperament)
            .bind(&s.health_notes)
            .bind(&s.backstory)
            .bind(&s.ideal_home)
            .bind(&input.images)
            .bind(&s.keywords)
            .bind(&s.features)
            .bind(&s.colors)
            .bind(&s.distinctive_features)
            .bind(&s.breed)
            .bind(s.coat.as_ref().map(Json))
            .bind(s.physical_characteristics.as_ref().map(Json))
            .bind(s.health_indicators.as_ref().map(Json))
            .bind(&input.generated_profile)
            .fetch_one(pool)
            .await
    }

    /// Find a record by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Animal>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM animals WHERE id = $1");
        sqlx::query_as::<_, Animal>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List records newest first.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Animal>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM animals
             ORDER BY created_at DESC, id DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Animal>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Total number of records.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM animals")
            .fetch_one(pool)
            .await
    }

    /// Replace the generated profile text.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_generated_profile(
        pool: &PgPool,
        id: DbId,
        generated_profile: &str,
    ) -> Result<Option<Animal>, sqlx::Error> {
        let query = format!(
            "UPDATE animals SET generated_profile = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Animal>(&query)
            .bind(id)
            .bind(generated_profile)
            .fetch_optional(pool)
            .await
    }
}
