//! SQLite-backed recommendation store implementation.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, ToSql};

use super::store::RecommendationStore;
use super::types::{
    NewRecommendation, RecommendationError, RecommendationFilter, UserRecommendation,
};

/// SQLite-backed recommendation store.
pub struct SqliteRecommendationStore {
    conn: Mutex<Connection>,
}

impl SqliteRecommendationStore {
    /// Create a new SQLite store, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, RecommendationError> {
        let conn =
            Connection::open(path).map_err(|e| RecommendationError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite store (useful for testing).
    pub fn in_memory() -> Result<Self, RecommendationError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| RecommendationError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), RecommendationError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS recommendations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                book_id INTEGER NOT NULL,
                mood_energy TEXT NOT NULL,
                mood_genre TEXT NOT NULL,
                mood_depth TEXT NOT NULL,
                match_score INTEGER NOT NULL DEFAULT 0,
                match_percentage INTEGER NOT NULL DEFAULT 0,
                match_reasons TEXT NOT NULL DEFAULT '[]',
                dismissed INTEGER NOT NULL DEFAULT 0,
                saved INTEGER NOT NULL DEFAULT 0,
                viewed INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                UNIQUE(user_id, book_id, mood_energy, mood_genre, mood_depth)
            );

            CREATE INDEX IF NOT EXISTS idx_recommendations_user_mood
                ON recommendations(user_id, mood_energy, mood_genre, mood_depth);
            CREATE INDEX IF NOT EXISTS idx_recommendations_user_dismissed
                ON recommendations(user_id, dismissed);
            CREATE INDEX IF NOT EXISTS idx_recommendations_user_saved
                ON recommendations(user_id, saved);
            "#,
        )
        .map_err(|e| RecommendationError::Database(e.to_string()))?;

        Ok(())
    }

    fn row_to_recommendation(row: &rusqlite::Row) -> rusqlite::Result<UserRecommendation> {
        let reasons_json: String = row.get(8)?;
        let created_at_str: String = row.get(12)?;

        let match_reasons: Vec<String> = serde_json::from_str(&reasons_json).unwrap_or_default();
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(UserRecommendation {
            id: row.get(0)?,
            user_id: row.get(1)?,
            book_id: row.get(2)?,
            mood_energy: row.get(3)?,
            mood_genre: row.get(4)?,
            mood_depth: row.get(5)?,
            match_score: row.get(6)?,
            match_percentage: row.get(7)?,
            match_reasons,
            dismissed: row.get(9)?,
            saved: row.get(10)?,
            viewed: row.get(11)?,
            created_at,
        })
    }

    fn set_flag(
        &self,
        user_id: &str,
        id: i64,
        column: &str,
        value: bool,
    ) -> Result<(), RecommendationError> {
        let conn = self.conn.lock().unwrap();
        let sql = format!("UPDATE recommendations SET {} = ? WHERE id = ? AND user_id = ?", column);
        let rows_affected = conn
            .execute(&sql, params![value, id, user_id])
            .map_err(|e| RecommendationError::Database(e.to_string()))?;

        if rows_affected == 0 {
            return Err(RecommendationError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

impl RecommendationStore for SqliteRecommendationStore {
    fn upsert(&self, rec: &NewRecommendation) -> Result<UserRecommendation, RecommendationError> {
        let conn = self.conn.lock().unwrap();
        let now_str = Utc::now().to_rfc3339();
        let reasons_json = serde_json::to_string(&rec.match_reasons)
            .map_err(|e| RecommendationError::Database(e.to_string()))?;

        // The UNIQUE constraint makes this atomic: concurrent identical
        // quizzes converge to one row instead of racing an insert.
        conn.execute(
            "INSERT INTO recommendations (user_id, book_id, mood_energy, mood_genre, mood_depth, \
             match_score, match_percentage, match_reasons, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(user_id, book_id, mood_energy, mood_genre, mood_depth) DO UPDATE SET
                match_score = excluded.match_score,
                match_percentage = excluded.match_percentage,
                match_reasons = excluded.match_reasons",
            params![
                &rec.user_id,
                rec.book_id,
                rec.mood_energy.as_str(),
                &rec.mood_genre,
                rec.mood_depth.as_str(),
                rec.match_score,
                rec.match_percentage,
                &reasons_json,
                &now_str,
            ],
        )
        .map_err(|e| RecommendationError::Database(e.to_string()))?;

        conn.query_row(
            "SELECT id, user_id, book_id, mood_energy, mood_genre, mood_depth, match_score, \
             match_percentage, match_reasons, dismissed, saved, viewed, created_at
             FROM recommendations
             WHERE user_id = ? AND book_id = ? AND mood_energy = ? AND mood_genre = ? AND mood_depth = ?",
            params![
                &rec.user_id,
                rec.book_id,
                rec.mood_energy.as_str(),
                &rec.mood_genre,
                rec.mood_depth.as_str(),
            ],
            Self::row_to_recommendation,
        )
        .map_err(|e| RecommendationError::Database(e.to_string()))
    }

    fn get(&self, id: i64) -> Result<UserRecommendation, RecommendationError> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT id, user_id, book_id, mood_energy, mood_genre, mood_depth, match_score, \
             match_percentage, match_reasons, dismissed, saved, viewed, created_at
             FROM recommendations WHERE id = ?",
            params![id],
            Self::row_to_recommendation,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => RecommendationError::NotFound(id.to_string()),
            _ => RecommendationError::Database(e.to_string()),
        })
    }

    fn list(
        &self,
        user_id: &str,
        filter: &RecommendationFilter,
    ) -> Result<Vec<UserRecommendation>, RecommendationError> {
        let conn = self.conn.lock().unwrap();

        let mut conditions = vec!["user_id = ?".to_string()];
        let mut sql_params: Vec<Box<dyn ToSql>> = vec![Box::new(user_id.to_string())];

        if let Some(saved) = filter.saved {
            conditions.push("saved = ?".to_string());
            sql_params.push(Box::new(saved));
        }
        if let Some(dismissed) = filter.dismissed {
            conditions.push("dismissed = ?".to_string());
            sql_params.push(Box::new(dismissed));
        }
        sql_params.push(Box::new(filter.limit));

        let sql = format!(
            "SELECT id, user_id, book_id, mood_energy, mood_genre, mood_depth, match_score, \
             match_percentage, match_reasons, dismissed, saved, viewed, created_at
             FROM recommendations WHERE {}
             ORDER BY created_at DESC, match_score DESC LIMIT ?",
            conditions.join(" AND ")
        );

        let param_refs: Vec<&dyn ToSql> = sql_params.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| RecommendationError::Database(e.to_string()))?;
        let rows = stmt
            .query_map(param_refs.as_slice(), Self::row_to_recommendation)
            .map_err(|e| RecommendationError::Database(e.to_string()))?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.map_err(|e| RecommendationError::Database(e.to_string()))?);
        }
        Ok(results)
    }

    fn set_dismissed(
        &self,
        user_id: &str,
        id: i64,
        value: bool,
    ) -> Result<(), RecommendationError> {
        self.set_flag(user_id, id, "dismissed", value)
    }

    fn set_saved(&self, user_id: &str, id: i64, value: bool) -> Result<(), RecommendationError> {
        self.set_flag(user_id, id, "saved", value)
    }

    fn set_viewed(&self, user_id: &str, id: i64, value: bool) -> Result<(), RecommendationError> {
        self.set_flag(user_id, id, "viewed", value)
    }
}
