//! SQLite-backed book catalog implementation.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, ToSql};

use super::{
    BookCatalog, BookFilter, CandidateQuery, CatalogEntry, CatalogError, CatalogField, DepthBias,
    EnergyBias, EnergyLevel, NewBook, ReadingDepth, ReadingPace,
};

const BOOK_COLUMNS: &str = "id, title, author, isbn, description, genre, published_year, \
     page_count, cover_image_url, google_books_id, open_library_id, average_rating, \
     rating_count, popularity_score, energy_level, reading_depth, reading_pace, theme_tags, \
     created_at, updated_at";

/// SQLite-backed book catalog.
pub struct SqliteCatalog {
    conn: Mutex<Connection>,
}

impl SqliteCatalog {
    /// Create a new SQLite catalog, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, CatalogError> {
        let conn = Connection::open(path).map_err(|e| CatalogError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite catalog (useful for testing).
    pub fn in_memory() -> Result<Self, CatalogError> {
        let conn =
            Connection::open_in_memory().map_err(|e| CatalogError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), CatalogError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS books (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                author TEXT NOT NULL,
                isbn TEXT UNIQUE,
                description TEXT NOT NULL DEFAULT '',
                genre TEXT NOT NULL,
                published_year INTEGER NOT NULL,
                page_count INTEGER,
                cover_image_url TEXT,
                google_books_id TEXT,
                open_library_id TEXT,
                average_rating REAL NOT NULL DEFAULT 0.0,
                rating_count INTEGER NOT NULL DEFAULT 0,
                popularity_score REAL NOT NULL DEFAULT 0.0,
                energy_level TEXT,
                reading_depth TEXT,
                reading_pace TEXT,
                theme_tags TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_books_title ON books(title);
            CREATE INDEX IF NOT EXISTS idx_books_author ON books(author);
            CREATE INDEX IF NOT EXISTS idx_books_genre ON books(genre);
            CREATE INDEX IF NOT EXISTS idx_books_google_books_id ON books(google_books_id);
            CREATE INDEX IF NOT EXISTS idx_books_energy_level ON books(energy_level);
            CREATE INDEX IF NOT EXISTS idx_books_reading_depth ON books(reading_depth);
            CREATE INDEX IF NOT EXISTS idx_books_reading_pace ON books(reading_pace);
            "#,
        )
        .map_err(|e| CatalogError::Database(e.to_string()))?;

        Ok(())
    }

    fn row_to_entry(row: &rusqlite::Row) -> rusqlite::Result<CatalogEntry> {
        let energy_level: Option<String> = row.get(14)?;
        let reading_depth: Option<String> = row.get(15)?;
        let reading_pace: Option<String> = row.get(16)?;
        let created_at_str: String = row.get(18)?;
        let updated_at_str: String = row.get(19)?;

        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());
        let updated_at = DateTime::parse_from_rfc3339(&updated_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(CatalogEntry {
            id: row.get(0)?,
            title: row.get(1)?,
            author: row.get(2)?,
            isbn: row.get(3)?,
            description: row.get(4)?,
            genre: row.get(5)?,
            published_year: row.get(6)?,
            page_count: row.get(7)?,
            cover_image_url: row.get(8)?,
            google_books_id: row.get(9)?,
            open_library_id: row.get(10)?,
            average_rating: row.get(11)?,
            rating_count: row.get(12)?,
            popularity_score: row.get(13)?,
            energy_level: energy_level.as_deref().and_then(EnergyLevel::parse),
            reading_depth: reading_depth.as_deref().and_then(ReadingDepth::parse),
            reading_pace: reading_pace.as_deref().and_then(ReadingPace::parse),
            theme_tags: row.get(17)?,
            created_at,
            updated_at,
        })
    }

    fn fetch_by_id(conn: &Connection, id: i64) -> Result<CatalogEntry, CatalogError> {
        conn.query_row(
            &format!("SELECT {} FROM books WHERE id = ?", BOOK_COLUMNS),
            params![id],
            Self::row_to_entry,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => CatalogError::NotFound(id.to_string()),
            _ => CatalogError::Database(e.to_string()),
        })
    }

    /// Append the filter's conditions to a WHERE clause under construction.
    fn push_filter_conditions(
        filter: &BookFilter,
        conditions: &mut Vec<String>,
        sql_params: &mut Vec<Box<dyn ToSql>>,
    ) {
        if !filter.genres.is_empty() {
            let clause = filter
                .genres
                .iter()
                .map(|_| "genre LIKE ?")
                .collect::<Vec<_>>()
                .join(" OR ");
            conditions.push(format!("({})", clause));
            for genre in &filter.genres {
                sql_params.push(Box::new(format!("%{}%", genre)));
            }
        }

        if !filter.moods.is_empty() {
            let clause = filter
                .moods
                .iter()
                .map(|_| "theme_tags LIKE ?")
                .collect::<Vec<_>>()
                .join(" OR ");
            conditions.push(format!("({})", clause));
            for mood in &filter.moods {
                sql_params.push(Box::new(format!("%{}%", mood)));
            }
        }

        if let Some(min_rating) = filter.min_rating {
            conditions.push("average_rating >= ?".to_string());
            sql_params.push(Box::new(min_rating));
        }

        if let Some(year_from) = filter.year_from {
            conditions.push("published_year >= ?".to_string());
            sql_params.push(Box::new(year_from));
        }

        if let Some(year_to) = filter.year_to {
            conditions.push("published_year <= ?".to_string());
            sql_params.push(Box::new(year_to));
        }
    }
}

impl BookCatalog for SqliteCatalog {
    fn insert(&self, book: &NewBook) -> Result<CatalogEntry, CatalogError> {
        let conn = self.conn.lock().unwrap();

        // Dedup on ingest: an existing row with the same ISBN or Google Books
        // id wins over creating a duplicate.
        if let Some(ref isbn) = book.isbn {
            if !isbn.is_empty() {
                let existing: Option<i64> = conn
                    .query_row("SELECT id FROM books WHERE isbn = ?", params![isbn], |row| {
                        row.get(0)
                    })
                    .map(Some)
                    .or_else(|e| match e {
                        rusqlite::Error::QueryReturnedNoRows => Ok(None),
                        _ => Err(CatalogError::Database(e.to_string())),
                    })?;
                if let Some(id) = existing {
                    return Self::fetch_by_id(&conn, id);
                }
            }
        }

        if let Some(ref google_id) = book.google_books_id {
            if !google_id.is_empty() {
                let existing: Option<i64> = conn
                    .query_row(
                        "SELECT id FROM books WHERE google_books_id = ?",
                        params![google_id],
                        |row| row.get(0),
                    )
                    .map(Some)
                    .or_else(|e| match e {
                        rusqlite::Error::QueryReturnedNoRows => Ok(None),
                        _ => Err(CatalogError::Database(e.to_string())),
                    })?;
                if let Some(id) = existing {
                    return Self::fetch_by_id(&conn, id);
                }
            }
        }

        let now_str = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO books (title, author, isbn, description, genre, published_year, \
             page_count, cover_image_url, google_books_id, open_library_id, average_rating, \
             rating_count, popularity_score, energy_level, reading_depth, reading_pace, \
             theme_tags, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                &book.title,
                &book.author,
                &book.isbn,
                &book.description,
                &book.genre,
                book.published_year,
                book.page_count,
                &book.cover_image_url,
                &book.google_books_id,
                &book.open_library_id,
                book.average_rating,
                book.rating_count,
                book.popularity_score,
                book.energy_level.map(|e| e.as_str()),
                book.reading_depth.map(|d| d.as_str()),
                book.reading_pace.map(|p| p.as_str()),
                &book.theme_tags,
                &now_str,
                &now_str,
            ],
        )
        .map_err(|e| CatalogError::Database(e.to_string()))?;

        let id = conn.last_insert_rowid();
        Self::fetch_by_id(&conn, id)
    }

    fn get(&self, id: i64) -> Result<CatalogEntry, CatalogError> {
        let conn = self.conn.lock().unwrap();
        Self::fetch_by_id(&conn, id)
    }

    fn search_text(
        &self,
        query: &str,
        filter: &BookFilter,
    ) -> Result<Vec<CatalogEntry>, CatalogError> {
        let conn = self.conn.lock().unwrap();
        let pattern = format!("%{}%", query);

        let mut conditions = vec![
            "(title LIKE ? OR author LIKE ? OR description LIKE ? OR genre LIKE ?)".to_string(),
        ];
        let mut sql_params: Vec<Box<dyn ToSql>> = (0..4)
            .map(|_| Box::new(pattern.clone()) as Box<dyn ToSql>)
            .collect();
        Self::push_filter_conditions(filter, &mut conditions, &mut sql_params);

        let sql = format!(
            "SELECT {} FROM books WHERE {} ORDER BY id",
            BOOK_COLUMNS,
            conditions.join(" AND ")
        );

        let param_refs: Vec<&dyn ToSql> = sql_params.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| CatalogError::Database(e.to_string()))?;
        let rows = stmt
            .query_map(param_refs.as_slice(), Self::row_to_entry)
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.map_err(|e| CatalogError::Database(e.to_string()))?);
        }
        Ok(results)
    }

    fn find_candidates(&self, query: &CandidateQuery) -> Result<Vec<CatalogEntry>, CatalogError> {
        let conn = self.conn.lock().unwrap();

        let mut conditions: Vec<String> = Vec::new();
        let mut sql_params: Vec<Box<dyn ToSql>> = Vec::new();

        if !query.genre_terms.is_empty() {
            let clause = query
                .genre_terms
                .iter()
                .map(|_| "genre LIKE ?")
                .collect::<Vec<_>>()
                .join(" OR ");
            conditions.push(format!("({})", clause));
            for term in &query.genre_terms {
                sql_params.push(Box::new(format!("%{}%", term)));
            }
        }

        match query.energy {
            Some(EnergyBias::High) => {
                conditions.push("(energy_level = 'high' OR reading_pace = 'fast')".to_string());
            }
            Some(EnergyBias::Low) => {
                conditions.push("(energy_level = 'low' OR reading_pace = 'slow')".to_string());
            }
            None => {}
        }

        match query.depth {
            Some(DepthBias::Light) => {
                conditions.push("(reading_depth = 'light' OR page_count < 300)".to_string());
            }
            Some(DepthBias::Deep) => {
                conditions.push("(reading_depth = 'deep' OR page_count > 400)".to_string());
            }
            None => {}
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let sql = format!(
            "SELECT {} FROM books {} ORDER BY average_rating DESC, rating_count DESC LIMIT ?",
            BOOK_COLUMNS, where_clause
        );
        sql_params.push(Box::new(query.limit));

        let param_refs: Vec<&dyn ToSql> = sql_params.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| CatalogError::Database(e.to_string()))?;
        let rows = stmt
            .query_map(param_refs.as_slice(), Self::row_to_entry)
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.map_err(|e| CatalogError::Database(e.to_string()))?);
        }
        Ok(results)
    }

    fn list_popular(&self, limit: u32) -> Result<Vec<CatalogEntry>, CatalogError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM books ORDER BY popularity_score DESC, average_rating DESC LIMIT ?",
                BOOK_COLUMNS
            ))
            .map_err(|e| CatalogError::Database(e.to_string()))?;
        let rows = stmt
            .query_map(params![limit], Self::row_to_entry)
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.map_err(|e| CatalogError::Database(e.to_string()))?);
        }
        Ok(results)
    }

    fn list_by_genre(&self, genre: &str, limit: u32) -> Result<Vec<CatalogEntry>, CatalogError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM books WHERE genre LIKE ? ORDER BY popularity_score DESC LIMIT ?",
                BOOK_COLUMNS
            ))
            .map_err(|e| CatalogError::Database(e.to_string()))?;
        let rows = stmt
            .query_map(params![format!("%{}%", genre), limit], Self::row_to_entry)
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.map_err(|e| CatalogError::Database(e.to_string()))?);
        }
        Ok(results)
    }

    fn distinct_values(
        &self,
        field: CatalogField,
        contains: Option<&str>,
        limit: u32,
    ) -> Result<Vec<String>, CatalogError> {
        let conn = self.conn.lock().unwrap();
        let column = match field {
            CatalogField::Title => "title",
            CatalogField::Author => "author",
            CatalogField::Genre => "genre",
        };

        let mut sql_params: Vec<Box<dyn ToSql>> = Vec::new();
        let where_clause = match contains {
            Some(substring) => {
                sql_params.push(Box::new(format!("%{}%", substring)));
                format!("WHERE {} LIKE ?", column)
            }
            None => String::new(),
        };
        sql_params.push(Box::new(limit));

        let sql = format!(
            "SELECT DISTINCT {} FROM books {} ORDER BY {} LIMIT ?",
            column, where_clause, column
        );

        let param_refs: Vec<&dyn ToSql> = sql_params.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| CatalogError::Database(e.to_string()))?;
        let rows = stmt
            .query_map(param_refs.as_slice(), |row| row.get::<_, String>(0))
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        let mut values = Vec::new();
        for row in rows {
            values.push(row.map_err(|e| CatalogError::Database(e.to_string()))?);
        }
        Ok(values)
    }

    fn count(&self) -> Result<u64, CatalogError> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM books", [], |row| row.get(0))
            .map_err(|e| CatalogError::Database(e.to_string()))
    }
}
