//! PostgreSQL Session Repository 実装
//!
//! `sessions` テーブル 1 つに最新の位置情報だけを保持します（履歴テーブルなし）。
//! 一意性は PRIMARY KEY / UNIQUE 制約で、位置情報の整合性は CHECK 制約で
//! DB 側が保証します。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::domain::{
    Coordinates, CreateOutcome, Location, PhoneNumber, RepositoryError, Session,
    SessionRepository, TrackingId,
};

/// Idempotent schema for the sessions table.
///
/// The CHECK constraint makes a half-written location unrepresentable.
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS sessions (
    phone_number TEXT PRIMARY KEY CHECK (phone_number ~ '^[0-9]{10}$'),
    tracking_id  TEXT NOT NULL UNIQUE,
    latitude     DOUBLE PRECISION,
    longitude    DOUBLE PRECISION,
    located_at   TIMESTAMPTZ,
    created_at   TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at   TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT location_complete CHECK (
        (latitude IS NULL AND longitude IS NULL AND located_at IS NULL)
        OR (latitude IS NOT NULL AND longitude IS NOT NULL AND located_at IS NOT NULL)
    )
)
"#;

const SESSION_COLUMNS: &str =
    "phone_number, tracking_id, latitude, longitude, located_at, created_at, updated_at";

/// DB の 1 行
#[derive(Debug, FromRow)]
struct SessionRow {
    phone_number: String,
    tracking_id: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    located_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SessionRow> for Session {
    type Error = RepositoryError;

    fn try_from(row: SessionRow) -> Result<Self, Self::Error> {
        let corrupt = |e: crate::domain::ValueObjectError| {
            RepositoryError::Query(format!("corrupt session row: {e}"))
        };

        let location = match (row.latitude, row.longitude, row.located_at) {
            (Some(lat), Some(lon), Some(at)) => {
                Some(Location::new(Coordinates::new(lat, lon).map_err(corrupt)?, at))
            }
            _ => None,
        };

        Ok(Session {
            phone_number: PhoneNumber::new(row.phone_number).map_err(corrupt)?,
            tracking_id: TrackingId::new(row.tracking_id).map_err(corrupt)?,
            location,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// PostgreSQL Session Repository 実装
#[derive(Clone)]
pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// テーブルが無ければ作成する
    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    async fn fetch_one_by(
        &self,
        column: &'static str,
        value: &str,
    ) -> Result<Option<Session>, RepositoryError> {
        let sql = format!("SELECT {SESSION_COLUMNS} FROM sessions WHERE {column} = $1");
        let row = sqlx::query_as::<_, SessionRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        row.map(Session::try_from).transpose()
    }
}

/// 通信系のエラーは ConnectionLost（再接続の契機）、プールの枯渇・クローズは
/// Unavailable（接続は健全なので再接続しない）、それ以外は Query に分類する
fn map_sqlx_error(err: sqlx::Error) -> RepositoryError {
    match &err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Protocol(_)
        | sqlx::Error::WorkerCrashed => RepositoryError::ConnectionLost(err.to_string()),
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            RepositoryError::Unavailable(err.to_string())
        }
        _ => RepositoryError::Query(err.to_string()),
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn find_by_phone(&self, phone: &PhoneNumber) -> Result<Option<Session>, RepositoryError> {
        self.fetch_one_by("phone_number", phone.as_str()).await
    }

    async fn find_by_tracking_id(
        &self,
        tracking_id: &TrackingId,
    ) -> Result<Option<Session>, RepositoryError> {
        self.fetch_one_by("tracking_id", tracking_id.as_str()).await
    }

    async fn create_session(
        &self,
        phone: &PhoneNumber,
        tracking_id: &TrackingId,
    ) -> Result<CreateOutcome, RepositoryError> {
        // ON CONFLICT DO NOTHING covers both the primary key and the tracking_id constraint
        let sql = format!(
            "INSERT INTO sessions (phone_number, tracking_id) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING RETURNING {SESSION_COLUMNS}"
        );
        let row = sqlx::query_as::<_, SessionRow>(&sql)
            .bind(phone.as_str())
            .bind(tracking_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        match row {
            Some(row) => Ok(CreateOutcome::Created(Session::try_from(row)?)),
            None => Ok(CreateOutcome::Conflict),
        }
    }

    async fn update_location(
        &self,
        tracking_id: &TrackingId,
        coordinates: Coordinates,
    ) -> Result<Session, RepositoryError> {
        // Single-row UPDATE: readers see either the old or the new location, never a mix
        let sql = format!(
            "UPDATE sessions \
             SET latitude = $2, longitude = $3, located_at = now(), updated_at = now() \
             WHERE tracking_id = $1 RETURNING {SESSION_COLUMNS}"
        );
        let row = sqlx::query_as::<_, SessionRow>(&sql)
            .bind(tracking_id.as_str())
            .bind(coordinates.latitude())
            .bind(coordinates.longitude())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.ok_or(RepositoryError::NotFound).and_then(Session::try_from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> SessionRow {
        let now = Utc::now();
        SessionRow {
            phone_number: "9876543210".to_string(),
            tracking_id: "a1b2c3d4".to_string(),
            latitude: None,
            longitude: None,
            located_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_row_without_location() {
        // テスト項目: 位置情報の列が NULL の行は location なしのセッションになる
        let session = Session::try_from(row()).unwrap();

        assert!(session.location.is_none());
        assert_eq!(session.tracking_id.as_str(), "a1b2c3d4");
    }

    #[test]
    fn test_row_with_location() {
        // テスト項目: 3 列そろっている行は location 付きのセッションになる
        let at = Utc::now();
        let row = SessionRow {
            latitude: Some(12.9),
            longitude: Some(77.6),
            located_at: Some(at),
            ..row()
        };

        let session = Session::try_from(row).unwrap();

        let location = session.location.unwrap();
        assert_eq!(location.coordinates, Coordinates::new(12.9, 77.6).unwrap());
        assert_eq!(location.timestamp, at);
    }

    #[test]
    fn test_row_with_invalid_phone_is_rejected() {
        // テスト項目: ドメインの制約を満たさない行は Query エラーになる
        let row = SessionRow {
            phone_number: "12345".to_string(),
            ..row()
        };

        assert!(matches!(
            Session::try_from(row),
            Err(RepositoryError::Query(_))
        ));
    }

    #[test]
    fn test_map_sqlx_error() {
        // テスト項目: 通信系エラーは ConnectionLost、プールの枯渇は Unavailable、それ以外は Query に分類される
        assert!(matches!(
            map_sqlx_error(sqlx::Error::Io(std::io::Error::from(
                std::io::ErrorKind::ConnectionReset
            ))),
            RepositoryError::ConnectionLost(_)
        ));
        assert!(matches!(
            map_sqlx_error(sqlx::Error::WorkerCrashed),
            RepositoryError::ConnectionLost(_)
        ));
        assert!(matches!(
            map_sqlx_error(sqlx::Error::PoolTimedOut),
            RepositoryError::Unavailable(_)
        ));
        assert!(matches!(
            map_sqlx_error(sqlx::Error::PoolClosed),
            RepositoryError::Unavailable(_)
        ));
        assert!(matches!(
            map_sqlx_error(sqlx::Error::RowNotFound),
            RepositoryError::Query(_)
        ));
    }
}
