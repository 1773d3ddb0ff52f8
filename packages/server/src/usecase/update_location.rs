//! UseCase: 位置情報更新処理
//!
//! 更新は常に前回の位置情報を丸ごと置き換えます（last-write-wins、履歴なし）。
//! 重複・多少の順序入れ替わり・欠落した更新はいずれも許容されます。

use std::sync::Arc;

use crate::domain::{Coordinates, Location, SessionRepository, TrackingId};

use super::error::LocationError;

/// 位置情報更新のユースケース
pub struct UpdateLocationUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
}

impl UpdateLocationUseCase {
    /// 新しい UpdateLocationUseCase を作成
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// 位置情報更新を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Location)` - 保存された位置情報
    /// * `Err(LocationError)` - 座標が不正、tracking ID が不明、またはストア障害
    pub async fn execute(
        &self,
        tracking_id: String,
        latitude: f64,
        longitude: f64,
    ) -> Result<Location, LocationError> {
        // 1. 入力チェック（ストアアクセス前）
        let coordinates =
            Coordinates::new(latitude, longitude).map_err(LocationError::InvalidCoordinates)?;
        let tracking_id = TrackingId::new(tracking_id).map_err(|_| LocationError::NotFound)?;

        // 2. 単一レコードのアトミックな上書き
        let session = self
            .repository
            .update_location(&tracking_id, coordinates)
            .await?;

        session.location.ok_or_else(|| {
            LocationError::StoreUnavailable("store returned a session without location".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{PhoneNumber, ValueObjectError, repository::MockSessionRepository},
        infrastructure::repository::InMemorySessionRepository,
        usecase::GetLocationUseCase,
    };
    use locshare_shared::time::now_utc;

    async fn repository_with_session() -> (Arc<InMemorySessionRepository>, String) {
        let repository = Arc::new(InMemorySessionRepository::new());
        let tracking_id = TrackingId::new("t1".to_string()).unwrap();
        repository
            .create_session(&PhoneNumber::new("9876543210".to_string()).unwrap(), &tracking_id)
            .await
            .unwrap();
        (repository, tracking_id.into_string())
    }

    #[tokio::test]
    async fn test_update_then_read() {
        // テスト項目: 更新直後の取得で同じ座標と、呼び出し時刻以降のタイムスタンプが得られる
        // given (前提条件):
        let (repository, tracking_id) = repository_with_session().await;
        let update = UpdateLocationUseCase::new(repository.clone());
        let get = GetLocationUseCase::new(repository);
        let called_at = now_utc();

        // when (操作):
        update.execute(tracking_id.clone(), 12.9, 77.6).await.unwrap();
        let location = get.execute(tracking_id).await.unwrap().unwrap();

        // then (期待する結果):
        assert_eq!(location.coordinates.latitude(), 12.9);
        assert_eq!(location.coordinates.longitude(), 77.6);
        assert!(location.timestamp >= called_at);
    }

    #[tokio::test]
    async fn test_second_update_overwrites_first() {
        // テスト項目: 連続した 2 回の更新では 2 回目の値だけが見える
        // given (前提条件):
        let (repository, tracking_id) = repository_with_session().await;
        let update = UpdateLocationUseCase::new(repository.clone());
        let get = GetLocationUseCase::new(repository);

        // when (操作):
        update.execute(tracking_id.clone(), 12.9, 77.6).await.unwrap();
        update.execute(tracking_id.clone(), -33.8, 151.2).await.unwrap();

        // then (期待する結果):
        let location = get.execute(tracking_id).await.unwrap().unwrap();
        assert_eq!(location.coordinates, Coordinates::new(-33.8, 151.2).unwrap());
    }

    #[tokio::test]
    async fn test_unknown_tracking_id() {
        // テスト項目: 不明な tracking ID の更新は NotFound
        let (repository, _) = repository_with_session().await;
        let update = UpdateLocationUseCase::new(repository);

        let result = update.execute("unknown".to_string(), 1.0, 2.0).await;

        assert_eq!(result, Err(LocationError::NotFound));
    }

    #[tokio::test]
    async fn test_invalid_coordinates_never_touch_store() {
        // テスト項目: 範囲外・非有限の座標は InvalidCoordinates になり、ストアは呼ばれない
        // given (前提条件):
        let mut mock = MockSessionRepository::new();
        mock.expect_update_location().never();
        let update = UpdateLocationUseCase::new(Arc::new(mock));

        // when (操作):
        let out_of_range = update.execute("t1".to_string(), 91.0, 0.0).await;
        let not_finite = update.execute("t1".to_string(), 0.0, f64::NAN).await;

        // then (期待する結果):
        assert_eq!(
            out_of_range,
            Err(LocationError::InvalidCoordinates(
                ValueObjectError::LatitudeOutOfRange(91.0)
            ))
        );
        assert!(matches!(
            not_finite,
            Err(LocationError::InvalidCoordinates(
                ValueObjectError::LongitudeOutOfRange(_)
            ))
        ));
    }
}
