//! UseCase: 位置情報取得処理
//!
//! 「存在しないセッション」（NotFound）と「位置情報がまだ無いセッション」
//! （Ok(None)）を呼び出し元が区別できるように返します。

use std::sync::Arc;

use crate::domain::{Location, SessionRepository, TrackingId};

use super::error::LocationError;

/// 位置情報取得のユースケース
pub struct GetLocationUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
}

impl GetLocationUseCase {
    /// 新しい GetLocationUseCase を作成
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// 位置情報取得を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Location))` - 最新の位置情報
    /// * `Ok(None)` - セッションは存在するが位置情報がまだ無い
    /// * `Err(LocationError::NotFound)` - tracking ID が不明
    pub async fn execute(&self, tracking_id: String) -> Result<Option<Location>, LocationError> {
        // 形式として成り立たない ID は、存在しない ID と同じ扱い
        let tracking_id = TrackingId::new(tracking_id).map_err(|_| LocationError::NotFound)?;

        let session = self
            .repository
            .find_by_tracking_id(&tracking_id)
            .await?
            .ok_or(LocationError::NotFound)?;

        Ok(session.location)
    }
}
