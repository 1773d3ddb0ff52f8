//! InMemory Session Repository 実装
//!
//! ドメイン層が定義する SessionRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! 電話番号と tracking ID の両方のインデックスを 1 つの Mutex で保護するため、
//! 一意性チェックと挿入はアトミックに行われます。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use locshare_shared::time::now_utc;
use tokio::sync::Mutex;

use crate::domain::{
    Coordinates, CreateOutcome, PhoneNumber, RepositoryError, Session, SessionRepository,
    TrackingId,
};

/// セッションテーブル（主キー: 電話番号、ユニークインデックス: tracking ID）
#[derive(Default)]
struct SessionTable {
    by_phone: HashMap<PhoneNumber, Session>,
    phone_by_tracking_id: HashMap<TrackingId, PhoneNumber>,
}

/// インメモリ Session Repository 実装
///
/// Clone しても同じテーブルを共有します。
#[derive(Clone, Default)]
pub struct InMemorySessionRepository {
    table: Arc<Mutex<SessionTable>>,
}

impl InMemorySessionRepository {
    /// 新しい空の InMemorySessionRepository を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 保存されているセッション数
    pub async fn count(&self) -> usize {
        self.table.lock().await.by_phone.len()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn find_by_phone(&self, phone: &PhoneNumber) -> Result<Option<Session>, RepositoryError> {
        let table = self.table.lock().await;
        Ok(table.by_phone.get(phone).cloned())
    }

    async fn find_by_tracking_id(
        &self,
        tracking_id: &TrackingId,
    ) -> Result<Option<Session>, RepositoryError> {
        let table = self.table.lock().await;
        Ok(table
            .phone_by_tracking_id
            .get(tracking_id)
            .and_then(|phone| table.by_phone.get(phone))
            .cloned())
    }

    async fn create_session(
        &self,
        phone: &PhoneNumber,
        tracking_id: &TrackingId,
    ) -> Result<CreateOutcome, RepositoryError> {
        let mut table = self.table.lock().await;
        if table.by_phone.contains_key(phone)
            || table.phone_by_tracking_id.contains_key(tracking_id)
        {
            return Ok(CreateOutcome::Conflict);
        }

        let session = Session::new(phone.clone(), tracking_id.clone(), now_utc());
        table
            .phone_by_tracking_id
            .insert(tracking_id.clone(), phone.clone());
        table.by_phone.insert(phone.clone(), session.clone());
        Ok(CreateOutcome::Created(session))
    }

    async fn update_location(
        &self,
        tracking_id: &TrackingId,
        coordinates: Coordinates,
    ) -> Result<Session, RepositoryError> {
        let mut table = self.table.lock().await;
        let phone = table
            .phone_by_tracking_id
            .get(tracking_id)
            .cloned()
            .ok_or(RepositoryError::NotFound)?;
        let session = table
            .by_phone
            .get_mut(&phone)
            .ok_or(RepositoryError::NotFound)?;

        session.update_location(coordinates, now_utc());
        Ok(session.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - InMemorySessionRepository の基本操作
    // - 電話番号・tracking ID の一意性制約
    // - 位置情報の上書き（履歴なし）
    //
    // 【なぜこのテストが必要か】
    // - Repository は UseCase から呼ばれるデータアクセス層の中核
    // - 一意性制約が create-or-get フローの競合解決の前提になる
    // ========================================

    fn phone(value: &str) -> PhoneNumber {
        PhoneNumber::new(value.to_string()).unwrap()
    }

    fn tracking_id(value: &str) -> TrackingId {
        TrackingId::new(value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_create_session_success() {
        // テスト項目: セッションを作成すると両方のキーで検索できる
        // given (前提条件):
        let repo = InMemorySessionRepository::new();

        // when (操作):
        let outcome = repo
            .create_session(&phone("9876543210"), &tracking_id("t1"))
            .await
            .unwrap();

        // then (期待する結果):
        let CreateOutcome::Created(session) = outcome else {
            panic!("expected Created, got {outcome:?}");
        };
        assert!(session.location.is_none());
        assert_eq!(repo.count().await, 1);
        assert_eq!(
            repo.find_by_phone(&phone("9876543210")).await.unwrap(),
            Some(session.clone())
        );
        assert_eq!(
            repo.find_by_tracking_id(&tracking_id("t1")).await.unwrap(),
            Some(session)
        );
    }

    #[tokio::test]
    async fn test_create_session_duplicate_phone_conflicts() {
        // テスト項目: 同じ電話番号での作成は Conflict になり、既存データは上書きされない
        // given (前提条件):
        let repo = InMemorySessionRepository::new();
        repo.create_session(&phone("9876543210"), &tracking_id("t1"))
            .await
            .unwrap();

        // when (操作):
        let outcome = repo
            .create_session(&phone("9876543210"), &tracking_id("t2"))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(outcome, CreateOutcome::Conflict);
        let stored = repo.find_by_phone(&phone("9876543210")).await.unwrap();
        assert_eq!(stored.unwrap().tracking_id, tracking_id("t1"));
        assert!(
            repo.find_by_tracking_id(&tracking_id("t2"))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_create_session_duplicate_tracking_id_conflicts() {
        // テスト項目: 同じ tracking ID を別の電話番号に割り当てることはできない
        // given (前提条件):
        let repo = InMemorySessionRepository::new();
        repo.create_session(&phone("9876543210"), &tracking_id("t1"))
            .await
            .unwrap();

        // when (操作):
        let outcome = repo
            .create_session(&phone("1234567890"), &tracking_id("t1"))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(outcome, CreateOutcome::Conflict);
        assert_eq!(repo.count().await, 1);
    }

    #[tokio::test]
    async fn test_update_location_overwrites() {
        // テスト項目: 位置情報の更新は最後の書き込みだけが残る
        // given (前提条件):
        let repo = InMemorySessionRepository::new();
        repo.create_session(&phone("9876543210"), &tracking_id("t1"))
            .await
            .unwrap();
        repo.update_location(&tracking_id("t1"), Coordinates::new(12.9, 77.6).unwrap())
            .await
            .unwrap();

        // when (操作):
        let updated = repo
            .update_location(&tracking_id("t1"), Coordinates::new(13.1, 77.5).unwrap())
            .await
            .unwrap();

        // then (期待する結果):
        let location = updated.location.unwrap();
        assert_eq!(location.coordinates, Coordinates::new(13.1, 77.5).unwrap());
        assert_eq!(updated.updated_at, location.timestamp);

        let stored = repo
            .find_by_tracking_id(&tracking_id("t1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored, updated);
    }

    #[tokio::test]
    async fn test_update_location_unknown_tracking_id() {
        // テスト項目: 存在しない tracking ID の更新は NotFound
        // given (前提条件):
        let repo = InMemorySessionRepository::new();

        // when (操作):
        let result = repo
            .update_location(&tracking_id("missing"), Coordinates::new(0.0, 0.0).unwrap())
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(RepositoryError::NotFound));
        assert_eq!(repo.count().await, 0);
    }

    #[tokio::test]
    async fn test_clones_share_table() {
        // テスト項目: Clone したリポジトリは同じテーブルを参照する
        let repo = InMemorySessionRepository::new();
        let clone = repo.clone();

        clone
            .create_session(&phone("9876543210"), &tracking_id("t1"))
            .await
            .unwrap();

        assert_eq!(repo.count().await, 1);
    }
}
