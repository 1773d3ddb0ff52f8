//! UseCase: 共有リンク発行処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - CreateOrGetLinkUseCase::execute() メソッド
//! - 電話番号ごとのセッション作成（既存なら再利用）と共有リンクの組み立て
//!
//! ### なぜこのテストが必要か
//! - 同じ電話番号には常に同じ tracking ID を返す（冪等性）
//! - 不正な電話番号ではストアに一切アクセスしない
//! - 同時作成の競合（Conflict）を読み直しで吸収し、呼び出し元に漏らさない
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規作成、既存セッションの再利用
//! - 異常系：不正な電話番号、ストア障害
//! - エッジケース：同じ電話番号での同時リクエスト

use std::sync::Arc;

use crate::{
    domain::{CreateOutcome, PhoneNumber, Session, SessionRepository, TrackingIdFactory},
    infrastructure::link::ShareLinks,
};

use super::error::CreateLinkError;

/// 発行された共有リンク
#[derive(Debug, Clone, PartialEq)]
pub struct IssuedLink {
    pub session: Session,
    pub share_link: String,
    pub whatsapp_link: String,
}

/// 共有リンク発行のユースケース
pub struct CreateOrGetLinkUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
    links: ShareLinks,
}

impl CreateOrGetLinkUseCase {
    /// 新しい CreateOrGetLinkUseCase を作成
    pub fn new(repository: Arc<dyn SessionRepository>, links: ShareLinks) -> Self {
        Self { repository, links }
    }

    /// 共有リンク発行を実行
    ///
    /// # Arguments
    ///
    /// * `phone_number` - リクエストで受け取った電話番号（未検証）
    ///
    /// # Returns
    ///
    /// * `Ok(IssuedLink)` - 既存または新規セッションのリンク
    /// * `Err(CreateLinkError)` - 発行失敗
    pub async fn execute(&self, phone_number: Option<String>) -> Result<IssuedLink, CreateLinkError> {
        // 1. 形式チェック（ストアアクセス前）
        let phone = PhoneNumber::new(phone_number.unwrap_or_default())
            .map_err(CreateLinkError::InvalidPhoneNumber)?;

        // 2. 既存セッションがあれば再利用
        if let Some(session) = self.repository.find_by_phone(&phone).await? {
            tracing::debug!(phone = %phone, tracking_id = %session.tracking_id, "Existing session found");
            return Ok(self.issue(session));
        }

        // 3. 新規作成。競合した場合は他のリクエストが作成したものを読み直す
        let tracking_id = TrackingIdFactory::generate();
        let session = match self.repository.create_session(&phone, &tracking_id).await? {
            CreateOutcome::Created(session) => {
                tracing::info!(phone = %phone, tracking_id = %session.tracking_id, "Session created");
                session
            }
            CreateOutcome::Conflict => {
                tracing::debug!(phone = %phone, "Concurrent session creation, reading back");
                self.repository.find_by_phone(&phone).await?.ok_or_else(|| {
                    CreateLinkError::StoreUnavailable(
                        "session conflicted on insert but could not be read back".to_string(),
                    )
                })?
            }
        };

        Ok(self.issue(session))
    }

    fn issue(&self, session: Session) -> IssuedLink {
        let share_link = self.links.share_link(&session.tracking_id);
        let whatsapp_link = self.links.whatsapp_link(&session.phone_number, &share_link);
        IssuedLink {
            session,
            share_link,
            whatsapp_link,
        }
    }
}
