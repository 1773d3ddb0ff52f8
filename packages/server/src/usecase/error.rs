//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{RepositoryError, ValueObjectError};

/// 共有リンク発行のエラー
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CreateLinkError {
    /// 電話番号の形式が不正（ストアには一切アクセスしない）
    #[error("invalid phone number: {0}")]
    InvalidPhoneNumber(ValueObjectError),

    /// ストアに到達できない、またはストアが失敗した
    #[error("session store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<RepositoryError> for CreateLinkError {
    fn from(err: RepositoryError) -> Self {
        Self::StoreUnavailable(err.to_string())
    }
}

/// 位置情報の読み書きのエラー
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LocationError {
    /// 座標が不正（ストアには一切アクセスしない）
    #[error("invalid coordinates: {0}")]
    InvalidCoordinates(ValueObjectError),

    /// tracking ID に対応するセッションが存在しない
    #[error("unknown tracking ID")]
    NotFound,

    /// ストアに到達できない、またはストアが失敗した
    #[error("session store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<RepositoryError> for LocationError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound,
            other => Self::StoreUnavailable(other.to_string()),
        }
    }
}
