//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層から呼び出され、Domain 層を操作します。

pub mod create_or_get_link;
pub mod error;
pub mod get_location;
pub mod update_location;

pub use create_or_get_link::{CreateOrGetLinkUseCase, IssuedLink};
pub use error::{CreateLinkError, LocationError};
pub use get_location::GetLocationUseCase;
pub use update_location::UpdateLocationUseCase;
