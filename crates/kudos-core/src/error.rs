//! Error types for `kudos-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("user not found: {0}")]
  UserNotFound(Uuid),

  #[error("medal not found: {0}")]
  MedalNotFound(Uuid),

  #[error("email already registered: {0:?}")]
  EmailTaken(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
