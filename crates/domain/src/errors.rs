use crate::task::TaskId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Task not found: {0}")]
    NotFound(TaskId),

    // 同一ミリ秒内で単調増加 ULID の乱数部が桁あふれした場合
    #[error("Task id space exhausted for the current millisecond")]
    IdExhausted,
}

pub type DomainResult<T> = Result<T, DomainError>;
