//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the runtime with mock implementations.

use crate::db::Database;
use crate::state_machine::SessionState;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Persistence failure
#[derive(Debug, Error)]
#[error("Store error: {0}")]
pub struct StoreError(pub String);

/// Durable per-user session storage
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the persisted state for a user, `None` for a first-time user
    async fn load(&self, user_id: &str) -> Result<Option<SessionState>, StoreError>;

    /// Replace the persisted state for a user
    async fn save(&self, user_id: &str, state: &SessionState) -> Result<(), StoreError>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    async fn load(&self, user_id: &str) -> Result<Option<SessionState>, StoreError> {
        (**self).load(user_id).await
    }

    async fn save(&self, user_id: &str, state: &SessionState) -> Result<(), StoreError> {
        (**self).save(user_id, state).await
    }
}

// ============================================================================
// Production Adapters
// ============================================================================

#[async_trait]
impl SessionStore for Database {
    async fn load(&self, user_id: &str) -> Result<Option<SessionState>, StoreError> {
        self.load_session(user_id)
            .map_err(|e| StoreError(e.to_string()))
    }

    async fn save(&self, user_id: &str, state: &SessionState) -> Result<(), StoreError> {
        self.save_session(user_id, state)
            .map_err(|e| StoreError(e.to_string()))
    }
}
