//! Per-session assistant registry
//!
//! Each chat session gets its own [`BudgetAssistant`] so concurrent requests
//! never share mutable budget state. A request locks its session for the
//! whole pipeline pass; requests on distinct sessions proceed independently.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::assistant::BudgetAssistant;

pub type SharedAssistant = Arc<Mutex<BudgetAssistant>>;

#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, SharedAssistant>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a session id to its assistant, creating both when absent.
    ///
    /// `None` means the caller has no session yet; a fresh id is minted and
    /// returned so the caller can address the same session on later turns.
    pub async fn get_or_create(&self, session_id: Option<Uuid>) -> (Uuid, SharedAssistant) {
        let id = session_id.unwrap_or_else(Uuid::new_v4);

        {
            let sessions = self.sessions.read().await;
            if let Some(assistant) = sessions.get(&id) {
                return (id, Arc::clone(assistant));
            }
        }

        let mut sessions = self.sessions.write().await;
        let assistant = sessions
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(BudgetAssistant::new())))
            .clone();

        (id, assistant)
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
