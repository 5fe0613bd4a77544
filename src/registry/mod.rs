//! Entity registries: validated domain records, their canonical documents,
//! and the repositories that persist them.

pub mod agent;
pub mod payable;

pub use agent::{
    Agent, AgentDraft, AgentLink, AgentRepository, AgentRole, AgentSummary, PersonType, TaxId,
};
pub use payable::{PayableAccount, PayableAccountRepository, PayableDraft};

use crate::document::DocumentError;
use crate::store::StoreError;

/// Failure raised by a repository operation after validation has passed.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The store rejected a statement or the connection dropped
    /// mid-operation. The in-memory record is untouched, so the caller can
    /// retry without re-entering data.
    #[error("store rejected {operation}: {source}")]
    Persistence {
        operation: &'static str,
        #[source]
        source: StoreError,
    },
    /// A stored payload was not well-formed XML when read back.
    #[error("stored document {id} is not well-formed XML")]
    Parse { id: i64 },
    /// A referenced surrogate id matches no stored row.
    #[error("no stored document with id {id}")]
    NotFound { id: i64 },
    /// The document could not be serialized before reaching the store.
    #[error(transparent)]
    Serialize(#[from] DocumentError),
}

impl RepositoryError {
    pub(crate) fn persistence(operation: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Persistence { operation, source }
    }
}
