//! Validation, canonical XML generation, and Oracle-style persistence for
//! commercial agent and payable account records.
//!
//! Raw form strings flow through [`validate`] into typed drafts, get
//! serialized as ordered XML documents by [`document`], and are persisted
//! through the [`registry`] repositories against an injected [`store::Store`]
//! handle. Stored documents are immutable and are re-fetched and re-parsed
//! whenever fields are read back, including when a payable account snapshots
//! the agent it references.

pub mod config;
pub mod document;
pub mod registry;
pub mod store;
pub mod telemetry;
pub mod validate;

pub use registry::{
    Agent, AgentDraft, AgentLink, AgentRepository, AgentRole, AgentSummary, PayableAccount,
    PayableAccountRepository, PayableDraft, PersonType, RepositoryError, TaxId,
};
pub use store::{DocumentTable, Store, StoreError, StoredDocument};
pub use validate::ValidationError;
