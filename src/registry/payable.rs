//! Payable accounts: money obligations referencing one stored agent.
//!
//! A payable document embeds a snapshot, not a foreign key: the agent's
//! name, tax id, and email are resolved once when the draft is assembled
//! and copied verbatim into the document next to the numeric `AgenteID`.
//! The copy never changes afterwards, so a payable reads back
//! self-describing without a join.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info};

use super::agent::AgentLink;
use super::RepositoryError;
use crate::document::{DocumentBuilder, DocumentError};
use crate::store::{DocumentTable, Store, StoredDocument};
use crate::validate::{self, ValidationError};

const DATE_FORMAT: &str = "%d/%m/%Y";

/// Raw form input for one payable account. The agent fields come from
/// [`AgentRepository::resolve_link_fields`] at selection time.
///
/// [`AgentRepository::resolve_link_fields`]: super::agent::AgentRepository::resolve_link_fields
#[derive(Debug, Clone)]
pub struct PayableDraft {
    pub agent_id: i64,
    pub agent: AgentLink,
    pub description: String,
    pub amount: String,
    pub issue_date: String,
    pub due_date: String,
}

impl PayableDraft {
    /// Validates field by field, stopping at the first failure.
    pub fn validate(&self) -> Result<PayableAccount, ValidationError> {
        if self.agent_id <= 0 {
            return Err(ValidationError::new(
                "agent",
                "select an agent before continuing",
            ));
        }
        let description = validate::required_text("description", &self.description)?;
        let amount = validate::amount(&self.amount)?;
        let issue_date = validate::date("issue date", &self.issue_date)?;
        let due_date = validate::date("due date", &self.due_date)?;

        Ok(PayableAccount {
            agent_id: self.agent_id,
            agent: self.agent.clone(),
            description,
            amount,
            issue_date,
            due_date,
        })
    }
}

/// A validated payable account with its denormalized agent snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayableAccount {
    pub agent_id: i64,
    pub agent: AgentLink,
    pub description: String,
    pub amount: Decimal,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
}

impl PayableAccount {
    /// Canonical `<ContaPagar>` document. `Valor` uses `.` as the decimal
    /// separator; dates render as `dd/mm/yyyy`.
    pub fn to_xml(&self) -> Result<String, DocumentError> {
        DocumentBuilder::new("ContaPagar")
            .field("AgenteID", self.agent_id.to_string())
            .field("AgenteNome", &self.agent.name)
            .field("CNPJ_CPF", &self.agent.tax_id)
            .field("EmailAgente", &self.agent.email)
            .field("Descricao", &self.description)
            .field("Valor", self.amount.to_string())
            .field("DataEmissao", self.issue_date.format(DATE_FORMAT).to_string())
            .field("DataVencimento", self.due_date.format(DATE_FORMAT).to_string())
            .build()
    }
}

/// Persistence operations for payable account documents.
pub struct PayableAccountRepository<S> {
    store: Arc<S>,
}

impl<S: Store> PayableAccountRepository<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Serializes and persists one payable as an atomic insert-and-commit,
    /// returning the sequence-assigned id.
    pub fn save(&self, payable: &PayableAccount) -> Result<i64, RepositoryError> {
        let xml = payable.to_xml()?;
        let id = self
            .store
            .insert(DocumentTable::PayableAccounts, &xml)
            .map_err(RepositoryError::persistence("payable insert"))?;
        self.store
            .commit()
            .map_err(RepositoryError::persistence("payable commit"))?;
        info!(id, agent_id = payable.agent_id, "payable document persisted");
        Ok(id)
    }

    /// Every stored payable row, newest id first.
    pub fn list(&self) -> Result<Vec<StoredDocument>, RepositoryError> {
        let rows = self
            .store
            .select_all(DocumentTable::PayableAccounts)
            .map_err(RepositoryError::persistence("payable select"))?;
        debug!(rows = rows.len(), "listed payable documents");
        Ok(rows)
    }
}
