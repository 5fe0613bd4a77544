//! Agent records: counterparties (individuals or organizations) acting as
//! customers or suppliers.
//!
//! An [`AgentDraft`] carries the raw form strings; validation produces an
//! [`Agent`] whose tax id is held as [`TaxId`], so a serialized document
//! contains exactly one of `CPF`/`CNPJ` by construction. Persisted agents
//! are immutable: there is no update or delete.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::RepositoryError;
use crate::document::{DocumentBuilder, DocumentError, ParsedDocument};
use crate::store::{DocumentTable, Store, StoredDocument};
use crate::validate::{self, ValidationError};

/// Placeholder shown for a row whose payload fails to parse as XML.
pub const INVALID_XML_NAME: &str = "[Invalid XML]";
pub const INVALID_XML_PERSON_TYPE: &str = "Unknown";

/// Fallbacks for well-formed documents with blank fields.
const UNNAMED: &str = "[Unnamed]";
const NO_PERSON_TYPE: &str = "N/A";

/// Whether the counterparty is a natural person or a company. Selects which
/// tax-id field the document carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonType {
    Individual,
    Organization,
}

impl PersonType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Individual => "Pessoa Física",
            Self::Organization => "Pessoa Jurídica",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Pessoa Física" => Some(Self::Individual),
            "Pessoa Jurídica" => Some(Self::Organization),
            _ => None,
        }
    }
}

/// Commercial role of the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    Customer,
    Supplier,
}

impl AgentRole {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Customer => "Cliente",
            Self::Supplier => "Fornecedor",
        }
    }
}

/// Normalized tax id; the variant is fixed by the person type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaxId {
    /// 11-digit individual id.
    Cpf(String),
    /// 14-digit organization id.
    Cnpj(String),
}

impl TaxId {
    pub fn digits(&self) -> &str {
        match self {
            Self::Cpf(digits) | Self::Cnpj(digits) => digits,
        }
    }
}

/// Raw form input for one agent, prior to validation.
#[derive(Debug, Clone)]
pub struct AgentDraft {
    pub person_type: PersonType,
    pub role: AgentRole,
    pub name: String,
    pub tax_id: String,
    pub address: String,
    pub phone: String,
    pub email: String,
}

impl AgentDraft {
    /// Validates field by field, stopping at the first failure.
    pub fn validate(&self) -> Result<Agent, ValidationError> {
        let name = validate::required_text("name", &self.name)?;
        let tax_id = match self.person_type {
            PersonType::Individual => TaxId::Cpf(validate::individual_tax_id(&self.tax_id)?),
            PersonType::Organization => TaxId::Cnpj(validate::organization_tax_id(&self.tax_id)?),
        };
        let phone = validate::phone(&self.phone)?;
        let email = validate::email(&self.email)?;

        Ok(Agent {
            person_type: self.person_type,
            role: self.role,
            name,
            tax_id,
            address: self.address.trim().to_string(),
            phone,
            email,
        })
    }
}

/// A validated agent, ready to serialize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    pub person_type: PersonType,
    pub role: AgentRole,
    pub name: String,
    pub tax_id: TaxId,
    pub address: String,
    pub phone: String,
    pub email: String,
}

impl Agent {
    /// Canonical `<Agente>` document. The six base fields are always
    /// present (the address may be an empty element); exactly one of
    /// `CPF`/`CNPJ` follows them.
    pub fn to_xml(&self) -> Result<String, DocumentError> {
        let builder = DocumentBuilder::new("Agente")
            .field("Nome", &self.name)
            .field("TipoPessoa", self.person_type.label())
            .field("TipoAgente", self.role.label())
            .field("Endereco", &self.address)
            .field("Telefone", &self.phone)
            .field("Email", &self.email);
        let builder = match &self.tax_id {
            TaxId::Cpf(digits) => builder.field("CPF", digits.clone()),
            TaxId::Cnpj(digits) => builder.field("CNPJ", digits.clone()),
        };
        builder.build()
    }
}

/// Listing view built from stored documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentSummary {
    pub id: i64,
    pub name: String,
    pub person_type_label: String,
}

/// Snapshot of the link-relevant fields of one stored agent, copied into
/// referencing documents at generation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentLink {
    pub name: String,
    pub tax_id: String,
    pub email: String,
}

/// Persistence operations for agent documents, over an injected store
/// handle.
pub struct AgentRepository<S> {
    store: Arc<S>,
}

impl<S: Store> AgentRepository<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Serializes and persists one agent as an atomic insert-and-commit,
    /// returning the sequence-assigned id.
    pub fn save(&self, agent: &Agent) -> Result<i64, RepositoryError> {
        let xml = agent.to_xml()?;
        let id = self
            .store
            .insert(DocumentTable::Agents, &xml)
            .map_err(RepositoryError::persistence("agent insert"))?;
        self.store
            .commit()
            .map_err(RepositoryError::persistence("agent commit"))?;
        info!(id, name = %agent.name, "agent document persisted");
        Ok(id)
    }

    /// Every stored agent row, newest id first, payload materialized to
    /// text.
    pub fn list(&self) -> Result<Vec<StoredDocument>, RepositoryError> {
        let rows = self
            .store
            .select_all(DocumentTable::Agents)
            .map_err(RepositoryError::persistence("agent select"))?;
        debug!(rows = rows.len(), "listed agent documents");
        Ok(rows)
    }

    /// Listing summaries parsed from the stored documents. A corrupt row
    /// degrades to placeholder values; it never hides the rest of the
    /// listing.
    pub fn list_summaries(&self) -> Result<Vec<AgentSummary>, RepositoryError> {
        let rows = self.list()?;
        let summaries = rows
            .into_iter()
            .map(|row| match ParsedDocument::parse(&row.xml) {
                Ok(doc) => AgentSummary {
                    id: row.id,
                    name: non_blank(doc.text_of("Nome"), UNNAMED),
                    person_type_label: non_blank(doc.text_of("TipoPessoa"), NO_PERSON_TYPE),
                },
                Err(err) => {
                    warn!(id = row.id, %err, "stored agent row is not well-formed XML");
                    AgentSummary {
                        id: row.id,
                        name: INVALID_XML_NAME.to_string(),
                        person_type_label: INVALID_XML_PERSON_TYPE.to_string(),
                    }
                }
            })
            .collect();
        Ok(summaries)
    }

    /// Fetches one agent document and extracts the fields a referencing
    /// document snapshots: name, tax id (CNPJ first, then CPF), email.
    pub fn resolve_link_fields(&self, id: i64) -> Result<AgentLink, RepositoryError> {
        let row = self
            .store
            .select_by_id(DocumentTable::Agents, id)
            .map_err(RepositoryError::persistence("agent select"))?
            .ok_or(RepositoryError::NotFound { id })?;
        let doc = ParsedDocument::parse(&row.xml).map_err(|_| RepositoryError::Parse { id })?;
        Ok(AgentLink {
            name: doc.text_of("Nome").unwrap_or_default().to_string(),
            tax_id: doc
                .text_of("CNPJ")
                .or_else(|| doc.text_of("CPF"))
                .unwrap_or_default()
                .to_string(),
            email: doc.text_of("Email").unwrap_or_default().to_string(),
        })
    }
}

fn non_blank(value: Option<&str>, fallback: &str) -> String {
    match value {
        Some(text) if !text.trim().is_empty() => text.to_string(),
        _ => fallback.to_string(),
    }
}
