//! Relational store contract for persisted XML documents.
//!
//! The engine itself (connection, session, driver) lives outside this crate;
//! callers construct one handle and inject it into each repository. Every
//! interaction is a blocking round trip with no retries, no pooling, and no
//! cancellation.

pub mod memory;

/// The closed set of tables this application writes to. SQL text is fixed per
/// variant; an arbitrary string is never accepted as a table name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentTable {
    Agents,
    PayableAccounts,
}

impl DocumentTable {
    pub const fn table_name(self) -> &'static str {
        match self {
            Self::Agents => "XML_AGENTES",
            Self::PayableAccounts => "XML_CONTAS_PAGAR",
        }
    }

    pub const fn sequence_name(self) -> &'static str {
        match self {
            Self::Agents => "SEQ_XML_AGENTES",
            Self::PayableAccounts => "SEQ_XML_CONTAS_PAGAR",
        }
    }

    /// Insert statement binding one XML payload; the id comes from the
    /// table's sequence and is returned to the caller.
    pub const fn insert_sql(self) -> &'static str {
        match self {
            Self::Agents => {
                "INSERT INTO XML_AGENTES (ID, XML_CONTEUDO) \
                 VALUES (SEQ_XML_AGENTES.NEXTVAL, XMLType(:xml)) \
                 RETURNING ID INTO :id"
            }
            Self::PayableAccounts => {
                "INSERT INTO XML_CONTAS_PAGAR (ID, XML_CONTEUDO) \
                 VALUES (SEQ_XML_CONTAS_PAGAR.NEXTVAL, XMLType(:xml)) \
                 RETURNING ID INTO :id"
            }
        }
    }

    /// Select returning every row newest-id-first, the XML column serialized
    /// to CLOB text.
    pub const fn select_sql(self) -> &'static str {
        match self {
            Self::Agents => {
                "SELECT ID, XMLSERIALIZE(CONTENT XML_CONTEUDO AS CLOB) \
                 FROM XML_AGENTES ORDER BY ID DESC"
            }
            Self::PayableAccounts => {
                "SELECT ID, XMLSERIALIZE(CONTENT XML_CONTEUDO AS CLOB) \
                 FROM XML_CONTAS_PAGAR ORDER BY ID DESC"
            }
        }
    }

    /// Single-row lookup by surrogate id.
    pub const fn select_by_id_sql(self) -> &'static str {
        match self {
            Self::Agents => {
                "SELECT ID, XMLSERIALIZE(CONTENT XML_CONTEUDO AS CLOB) \
                 FROM XML_AGENTES WHERE ID = :id"
            }
            Self::PayableAccounts => {
                "SELECT ID, XMLSERIALIZE(CONTENT XML_CONTEUDO AS CLOB) \
                 FROM XML_CONTAS_PAGAR WHERE ID = :id"
            }
        }
    }
}

/// Persistence-level view of one row: surrogate key plus the XML payload
/// fully materialized to text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    pub id: i64,
    pub xml: String,
}

impl StoredDocument {
    /// Display preview truncated at a character bound, with an ellipsis
    /// marker when anything was cut off.
    pub fn preview(&self, max_chars: usize) -> String {
        match self.xml.char_indices().nth(max_chars) {
            Some((cut, _)) => format!("{}...", &self.xml[..cut]),
            None => self.xml.clone(),
        }
    }
}

/// Engine-level failure surfaced unchanged to the caller.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("statement rejected: {0}")]
    Rejected(String),
    #[error("connection unavailable: {0}")]
    Connection(String),
}

/// Contract the relational engine must satisfy.
///
/// Writes are atomic insert-and-commit pairs: the repository issues the
/// insert, then [`Store::commit`], and nothing is considered persisted until
/// the commit returns. Implementations over a real engine run the literal
/// statements from [`DocumentTable`]; the in-memory double ignores them.
pub trait Store: Send + Sync {
    /// Inserts one XML payload and returns the sequence-assigned id.
    fn insert(&self, table: DocumentTable, xml: &str) -> Result<i64, StoreError>;

    /// Explicit commit; no autocommit is assumed.
    fn commit(&self) -> Result<(), StoreError>;

    /// All rows of a table, newest id first.
    fn select_all(&self, table: DocumentTable) -> Result<Vec<StoredDocument>, StoreError>;

    /// Single row by surrogate id, `None` when absent.
    fn select_by_id(&self, table: DocumentTable, id: i64)
        -> Result<Option<StoredDocument>, StoreError>;

    /// Connection liveness probe (`SELECT 1 FROM DUAL` on Oracle).
    fn ping(&self) -> Result<(), StoreError>;
}
