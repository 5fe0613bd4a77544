//! End-to-end scenario: persist an agent, snapshot it into a payable
//! account, persist the payable, and read both back through stored XML.

mod common {
    use std::sync::Arc;

    use cadastro_xml::store::memory::MemoryStore;
    use cadastro_xml::{
        AgentDraft, AgentRepository, AgentRole, PayableAccountRepository, PayableDraft,
        PersonType,
    };

    pub(super) struct Registries {
        pub(super) agents: AgentRepository<MemoryStore>,
        pub(super) payables: PayableAccountRepository<MemoryStore>,
        pub(super) store: Arc<MemoryStore>,
    }

    pub(super) fn registries() -> Registries {
        let store = Arc::new(MemoryStore::new());
        Registries {
            agents: AgentRepository::new(store.clone()),
            payables: PayableAccountRepository::new(store.clone()),
            store,
        }
    }

    pub(super) fn acme_draft() -> AgentDraft {
        AgentDraft {
            person_type: PersonType::Organization,
            role: AgentRole::Supplier,
            name: "Acme Ltd".to_string(),
            tax_id: "12345678000199".to_string(),
            address: "Rua X, 10".to_string(),
            phone: "11987654321".to_string(),
            email: "a@acme.com".to_string(),
        }
    }

    pub(super) fn invoice_draft(
        agent_id: i64,
        agent: cadastro_xml::AgentLink,
    ) -> PayableDraft {
        PayableDraft {
            agent_id,
            agent,
            description: "Invoice 42".to_string(),
            amount: "1500,50".to_string(),
            issue_date: "01/03/2024".to_string(),
            due_date: "31/03/2024".to_string(),
        }
    }
}

mod workflow {
    use super::common::*;
    use cadastro_xml::document::ParsedDocument;

    #[test]
    fn payable_snapshots_the_referenced_agent() {
        let registries = registries();
        let agent_id = registries
            .agents
            .save(&acme_draft().validate().expect("valid agent"))
            .expect("agent saves");
        assert_eq!(agent_id, 1);

        let link = registries
            .agents
            .resolve_link_fields(agent_id)
            .expect("resolves link fields");
        let payable = invoice_draft(agent_id, link)
            .validate()
            .expect("valid payable");
        let payable_id = registries.payables.save(&payable).expect("payable saves");
        assert_eq!(payable_id, 1);

        let rows = registries.payables.list().expect("lists");
        assert_eq!(rows.len(), 1);
        let doc = ParsedDocument::parse(&rows[0].xml).expect("stored payable parses");
        assert_eq!(doc.root(), "ContaPagar");
        assert_eq!(doc.text_of("AgenteID"), Some("1"));
        assert_eq!(doc.text_of("AgenteNome"), Some("Acme Ltd"));
        assert_eq!(doc.text_of("CNPJ_CPF"), Some("12345678000199"));
        assert_eq!(doc.text_of("EmailAgente"), Some("a@acme.com"));
        assert_eq!(doc.text_of("Descricao"), Some("Invoice 42"));
        assert_eq!(doc.text_of("Valor"), Some("1500.50"));
        assert_eq!(doc.text_of("DataEmissao"), Some("01/03/2024"));
        assert_eq!(doc.text_of("DataVencimento"), Some("31/03/2024"));
    }

    #[test]
    fn listing_previews_include_the_description() {
        let registries = registries();
        let agent_id = registries
            .agents
            .save(&acme_draft().validate().expect("valid agent"))
            .expect("agent saves");
        let link = registries
            .agents
            .resolve_link_fields(agent_id)
            .expect("resolves");
        registries
            .payables
            .save(&invoice_draft(agent_id, link).validate().expect("valid"))
            .expect("payable saves");

        let rows = registries.payables.list().expect("lists");
        assert_eq!(rows.len(), 1);
        let preview = rows[0].preview(300);
        assert!(preview.contains("Invoice 42"));
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn store_failure_keeps_the_validated_payable_retryable() {
        let registries = registries();
        let agent_id = registries
            .agents
            .save(&acme_draft().validate().expect("valid agent"))
            .expect("agent saves");
        let link = registries
            .agents
            .resolve_link_fields(agent_id)
            .expect("resolves");
        let payable = invoice_draft(agent_id, link).validate().expect("valid");

        registries.store.set_offline(true);
        assert!(registries.payables.save(&payable).is_err());

        registries.store.set_offline(false);
        assert_eq!(registries.payables.save(&payable).expect("retries"), 1);
    }
}
