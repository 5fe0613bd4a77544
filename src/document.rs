//! Canonical XML document construction and re-parsing.
//!
//! Every persisted record is one flat XML document: a root element whose
//! children carry text only. [`DocumentBuilder`] emits that shape with a
//! stable, caller-chosen field order and two-space indentation;
//! [`ParsedDocument`] reads it back so the repositories can extract fields
//! from stored rows. Building then parsing returns the identical field set.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

/// Failure while emitting or re-reading a document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("failed to write xml: {0}")]
    Write(String),
    #[error("xml output is not valid utf-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
    #[error("malformed xml: {0}")]
    Malformed(String),
    #[error("document has no root element")]
    MissingRoot,
}

/// Ordered builder for one entity document.
///
/// Children are emitted in exactly the order the fields were added; consumers
/// rely on that human-scannable order, not on any schema order. Text is
/// entity-escaped on write, so values containing `<` or `&` survive the
/// round trip.
#[derive(Debug)]
pub struct DocumentBuilder {
    root: &'static str,
    fields: Vec<(&'static str, String)>,
}

impl DocumentBuilder {
    pub fn new(root: &'static str) -> Self {
        Self {
            root,
            fields: Vec::new(),
        }
    }

    /// Adds a field that is always emitted, as a self-closing element when
    /// the value is empty.
    pub fn field(mut self, tag: &'static str, value: impl Into<String>) -> Self {
        self.fields.push((tag, value.into()));
        self
    }

    /// Adds a field that is omitted entirely when the value is empty, so an
    /// absent optional parses back as absent rather than as empty text.
    pub fn optional_field(self, tag: &'static str, value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().is_empty() {
            return self;
        }
        self.field(tag, value)
    }

    /// Serializes to pretty-printed UTF-8 XML with two-space indentation.
    pub fn build(self) -> Result<String, DocumentError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
            .map_err(write_error)?;
        writer
            .write_event(Event::Start(BytesStart::new(self.root)))
            .map_err(write_error)?;
        for (tag, value) in &self.fields {
            if value.is_empty() {
                writer
                    .write_event(Event::Empty(BytesStart::new(*tag)))
                    .map_err(write_error)?;
            } else {
                writer
                    .write_event(Event::Start(BytesStart::new(*tag)))
                    .map_err(write_error)?;
                writer
                    .write_event(Event::Text(BytesText::new(value)))
                    .map_err(write_error)?;
                writer
                    .write_event(Event::End(BytesEnd::new(*tag)))
                    .map_err(write_error)?;
            }
        }
        writer
            .write_event(Event::End(BytesEnd::new(self.root)))
            .map_err(write_error)?;
        let mut bytes = writer.into_inner();
        bytes.push(b'\n');
        Ok(String::from_utf8(bytes)?)
    }
}

fn write_error(err: impl std::fmt::Display) -> DocumentError {
    DocumentError::Write(err.to_string())
}

/// A stored document read back into root tag plus ordered `(tag, text)`
/// children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument {
    root: String,
    fields: Vec<(String, String)>,
}

impl ParsedDocument {
    /// Parses a flat entity document. Fails on anything that is not
    /// well-formed XML, including truncated input and mismatched tags.
    pub fn parse(xml: &str) -> Result<Self, DocumentError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut root: Option<String> = None;
        let mut fields: Vec<(String, String)> = Vec::new();
        let mut current: Option<(String, String)> = None;
        let mut depth = 0usize;

        loop {
            let event = reader
                .read_event()
                .map_err(|err| DocumentError::Malformed(err.to_string()))?;
            match event {
                Event::Start(start) => {
                    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                    depth += 1;
                    match depth {
                        1 => root = Some(name),
                        2 => current = Some((name, String::new())),
                        // Deeper structure is not part of the canonical
                        // shape; its text still lands in the level-2 field.
                        _ => {}
                    }
                }
                Event::Empty(empty) => {
                    if depth == 1 {
                        let name = String::from_utf8_lossy(empty.name().as_ref()).into_owned();
                        fields.push((name, String::new()));
                    }
                }
                Event::Text(text) => {
                    if let Some((_, value)) = current.as_mut() {
                        let unescaped = text
                            .unescape()
                            .map_err(|err| DocumentError::Malformed(err.to_string()))?;
                        value.push_str(&unescaped);
                    }
                }
                Event::End(_) => {
                    if depth == 2 {
                        if let Some(field) = current.take() {
                            fields.push(field);
                        }
                    }
                    depth = depth.saturating_sub(1);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if depth != 0 {
            return Err(DocumentError::Malformed("missing end tag".to_string()));
        }
        let root = root.ok_or(DocumentError::MissingRoot)?;
        Ok(Self { root, fields })
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Text of the first child with the given tag, `None` when absent.
    /// A self-closing element is present with empty text.
    pub fn text_of(&self, tag: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == tag)
            .map(|(_, value)| value.as_str())
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_preserves_insertion_order() {
        let xml = DocumentBuilder::new("Agente")
            .field("Nome", "Acme Ltd")
            .field("TipoPessoa", "Pessoa Jurídica")
            .field("Email", "a@acme.com")
            .build()
            .expect("builds");
        let nome = xml.find("<Nome>").expect("Nome present");
        let tipo = xml.find("<TipoPessoa>").expect("TipoPessoa present");
        let email = xml.find("<Email>").expect("Email present");
        assert!(nome < tipo && tipo < email);
        assert!(xml.starts_with("<?xml"));
    }

    #[test]
    fn build_then_parse_round_trips_values() {
        let xml = DocumentBuilder::new("ContaPagar")
            .field("Descricao", "Invoice 42")
            .field("Valor", "1500.50")
            .field("DataEmissao", "01/03/2024")
            .build()
            .expect("builds");
        let parsed = ParsedDocument::parse(&xml).expect("parses");
        assert_eq!(parsed.root(), "ContaPagar");
        assert_eq!(parsed.text_of("Descricao"), Some("Invoice 42"));
        assert_eq!(parsed.text_of("Valor"), Some("1500.50"));
        assert_eq!(parsed.text_of("DataEmissao"), Some("01/03/2024"));
    }

    #[test]
    fn special_characters_are_escaped_and_recovered() {
        let xml = DocumentBuilder::new("Agente")
            .field("Nome", "Silva & Filhos <Ltda>")
            .build()
            .expect("builds");
        assert!(xml.contains("Silva &amp; Filhos &lt;Ltda&gt;"));
        let parsed = ParsedDocument::parse(&xml).expect("parses");
        assert_eq!(parsed.text_of("Nome"), Some("Silva & Filhos <Ltda>"));
    }

    #[test]
    fn omitted_optional_parses_as_absent_not_empty() {
        let xml = DocumentBuilder::new("Agente")
            .field("Nome", "Acme")
            .optional_field("CPF", "  ")
            .field("Endereco", "")
            .build()
            .expect("builds");
        let parsed = ParsedDocument::parse(&xml).expect("parses");
        assert_eq!(parsed.text_of("CPF"), None);
        assert_eq!(parsed.text_of("Endereco"), Some(""));
    }

    #[test]
    fn malformed_input_is_rejected() {
        assert!(matches!(
            ParsedDocument::parse("<not xml"),
            Err(DocumentError::Malformed(_))
        ));
        assert!(ParsedDocument::parse("<Agente><Nome>x</Nome>").is_err());
        assert!(ParsedDocument::parse("").is_err());
    }
}
