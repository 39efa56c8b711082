//! Graph loader - Turtle first, RDF/XML as the fallback serialization.

use crate::graph::KnowledgeGraph;
use agentgen_core::{Error, Result};
use oxigraph::io::{RdfFormat, RdfParser};
use oxigraph::model::{BlankNode, NamedNode, Quad, Subject, Term};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Load a graph document from disk.
///
/// Fails with [`Error::Parse`] carrying both causes when neither Turtle nor
/// RDF/XML accepts the document.
pub fn load(path: impl AsRef<Path>) -> Result<KnowledgeGraph> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    load_bytes(&bytes, path, base_iri(path).as_deref())
}

/// Load a graph document held in memory. `name` only labels errors.
pub fn load_str(text: &str, name: &str) -> Result<KnowledgeGraph> {
    load_bytes(text.as_bytes(), Path::new(name), None)
}

fn load_bytes(bytes: &[u8], path: &Path, base: Option<&str>) -> Result<KnowledgeGraph> {
    let primary = match parse_document(bytes, RdfFormat::Turtle, base) {
        Ok(quads) => {
            debug!(path = %path.display(), triples = quads.len(), "loaded turtle");
            return KnowledgeGraph::from_quads(quads);
        }
        Err(e) => e,
    };

    debug!(path = %path.display(), error = %primary, "turtle rejected, trying rdf/xml");
    match parse_document(bytes, RdfFormat::RdfXml, base) {
        Ok(quads) => {
            debug!(path = %path.display(), triples = quads.len(), "loaded rdf/xml");
            KnowledgeGraph::from_quads(quads)
        }
        Err(secondary) => Err(Error::parse(path, primary, secondary)),
    }
}

/// Parse the whole document or nothing.
fn parse_document(
    bytes: &[u8],
    format: RdfFormat,
    base: Option<&str>,
) -> std::result::Result<Vec<Quad>, String> {
    let mut parser = RdfParser::from_format(format);
    if let Some(base) = base {
        parser = parser.with_base_iri(base).map_err(|e| e.to_string())?;
    }

    let mut blanks = BlankRelabeler::default();
    let mut quads = Vec::new();
    for quad in parser.for_reader(bytes) {
        let mut quad = quad.map_err(|e| e.to_string())?;
        blanks.relabel(&mut quad);
        quads.push(quad);
    }
    Ok(quads)
}

/// `file://` IRI for a path, when the path forms a valid IRI.
fn base_iri(path: &Path) -> Option<String> {
    let absolute = std::fs::canonicalize(path).ok()?;
    let iri = format!("file://{}", absolute.to_string_lossy());
    NamedNode::new(iri.as_str()).ok().map(|_| iri)
}

/// Parsers may label anonymous nodes randomly. Blank nodes are renamed
/// `b0`, `b1`, ... in document order so identifiers are stable across runs.
#[derive(Default)]
struct BlankRelabeler {
    ids: HashMap<String, BlankNode>,
}

impl BlankRelabeler {
    fn relabel(&mut self, quad: &mut Quad) {
        if let Subject::BlankNode(b) = &quad.subject {
            let canonical = self.canonical(b);
            quad.subject = Subject::BlankNode(canonical);
        }
        if let Term::BlankNode(b) = &quad.object {
            let canonical = self.canonical(b);
            quad.object = Term::BlankNode(canonical);
        }
    }

    fn canonical(&mut self, node: &BlankNode) -> BlankNode {
        let next = self.ids.len();
        self.ids
            .entry(node.as_str().to_string())
            .or_insert_with(|| BlankNode::new_unchecked(format!("b{}", next)))
            .clone()
    }
}
