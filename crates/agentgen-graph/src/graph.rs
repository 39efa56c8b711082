//! In-memory knowledge graph: an oxigraph store plus declaration ranks.
//!
//! SPARQL result order is engine-defined. Every `select` re-orders rows by the
//! document position where each bound entity was first declared, so the same
//! input always yields the same row sequence.

use crate::queries::Query;
use agentgen_core::{Error, Result};
use oxigraph::model::{Quad, Subject, Term};
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// One bound solution. Literal values are trimmed; empty literals are absent.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Row {
    values: BTreeMap<String, String>,
}

impl Row {
    pub fn get(&self, var: &str) -> Option<&str> {
        self.values.get(var).map(|s| s.as_str())
    }

    /// Value or empty string.
    pub fn text(&self, var: &str) -> String {
        self.get(var).unwrap_or_default().to_string()
    }

    /// First bound variable among `vars`.
    pub fn first_of(&self, vars: &[&str]) -> Option<&str> {
        vars.iter().find_map(|v| self.get(v))
    }

    pub fn is_true(&self, var: &str) -> bool {
        matches!(self.get(var), Some("true") | Some("1"))
    }
}

pub struct KnowledgeGraph {
    store: Store,
    ranks: HashMap<String, usize>,
    triples: usize,
}

impl KnowledgeGraph {
    /// Build a graph from fully parsed quads. Callers hand over a complete
    /// document; nothing is inserted from a failed parse.
    pub(crate) fn from_quads(quads: Vec<Quad>) -> Result<Self> {
        let mut ranks = HashMap::new();
        for quad in &quads {
            if let Some(key) = subject_key(&quad.subject) {
                let next = ranks.len();
                ranks.entry(key).or_insert(next);
            }
        }
        let triples = quads.len();
        let store = Store::new().map_err(|e| Error::query(e.to_string()))?;
        store.extend(quads).map_err(|e| Error::query(e.to_string()))?;
        Ok(Self {
            store,
            ranks,
            triples,
        })
    }

    /// Number of triples loaded.
    pub fn len(&self) -> usize {
        self.triples
    }

    pub fn is_empty(&self) -> bool {
        self.triples == 0
    }

    /// Document position of the first triple with `key` as subject.
    pub fn rank(&self, key: &str) -> Option<usize> {
        self.ranks.get(key).copied()
    }

    /// Run a SELECT query and return its rows in declaration order.
    pub fn select(&self, query: &Query) -> Result<Vec<Row>> {
        let results = self
            .store
            .query(query.sparql)
            .map_err(|e| Error::query(format!("{}: {}", query.name, e)))?;
        let QueryResults::Solutions(solutions) = results else {
            return Err(Error::query(format!("{}: not a SELECT query", query.name)));
        };

        let mut rows = Vec::new();
        for solution in solutions {
            let solution = solution.map_err(|e| Error::query(format!("{}: {}", query.name, e)))?;
            let mut values = BTreeMap::new();
            for (var, term) in solution.iter() {
                if let Some(value) = term_value(term) {
                    values.insert(var.as_str().to_string(), value);
                }
            }
            rows.push(Row { values });
        }

        rows.sort_by(|a, b| self.compare_rows(a, b, query.order_by));
        debug!(query = query.name, rows = rows.len(), "query complete");
        Ok(rows)
    }

    fn compare_rows(&self, a: &Row, b: &Row, order_by: &[&str]) -> Ordering {
        for var in order_by {
            let key = |row: &Row| {
                let value = row.get(var);
                let rank = value.and_then(|v| self.rank(v)).unwrap_or(usize::MAX);
                (rank, value.map(str::to_string))
            };
            let ord = key(a).cmp(&key(b));
            if ord != Ordering::Equal {
                return ord;
            }
        }
        a.cmp(b)
    }
}

fn subject_key(subject: &Subject) -> Option<String> {
    match subject {
        Subject::NamedNode(n) => Some(n.as_str().to_string()),
        Subject::BlankNode(b) => Some(format!("_:{}", b.as_str())),
        #[allow(unreachable_patterns)]
        _ => None,
    }
}

fn term_value(term: &Term) -> Option<String> {
    match term {
        Term::NamedNode(n) => Some(n.as_str().to_string()),
        Term::BlankNode(b) => Some(format!("_:{}", b.as_str())),
        Term::Literal(l) => {
            let value = l.value().trim();
            (!value.is_empty()).then(|| value.to_string())
        }
        #[allow(unreachable_patterns)]
        _ => None,
    }
}
