//! Per-emission name assignment.

use agentgen_core::{normalize, CasePolicy, Error, Result, SafeName};
use std::collections::HashMap;

/// Python reserved words. A normalized name equal to one gets a `_` suffix.
const KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

/// Assigns source identifiers for one emission and rejects collisions.
///
/// Generated modules share one namespace, so tools, agents and tasks are all
/// assigned from the same table.
#[derive(Debug)]
pub struct NameTable {
    case: CasePolicy,
    by_id: HashMap<String, SafeName>,
    owners: HashMap<SafeName, String>,
}

impl NameTable {
    pub fn new(case: CasePolicy) -> Self {
        Self {
            case,
            by_id: HashMap::new(),
            owners: HashMap::new(),
        }
    }

    /// Claim names the generated code already uses, such as imports.
    pub fn reserve(&mut self, names: &[&str]) {
        for name in names {
            let name = normalize(name, CasePolicy::Preserve);
            let owner = format!("reserved name `{}`", name);
            self.owners.insert(name, owner);
        }
    }

    /// Name for `id`. Assigning the same identifier twice returns the same
    /// name; two identifiers normalizing to one name is an error.
    pub fn assign(&mut self, id: &str) -> Result<SafeName> {
        if let Some(name) = self.by_id.get(id) {
            return Ok(name.clone());
        }
        let mut name = normalize(id, self.case);
        if KEYWORDS.contains(&name.as_str()) {
            name = name.with_underscore();
        }
        if let Some(owner) = self.owners.get(&name) {
            return Err(Error::emission(format!(
                "identifier collision: {} and {} both map to `{}`",
                owner, id, name
            )));
        }
        self.owners.insert(name.clone(), id.to_string());
        self.by_id.insert(id.to_string(), name.clone());
        Ok(name)
    }

    /// Claim a class name derived from `base`. While the name is taken or a
    /// keyword it gets another `Crew` prefix (`Crew` → `CrewCrew`).
    pub fn claim_class(&mut self, base: &str, owner: &str) -> SafeName {
        let mut name = normalize(base, CasePolicy::Preserve);
        while KEYWORDS.contains(&name.as_str()) || self.owners.contains_key(&name) {
            name = normalize(&format!("Crew{}", name), CasePolicy::Preserve);
        }
        self.owners.insert(name.clone(), owner.to_string());
        name
    }

    /// Name previously assigned to `id`.
    pub fn get(&self, id: &str) -> Option<&SafeName> {
        self.by_id.get(id)
    }
}
