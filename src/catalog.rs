//! # Domain Catalog
//!
//! Reference data shipped for the built-in domains. A catalog is a plain
//! value handed to the generator; nothing here is global, so callers can
//! extend or replace the built-in tables before provisioning.

use std::collections::BTreeMap;

use crate::manifest::Domain;
use crate::table::{Row, RowCollection};

/// One reference table a domain provides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableTemplate {
    /// File name under the leader's `data/` directory
    pub file_name: String,
    pub key_column: usize,
    pub table: RowCollection,
}

impl TableTemplate {
    pub fn new(file_name: impl Into<String>, key_column: usize, table: RowCollection) -> Self {
        Self {
            file_name: file_name.into(),
            key_column,
            table,
        }
    }
}

/// Reference tables keyed by domain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainCatalog {
    domains: BTreeMap<Domain, Vec<TableTemplate>>,
}

impl DomainCatalog {
    /// A catalog with no tables at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// The healthcare, qa and cis tables
    pub fn builtin() -> Self {
        Self::empty()
            .with_domain(Domain::Healthcare, healthcare_tables())
            .with_domain(Domain::Qa, qa_tables())
            .with_domain(Domain::Cis, cis_tables())
    }

    /// Replace the tables of one domain
    pub fn with_domain(mut self, domain: Domain, tables: Vec<TableTemplate>) -> Self {
        self.domains.insert(domain, tables);
        self
    }

    /// Tables for `domain`, empty when the domain ships none
    pub fn tables_for(&self, domain: &Domain) -> &[TableTemplate] {
        self.domains.get(domain).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn domains(&self) -> impl Iterator<Item = &Domain> {
        self.domains.keys()
    }
}

fn keyword_table(header: [&str; 3], keys: &[&str], rest: [&str; 2]) -> RowCollection {
    let rows = keys
        .iter()
        .map(|key| Row::new([*key, rest[0], rest[1]]))
        .collect();
    RowCollection::new(header, rows)
}

fn checklist_table(key_header: &str, items: &[(&str, &str)]) -> RowCollection {
    let rows = items
        .iter()
        .map(|(item, description)| Row::new([*item, *description, "PENDING"]))
        .collect();
    RowCollection::new([key_header, "description", "status"], rows)
}

fn routing_table(routes: &[(&str, &str)]) -> RowCollection {
    let rows = routes
        .iter()
        .map(|(specialist, keywords)| Row::new([*specialist, *keywords]))
        .collect();
    RowCollection::new(["specialist", "keywords"], rows)
}

fn healthcare_tables() -> Vec<TableTemplate> {
    let phi = keyword_table(
        ["keyword", "category", "risk_level"],
        &[
            "patient",
            "medical record",
            "diagnosis",
            "prescription",
            "SSN",
            "insurance",
            "PHI",
        ],
        ["PHI", "HIGH"],
    );
    let hipaa = checklist_table(
        "requirement",
        &[
            ("Encryption at rest", "Data encrypted in database"),
            ("Encryption in transit", "TLS/SSL for all communications"),
            ("Access controls", "Role-based access implemented"),
            ("Audit logging", "All PHI access logged"),
            ("Data minimization", "Only necessary PHI collected"),
            ("Patient consent", "Consent management in place"),
            ("Breach notification", "Incident response plan ready"),
        ],
    );
    let routing = routing_table(&[
        ("clinical", "diagnosis, treatment, symptoms, medical history"),
        ("patient", "demographics, contact, insurance, consent"),
        ("compliance", "HIPAA, PHI, audit, security, encryption"),
    ]);

    vec![
        TableTemplate::new("phi-keywords.csv", 0, phi),
        TableTemplate::new("hipaa-checklist.csv", 0, hipaa),
        TableTemplate::new("routing-keywords.csv", 0, routing),
    ]
}

fn qa_tables() -> Vec<TableTemplate> {
    let test_types = keyword_table(
        ["test_type", "priority", "automation_level"],
        &["unit", "integration", "e2e", "performance", "security", "accessibility"],
        ["HIGH", "AUTOMATED"],
    );
    let checklist = checklist_table(
        "requirement",
        &[
            ("Code coverage", "Minimum 80% coverage achieved"),
            ("Test automation", "Critical paths automated"),
            ("Performance baseline", "Response times within SLA"),
            ("Security scan", "No critical vulnerabilities"),
            ("Accessibility audit", "WCAG 2.1 AA compliance"),
            ("Cross-browser testing", "All major browsers tested"),
            ("Mobile testing", "iOS and Android tested"),
        ],
    );
    let routing = routing_table(&[
        ("unit", "component, function, class, mock, isolated"),
        ("integration", "API, service, contract, integration"),
        ("e2e", "user flow, scenario, end-to-end, browser"),
        ("performance", "load, stress, benchmark, profiling, latency"),
    ]);

    vec![
        TableTemplate::new("test-types.csv", 0, test_types),
        TableTemplate::new("qa-checklist.csv", 0, checklist),
        TableTemplate::new("routing-keywords.csv", 0, routing),
    ]
}

fn cis_tables() -> Vec<TableTemplate> {
    let methods = keyword_table(
        ["method", "use_case", "specialist"],
        &[
            "brainstorming",
            "mind mapping",
            "design thinking",
            "SCAMPER",
            "6 thinking hats",
        ],
        ["Ideation and problem-solving", "innovation"],
    );
    let checklist = checklist_table(
        "stage",
        &[
            ("Problem definition", "Problem clearly articulated"),
            ("User research", "Target audience identified"),
            ("Ideation session", "Multiple solutions generated"),
            ("Prototype", "Concept visualization created"),
            ("Validation", "Feedback collected from stakeholders"),
            ("Story arc", "Narrative structure defined"),
            ("Visual design", "Supporting visuals prepared"),
        ],
    );
    let routing = routing_table(&[
        ("innovation", "ideation, brainstorming, creativity, design thinking"),
        ("research", "analysis, data, competitive, user study, market"),
        ("storytelling", "narrative, presentation, communication, content"),
    ]);

    vec![
        TableTemplate::new("creative-methods.csv", 0, methods),
        TableTemplate::new("cis-checklist.csv", 0, checklist),
        TableTemplate::new("routing-keywords.csv", 0, routing),
    ]
}
