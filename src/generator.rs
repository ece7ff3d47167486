//! # Artifact Generation
//!
//! The generator turns one declared leader into the set of artifacts the
//! reconciliation core compares against the installed state. It is called
//! in-process through [`ArtifactGenerator`]; rendering of agent documents
//! and workflow files is not part of this interface.

use std::path::Path;

use log::debug;

use crate::catalog::DomainCatalog;
use crate::error::{Error, Result};
use crate::manifest::Leader;
use crate::table::RowCollection;

/// A reference table produced for a leader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedTable {
    /// File name under the leader's `data/` directory
    pub file_name: String,
    pub key_column: usize,
    pub rows: RowCollection,
}

/// Everything generated for one leader
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedBundle {
    pub tables: Vec<GeneratedTable>,
}

impl GeneratedBundle {
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn table(&self, file_name: &str) -> Option<&GeneratedTable> {
        self.tables.iter().find(|t| t.file_name == file_name)
    }
}

/// Produces the desired artifacts for a leader.
pub trait ArtifactGenerator {
    fn generate(&self, leader: &Leader) -> Result<GeneratedBundle>;
}

/// Generator backed by an injected [`DomainCatalog`]
#[derive(Debug, Clone)]
pub struct CatalogGenerator {
    catalog: DomainCatalog,
}

impl CatalogGenerator {
    pub fn new(catalog: DomainCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &DomainCatalog {
        &self.catalog
    }
}

impl Default for CatalogGenerator {
    fn default() -> Self {
        Self::new(DomainCatalog::builtin())
    }
}

impl ArtifactGenerator for CatalogGenerator {
    fn generate(&self, leader: &Leader) -> Result<GeneratedBundle> {
        let mut tables = Vec::new();

        for template in self.catalog.tables_for(&leader.domain) {
            if !is_plain_file_name(&template.file_name) {
                return Err(Error::Generator {
                    leader: leader.name.clone(),
                    message: format!("invalid table name '{}'", template.file_name),
                });
            }
            tables.push(GeneratedTable {
                file_name: template.file_name.clone(),
                key_column: template.key_column,
                rows: template.table.clone(),
            });
        }

        debug!(
            "Generated {} reference tables for {} ({})",
            tables.len(),
            leader.name,
            leader.domain
        );

        Ok(GeneratedBundle { tables })
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains(['/', '\\'])
        && Path::new(name).file_name().is_some_and(|n| n == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TableTemplate;
    use crate::manifest::Domain;
    use crate::table::Row;

    fn leader(domain: Domain) -> Leader {
        Leader {
            name: "sample-leader".to_string(),
            domain,
            specialists: vec![],
            phase: "3-arch".to_string(),
        }
    }

    #[test]
    fn test_generate_qa_tables() {
        let bundle = CatalogGenerator::default()
            .generate(&leader(Domain::Qa))
            .unwrap();

        assert_eq!(bundle.tables.len(), 3);
        let types = bundle.table("test-types.csv").unwrap();
        assert_eq!(types.key_column, 0);
        assert_eq!(types.rows.rows()[0], Row::new(["unit", "HIGH", "AUTOMATED"]));
    }

    #[test]
    fn test_generate_generic_is_empty() {
        let bundle = CatalogGenerator::default()
            .generate(&leader(Domain::Generic))
            .unwrap();
        assert!(bundle.is_empty());
    }

    #[test]
    fn test_generate_rejects_path_like_names() {
        let catalog = DomainCatalog::empty().with_domain(
            Domain::Qa,
            vec![TableTemplate::new("../outside.csv", 0, RowCollection::empty())],
        );

        let err = CatalogGenerator::new(catalog)
            .generate(&leader(Domain::Qa))
            .unwrap_err();

        assert!(matches!(err, Error::Generator { ref leader, .. } if leader == "sample-leader"));
        assert!(err.to_string().contains("../outside.csv"));
    }

    #[test]
    fn test_plain_file_name() {
        assert!(is_plain_file_name("a.csv"));
        assert!(!is_plain_file_name(""));
        assert!(!is_plain_file_name(".."));
        assert!(!is_plain_file_name("a/b.csv"));
        assert!(!is_plain_file_name("a\\b.csv"));
    }
}
