// src/registry.rs
// Schema and index bookkeeping - opaque registries, no query-path effect

/// Versioned store of opaque schema definitions.
///
/// Definitions are kept as the strings the caller supplied; nothing is
/// validated against stored documents. `create_schema` and
/// `update_schema` both push a new version.
#[derive(Debug, Default, Clone)]
pub struct SchemaRegistry {
    versions: Vec<String>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        SchemaRegistry {
            versions: Vec::new(),
        }
    }

    /// Record a new schema version
    pub fn register(&mut self, definition: impl Into<String>) {
        self.versions.push(definition.into());
    }

    /// Most recently registered definition
    pub fn current(&self) -> Option<&str> {
        self.versions.last().map(String::as_str)
    }

    pub fn version_count(&self) -> usize {
        self.versions.len()
    }

    pub fn clear(&mut self) {
        self.versions.clear();
    }
}

/// Ordered name registry for declared indexes.
///
/// Purely bookkeeping: index names have no effect on query execution or
/// performance in this core.
#[derive(Debug, Default, Clone)]
pub struct IndexRegistry {
    fields: Vec<String>,
}

impl IndexRegistry {
    pub fn new() -> Self {
        IndexRegistry { fields: Vec::new() }
    }

    /// Register an index on a field name; idempotent
    pub fn create(&mut self, field: &str) {
        if !self.contains(field) {
            self.fields.push(field.to_string());
        }
    }

    /// Remove a registered index; returns whether it was present
    pub fn remove(&mut self, field: &str) -> bool {
        let before = self.fields.len();
        self.fields.retain(|f| f != field);
        self.fields.len() != before
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    /// Registered field names in declaration order
    pub fn names(&self) -> &[String] {
        &self.fields
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }
}
