//! Generator configuration.

/// What to do when two differently shaped nodes share a raw name.
///
/// Declarations are keyed on the raw schema name, so only one of the two can
/// ever be emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConflictPolicy {
    /// Emit the first node encountered and log a warning for the others.
    #[default]
    KeepFirst,
    /// Abort the run with [`CodegenError::ConflictingDefinition`](crate::CodegenError::ConflictingDefinition).
    Reject,
}

/// Options for a generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Go package name; empty emits a fragment without package clause.
    pub package: String,
    /// Prepended to every generated type name.
    pub prefix: String,
    /// Forces generated type names to start with an upper-case letter.
    pub exported: bool,
    /// Handling of raw-name collisions.
    pub conflict_policy: ConflictPolicy,
}

impl GeneratorConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the package name.
    #[must_use]
    pub fn package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }

    /// Sets the type name prefix.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets whether type names are exported.
    #[must_use]
    pub fn exported(mut self, exported: bool) -> Self {
        self.exported = exported;
        self
    }

    /// Sets the conflict policy.
    #[must_use]
    pub fn conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.conflict_policy = policy;
        self
    }

    /// Resolves the declared Go name for a raw type name.
    #[must_use]
    pub fn type_name(&self, name: &str) -> String {
        crate::go::type_name(name, &self.prefix, self.exported)
    }
}
