//! Per-call configuration. There is no global state: every build receives
//! its own `BuildOptions`.
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::reflect::{DeclaredMetadata, MetadataLookup, Reflect, Value};

/// Default bound on prototype nesting while extracting defaults.
pub const DEFAULT_MAX_DEPTH: usize = 256;

#[derive(Clone)]
pub struct BuildOptions {
    allow_null: bool,
    initial_values: bool,
    max_depth: usize,
    defaults: HashMap<TypeId, Value>,
    metadata: Arc<dyn MetadataLookup>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            allow_null: false,
            initial_values: true,
            max_depth: DEFAULT_MAX_DEPTH,
            defaults: HashMap::new(),
            metadata: Arc::new(DeclaredMetadata),
        }
    }
}

impl BuildOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat every field without an explicit nullability annotation as nullable.
    pub fn allow_null(mut self, allow: bool) -> Self {
        self.allow_null = allow;
        self
    }

    /// Use `T::default()` (registered via `TypeInfo::with_prototype`) as the
    /// prototype of records that have no explicit one.
    pub fn initial_values(mut self, enabled: bool) -> Self {
        self.initial_values = enabled;
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Prototype to use whenever a `T` record is encountered.
    pub fn with_default<T: Reflect>(self, prototype: &T) -> Self {
        self.with_default_value(T::type_info().id(), prototype.reflect())
    }

    pub fn with_default_value(mut self, type_id: TypeId, prototype: Value) -> Self {
        self.defaults.insert(type_id, prototype);
        self
    }

    pub fn metadata(mut self, lookup: impl MetadataLookup + 'static) -> Self {
        self.metadata = Arc::new(lookup);
        self
    }

    pub fn allows_null(&self) -> bool {
        self.allow_null
    }

    pub fn uses_initial_values(&self) -> bool {
        self.initial_values
    }

    pub fn depth_limit(&self) -> usize {
        self.max_depth
    }

    pub fn default_for(&self, type_id: TypeId) -> Option<&Value> {
        self.defaults.get(&type_id)
    }

    pub(crate) fn lookup(&self) -> &dyn MetadataLookup {
        self.metadata.as_ref()
    }
}

impl fmt::Debug for BuildOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildOptions")
            .field("allow_null", &self.allow_null)
            .field("initial_values", &self.initial_values)
            .field("max_depth", &self.max_depth)
            .field("defaults", &self.defaults.len())
            .finish_non_exhaustive()
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_keyed_by_type() {
        let options = BuildOptions::new().with_default(&7i32);
        assert!(options.default_for(TypeId::of::<i32>()).is_some());
        assert!(options.default_for(TypeId::of::<i64>()).is_none());
    }

    #[test]
    fn builder_flags() {
        let options = BuildOptions::new().allow_null(true).initial_values(false).max_depth(3);
        assert!(options.allows_null());
        assert!(!options.uses_initial_values());
        assert_eq!(options.depth_limit(), 3);
    }

    #[test]
    fn options_are_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<BuildOptions>();
    }
}
