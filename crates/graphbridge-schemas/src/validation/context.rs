//! Path-tracking context threaded through validators
//!
//! Copyright (c) 2025 Graphbridge Team
//! Licensed under the Apache-2.0 license

/// Validation context carrying the JSON path being validated
#[derive(Debug, Clone)]
pub struct ValidationContext {
    /// Current JSON path, rooted at `$`
    pub path: String,
}

impl ValidationContext {
    /// Create a new context rooted at `$`
    pub fn new() -> Self {
        Self {
            path: "$".to_string(),
        }
    }

    /// Create a child context with updated path
    pub fn child<P: AsRef<str>>(&self, path_segment: P) -> Self {
        let new_path = if self.path == "$" {
            format!("$.{}", path_segment.as_ref())
        } else {
            format!("{}.{}", self.path, path_segment.as_ref())
        };

        Self { path: new_path }
    }

    /// Create a child context for an array index
    pub fn child_index(&self, index: usize) -> Self {
        Self {
            path: format!("{}[{}]", self.path, index),
        }
    }
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_context_child() {
        let context = ValidationContext::new();
        let child = context.child("entities");
        assert_eq!(child.path, "$.entities");

        let grandchild = child.child("asset");
        assert_eq!(grandchild.path, "$.entities.asset");
    }

    #[test]
    fn test_validation_context_child_index() {
        let context = ValidationContext::new().child("constraints");
        let indexed = context.child_index(0);
        assert_eq!(indexed.path, "$.constraints[0]");
    }
}
