//! `x-ms-visibility` decoration.

use std::fmt;
use std::str::FromStr;

use typeschema_core::SchemaNode;

use crate::error::SchemaError;
use crate::naming::NamingStrategy;

/// Extension key carrying the visibility tier. Consumers match on this exact string.
pub const VISIBILITY_EXTENSION: &str = "x-ms-visibility";

/// Documentation visibility tier of a field or parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisibilityType {
    Important,
    Advanced,
    Internal,
}

impl VisibilityType {
    pub const ALL: [Self; 3] = [Self::Important, Self::Advanced, Self::Internal];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Important => "Important",
            Self::Advanced => "Advanced",
            Self::Internal => "Internal",
        }
    }

    /// Enumerant name rendered through the naming strategy.
    #[must_use]
    pub fn display_name(self, strategy: &dyn NamingStrategy) -> String {
        strategy.name(self.as_str())
    }
}

impl fmt::Display for VisibilityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VisibilityType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                SchemaError::unsupported(s, "expected one of: important, advanced, internal")
            })
    }
}

/// Visibility metadata attached to a property or parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisibilityAttribute {
    pub visibility: VisibilityType,
}

impl VisibilityAttribute {
    #[must_use]
    pub const fn new(visibility: VisibilityType) -> Self {
        Self { visibility }
    }
}

impl From<VisibilityType> for VisibilityAttribute {
    fn from(visibility: VisibilityType) -> Self {
        Self::new(visibility)
    }
}

/// Attach the visibility extension to `node` when an attribute is present.
///
/// Other extensions already on the node are left alone.
pub fn decorate(
    node: &mut SchemaNode,
    attribute: Option<&VisibilityAttribute>,
    strategy: &dyn NamingStrategy,
) {
    if let Some(attribute) = attribute {
        node.extensions.insert(
            VISIBILITY_EXTENSION.to_string(),
            serde_json::Value::String(attribute.visibility.display_name(strategy)),
        );
    }
}
