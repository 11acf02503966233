use thiserror::Error;
use typeschema_core::DefinitionConflict;

#[derive(Error, Debug)]
pub enum SchemaError {
    /// The type cannot be represented as a query, path or header parameter.
    #[error("type `{type_name}` cannot be used as a simple parameter")]
    UnsupportedParameterShape { type_name: String },

    /// No registered visitor accepts the type. The collection is missing its fallback.
    #[error("no visitor accepts type `{type_name}`")]
    DispatchExhausted { type_name: String },

    #[error("schema name must not be empty")]
    EmptyName,

    #[error("unsupported type `{type_name}`: {reason}")]
    UnsupportedType { type_name: String, reason: String },

    #[error("invalid Rust syntax: {0}")]
    InvalidSyntax(#[from] syn::Error),

    #[error("root schema `{id}` already belongs to `{existing}`, cannot register `{incoming}`")]
    ConflictingDefinition {
        id: String,
        existing: String,
        incoming: String,
    },

    #[error(transparent)]
    DefinitionConflict(#[from] DefinitionConflict),
}

impl SchemaError {
    /// Whether the caller can reject just this parameter and carry on.
    #[must_use]
    pub const fn is_unsupported_shape(&self) -> bool {
        matches!(self, Self::UnsupportedParameterShape { .. })
    }

    pub(crate) fn unsupported(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedType {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = SchemaError> = std::result::Result<T, E>;
