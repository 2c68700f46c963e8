use thiserror::Error;

/// Result type for rendering types and signatures.
pub type Result<T> = std::result::Result<T, TypeError>;

/// Errors raised while rendering a type or synthesizing its zero value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("mix of named and unnamed func args")]
    MixedNamedArgs,

    #[error("cannot deduce default init for named type `{name}` with no value type")]
    NamedWithoutValueType { name: String },

    #[error("no default init for unnamed literal")]
    UnnamedLiteral,

    #[error("declaration `{name}` has no type")]
    MissingType { name: String },

    #[error("variadic func `{name}` must have at least one arg")]
    VariadicWithoutArgs { name: String },
}
