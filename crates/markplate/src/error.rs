//! Error types for template execution and rendering.
//!
//! [`TemplateError`] is what a [`TemplateEngine`](crate::template::TemplateEngine)
//! returns. It hides the backing engine's error type behind a stable set of
//! variants. [`RenderError`] is what a whole render call returns.

/// Error raised while compiling or executing a template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    /// Template syntax error or compilation failure.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// The template referenced a value its payload does not provide.
    #[error("undefined value: {0}")]
    Undefined(String),

    /// No template registered under this name.
    #[error("template not found: {0}")]
    NotFound(String),

    /// The payload could not be converted into template data.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Any other execution failure.
    #[error("{0}")]
    Other(String),
}

impl From<minijinja::Error> for TemplateError {
    fn from(err: minijinja::Error) -> Self {
        use minijinja::ErrorKind;

        match err.kind() {
            ErrorKind::TemplateNotFound => TemplateError::NotFound(err.to_string()),
            ErrorKind::UndefinedError => TemplateError::Undefined(err.to_string()),
            ErrorKind::SyntaxError
            | ErrorKind::BadEscape
            | ErrorKind::UnknownTest
            | ErrorKind::UnknownFunction
            | ErrorKind::UnknownFilter
            | ErrorKind::UnknownMethod => TemplateError::Syntax(err.to_string()),
            ErrorKind::BadSerialization => TemplateError::Serialization(err.to_string()),
            _ => TemplateError::Other(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for TemplateError {
    fn from(err: serde_json::Error) -> Self {
        TemplateError::Serialization(err.to_string())
    }
}

/// Error returned by a render call.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// A template failed; the walk was terminated.
    #[error("template rendering error for {name}: {source}")]
    Template {
        name: String,
        #[source]
        source: TemplateError,
    },

    /// The walk was terminated by a renderer. The partial output is discarded.
    #[error("render terminated")]
    Terminated,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_minijinja_kinds() {
        let not_found = minijinja::Error::new(minijinja::ErrorKind::TemplateNotFound, "x");
        assert!(matches!(
            TemplateError::from(not_found),
            TemplateError::NotFound(_)
        ));

        let undefined = minijinja::Error::new(minijinja::ErrorKind::UndefinedError, "x");
        assert!(matches!(
            TemplateError::from(undefined),
            TemplateError::Undefined(_)
        ));

        let syntax = minijinja::Error::new(minijinja::ErrorKind::SyntaxError, "x");
        assert!(matches!(TemplateError::from(syntax), TemplateError::Syntax(_)));

        let other = minijinja::Error::new(minijinja::ErrorKind::InvalidOperation, "x");
        assert!(matches!(TemplateError::from(other), TemplateError::Other(_)));
    }

    #[test]
    fn test_render_error_display() {
        let err = RenderError::Template {
            name: "p".to_string(),
            source: TemplateError::Undefined("Content".to_string()),
        };
        let display = err.to_string();
        assert!(display.contains("template rendering error for p"));
        assert!(display.contains("Content"));
        assert_eq!(RenderError::Terminated.to_string(), "render terminated");
    }
}
