use std::fmt;

/// Errors raised while routing a step action.
///
/// These are programming mistakes (a flow asked for a stack it does not
/// have), so the coordinator logs them instead of returning them to the
/// caller of `perform`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// The coordinator has no root, or its root is the wrong shape.
    MissingRoot { coordinator: String },
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationError::MissingRoot { coordinator } => {
                write!(f, "missing root for coordinator {coordinator}")
            }
        }
    }
}

impl std::error::Error for NavigationError {}
