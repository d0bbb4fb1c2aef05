use thiserror::Error;

/// Failure classes of a tool invocation.
///
/// `Validation` and `UnknownTool` are caller faults raised before any side
/// effect. The rest surface as tool-level errors to the caller.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Invalid arguments: {0}")]
    Validation(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("{0}")]
    Configuration(String),

    #[error("{0}")]
    Domain(String),

    #[error("{message}")]
    Upstream { status: u16, message: String },

    #[error("{0}")]
    Network(String),
}

impl ToolError {
    pub fn validation(message: impl Into<String>) -> Self {
        ToolError::Validation(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        ToolError::Configuration(message.into())
    }

    pub fn domain(message: impl Into<String>) -> Self {
        ToolError::Domain(message.into())
    }

    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        ToolError::Upstream {
            status,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        ToolError::Network(message.into())
    }

    /// True for errors caused by the caller's request rather than execution.
    pub fn is_caller_fault(&self) -> bool {
        matches!(self, ToolError::Validation(_) | ToolError::UnknownTool(_))
    }

    /// Short class name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ToolError::Validation(_) => "validation",
            ToolError::UnknownTool(_) => "unknown_tool",
            ToolError::Configuration(_) => "configuration",
            ToolError::Domain(_) => "domain",
            ToolError::Upstream { .. } => "upstream",
            ToolError::Network(_) => "network",
        }
    }
}
