use serde::{Deserialize, Serialize};

/// One item of a tool result envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentItem {
    Text {
        text: String,
    },
    Image {
        /// Base64 encoded bytes.
        data: String,
        #[serde(rename = "mimeType")]
        mime_type: String,
    },
}

/// Ordered content returned by a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: Vec<ContentItem>,
    #[serde(rename = "isError", skip_serializing_if = "std::ops::Not::not", default)]
    pub is_error: bool,
}

impl ToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentItem::Text { text: text.into() }],
            is_error: false,
        }
    }

    pub fn image(data: String, mime_type: impl Into<String>) -> Self {
        Self {
            content: vec![ContentItem::Image {
                data,
                mime_type: mime_type.into(),
            }],
            is_error: false,
        }
    }

    /// Execution failure reported in-band.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ContentItem::Text { text: message.into() }],
            is_error: true,
        }
    }

    /// Text of the first item, if it is a text item.
    #[cfg(test)]
    pub fn first_text(&self) -> Option<&str> {
        match self.content.first() {
            Some(ContentItem::Text { text }) => Some(text),
            _ => None,
        }
    }
}
