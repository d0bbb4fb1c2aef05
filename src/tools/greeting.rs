use async_trait::async_trait;
use serde::Deserialize;

use super::content::ToolResult;
use super::registry::ToolHandler;
use super::schema::{FieldSpec, ToolSchema, ValidatedArgs};
use crate::error::ToolError;

const LANGUAGES: &[&str] = &["ko", "en"];

pub struct GreetingDefaults {
    pub language: &'static str,
}

pub const DEFAULTS: GreetingDefaults = GreetingDefaults { language: "ko" };

#[derive(Debug, Deserialize)]
struct GreetingArgs {
    name: String,
    language: String,
}

pub fn greet(name: &str, language: &str) -> String {
    match language {
        "en" => format!("Hello, {}! 👋", name),
        _ => format!("안녕하세요, {}님! 😊", name),
    }
}

pub struct GreetingTool;

#[async_trait]
impl ToolHandler for GreetingTool {
    fn name(&self) -> &'static str {
        "greeting"
    }

    fn description(&self) -> &'static str {
        "이름과 언어를 지정하여 인사합니다"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new()
            .field(FieldSpec::string("name", "인사할 사람의 이름"))
            .field(
                FieldSpec::one_of("language", "인사 언어 (기본값: ko)", LANGUAGES)
                    .with_default(DEFAULTS.language),
            )
    }

    async fn call(&self, args: ValidatedArgs) -> Result<ToolResult, ToolError> {
        let args: GreetingArgs = args.parse()?;
        Ok(ToolResult::text(greet(&args.name, &args.language)))
    }
}
