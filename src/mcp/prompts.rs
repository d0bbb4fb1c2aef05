use serde_json::{json, Value};

use super::protocol::JsonRpcError;

pub const CODE_REVIEW: &str = "code_review";

pub fn list() -> Value {
    json!({
        "prompts": [{
            "name": CODE_REVIEW,
            "description": "Request Code Review",
            "arguments": [{
                "name": "code",
                "description": "The code to review",
                "required": true
            }]
        }]
    })
}

pub fn render_code_review(code: &str) -> String {
    format!(
        "다음 코드를 분석하고 상세한 리뷰를 제공해주세요:\n\n\
         1. 코드 품질 평가\n\
         2. 개선 가능한 부분\n\
         3. 모범 사례 권장사항\n\
         4. 보안 고려사항\n\n\
         리뷰할 코드:\n\n```\n{}\n```",
        code
    )
}

pub fn get(name: &str, arguments: &Value) -> Result<Value, JsonRpcError> {
    if name != CODE_REVIEW {
        return Err(JsonRpcError::invalid_params(format!("Prompt not found: {}", name)));
    }
    let code = arguments
        .get("code")
        .and_then(Value::as_str)
        .ok_or_else(|| JsonRpcError::invalid_params("missing required argument 'code'"))?;

    Ok(json!({
        "description": "Request Code Review",
        "messages": [{
            "role": "user",
            "content": {
                "type": "text",
                "text": render_code_review(code)
            }
        }]
    }))
}
