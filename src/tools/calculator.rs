use async_trait::async_trait;
use serde::Deserialize;

use super::content::ToolResult;
use super::registry::ToolHandler;
use super::schema::{FieldSpec, ToolSchema, ValidatedArgs};
use crate::error::ToolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    pub const NAMES: &'static [&'static str] = &["add", "subtract", "multiply", "divide"];

    pub fn symbol(self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Subtract => "-",
            Operation::Multiply => "×",
            Operation::Divide => "÷",
        }
    }
}

#[derive(Debug, Deserialize)]
struct CalculatorArgs {
    operation: Operation,
    a: f64,
    b: f64,
}

/// Apply `op`. Division by zero and non-finite results are domain errors.
pub fn compute(op: Operation, a: f64, b: f64) -> Result<f64, ToolError> {
    let result = match op {
        Operation::Add => a + b,
        Operation::Subtract => a - b,
        Operation::Multiply => a * b,
        Operation::Divide => {
            if b == 0.0 {
                return Err(ToolError::domain("0으로 나눌 수 없습니다"));
            }
            a / b
        }
    };
    if !result.is_finite() {
        return Err(ToolError::domain("계산 결과가 표현 가능한 범위를 벗어났습니다"));
    }
    Ok(result)
}

/// Shortest round-trip form: `5`, `2.5`, never `-0`.
///
/// Magnitudes from 1e21 up and below 1e-6 switch to exponent notation with
/// an explicit sign (`1e+21`, `1.5e-7`), the way dashboard clients print them.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    let magnitude = n.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let formatted = format!("{:e}", n);
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => formatted,
        };
    }
    n.to_string()
}

pub struct CalculatorTool;

#[async_trait]
impl ToolHandler for CalculatorTool {
    fn name(&self) -> &'static str {
        "calculator"
    }

    fn description(&self) -> &'static str {
        "사칙연산을 수행합니다 (add, subtract, multiply, divide)"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new()
            .field(FieldSpec::one_of(
                "operation",
                "수행할 연산 (add, subtract, multiply, divide)",
                Operation::NAMES,
            ))
            .field(FieldSpec::number("a", "첫 번째 숫자"))
            .field(FieldSpec::number("b", "두 번째 숫자"))
    }

    async fn call(&self, args: ValidatedArgs) -> Result<ToolResult, ToolError> {
        let CalculatorArgs { operation, a, b } = args.parse()?;
        let result = compute(operation, a, b)?;
        Ok(ToolResult::text(format!(
            "{} {} {} = {}",
            format_number(a),
            operation.symbol(),
            format_number(b),
            format_number(result)
        )))
    }
}
