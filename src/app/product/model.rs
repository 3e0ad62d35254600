//! 产品数据模型与请求校验

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError, ValidationErrors};

/// 产品 ID，由存储层分配，按创建顺序递增
pub type ProductId = i64;

/// 对外返回的产品记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sqlx::FromRow))]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub stock: i64,
    pub description: Option<String>,
}

impl Product {
    pub fn from_fields(id: ProductId, fields: ProductFields) -> Self {
        Self {
            id,
            name: fields.name,
            price: fields.price,
            stock: fields.stock,
            description: fields.description,
        }
    }

    pub fn fields(&self) -> ProductFields {
        ProductFields {
            name: self.name.clone(),
            price: self.price,
            stock: self.stock,
            description: self.description.clone(),
        }
    }
}

/// 经过校验的可变字段
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct ProductFields {
    #[validate(length(
        max = 255,
        message = "The name field must not be greater than 255 characters."
    ))]
    pub name: String,

    #[validate(range(min = 0.0, message = "The price field must be at least 0."))]
    pub price: f64,

    #[validate(range(min = 0, message = "The stock field must be at least 0."))]
    pub stock: i64,

    pub description: Option<String>,
}

/// 创建/更新请求体
///
/// 字段在 JSON 层面都是可选的，并且 `price`、`stock` 既可以是数字也可以是数字字符串，
/// 因为表单提交的原始值是字符串。`null` 等同于缺失。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
}

impl ProductPayload {
    /// 所有必填字段都必须出现（创建和 PUT 更新）
    pub fn into_fields(self) -> Result<ProductFields, ValidationErrors> {
        self.resolve(None)
    }

    /// 只覆盖请求中出现的字段（PATCH 更新）
    pub fn merge_into(self, current: ProductFields) -> Result<ProductFields, ValidationErrors> {
        self.resolve(Some(current))
    }

    fn resolve(self, base: Option<ProductFields>) -> Result<ProductFields, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let (base_name, base_price, base_stock, base_description) = match base {
            Some(f) => (Some(f.name), Some(f.price), Some(f.stock), Some(f.description)),
            None => (None, None, None, None),
        };

        let name = match self.name {
            Some(value) => parse_name(value),
            None => base_name.ok_or(FieldIssue::Required),
        };
        let price = match self.price {
            Some(value) => parse_price(value),
            None => base_price.ok_or(FieldIssue::Required),
        };
        let stock = match self.stock {
            Some(value) => parse_stock(value),
            None => base_stock.ok_or(FieldIssue::Required),
        };
        let description = match self.description {
            Some(value) => parse_description(value),
            None => Ok(base_description.flatten()),
        };

        let name = collect(&mut errors, "name", name);
        let price = collect(&mut errors, "price", price);
        let stock = collect(&mut errors, "stock", stock);
        let description = collect(&mut errors, "description", description);

        match (name, price, stock, description) {
            (Some(name), Some(price), Some(stock), Some(description)) => {
                let fields = ProductFields {
                    name,
                    price,
                    stock,
                    description,
                };
                fields.validate()?;
                Ok(fields)
            }
            _ => Err(errors),
        }
    }
}

enum FieldIssue {
    Required,
    Type(&'static str),
}

fn collect<T>(
    errors: &mut ValidationErrors,
    field: &'static str,
    result: Result<T, FieldIssue>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(issue) => {
            let (code, message) = match issue {
                FieldIssue::Required => ("required", format!("The {field} field is required.")),
                FieldIssue::Type(rule) => {
                    let kind = match rule {
                        "numeric" => "a number",
                        "integer" => "an integer",
                        _ => "a string",
                    };
                    (rule, format!("The {field} field must be {kind}."))
                }
            };
            let mut error = ValidationError::new(code);
            error.message = Some(Cow::Owned(message));
            errors.add(field, error);
            None
        }
    }
}

fn parse_name(value: Value) -> Result<String, FieldIssue> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Err(FieldIssue::Required)
            } else {
                Ok(trimmed.to_string())
            }
        }
        _ => Err(FieldIssue::Type("string")),
    }
}

fn parse_price(value: Value) -> Result<f64, FieldIssue> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s.trim().is_empty() => return Err(FieldIssue::Required),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|p| p.is_finite())
        .ok_or(FieldIssue::Type("numeric"))
}

// `i64::MAX as f64` rounds up to 2^63, which is itself out of range
const I64_MIN_F64: f64 = i64::MIN as f64;
const I64_MAX_F64: f64 = i64::MAX as f64;

fn parse_stock(value: Value) -> Result<i64, FieldIssue> {
    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && (I64_MIN_F64..I64_MAX_F64).contains(f))
                .map(|f| f as i64)
        }),
        Value::String(s) if s.trim().is_empty() => return Err(FieldIssue::Required),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or(FieldIssue::Type("integer"))
}

fn parse_description(value: Value) -> Result<Option<String>, FieldIssue> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
        }
        Value::Null => Ok(None),
        _ => Err(FieldIssue::Type("string")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> ProductPayload {
        serde_json::from_value(value).unwrap()
    }

    fn error_fields(errors: &ValidationErrors) -> Vec<String> {
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_iter()
            .map(|(field, _)| field.to_string())
            .collect();
        fields.sort();
        fields
    }

    #[test]
    fn test_full_payload_with_numbers() {
        let fields = payload(json!({
            "name": "Pen",
            "price": 1.5,
            "stock": 10,
            "description": "Blue ink"
        }))
        .into_fields()
        .unwrap();

        assert_eq!(fields.name, "Pen");
        assert_eq!(fields.price, 1.5);
        assert_eq!(fields.stock, 10);
        assert_eq!(fields.description.as_deref(), Some("Blue ink"));
    }

    #[test]
    fn test_form_strings_are_accepted() {
        let fields = payload(json!({
            "name": "  Notebook ",
            "price": "12.75",
            "stock": "3",
            "description": ""
        }))
        .into_fields()
        .unwrap();

        assert_eq!(fields.name, "Notebook");
        assert_eq!(fields.price, 12.75);
        assert_eq!(fields.stock, 3);
        assert_eq!(fields.description, None);
    }

    #[test]
    fn test_missing_required_fields() {
        let errors = payload(json!({ "description": "only this" }))
            .into_fields()
            .unwrap_err();
        assert_eq!(error_fields(&errors), vec!["name", "price", "stock"]);

        let field_errors = errors.field_errors();
        let name_errors = field_errors["name"];
        assert_eq!(name_errors[0].code, "required");
        assert_eq!(
            name_errors[0].message.as_deref(),
            Some("The name field is required.")
        );
    }

    #[test]
    fn test_blank_strings_count_as_missing() {
        let errors = payload(json!({ "name": "   ", "price": "", "stock": "" }))
            .into_fields()
            .unwrap_err();
        assert_eq!(error_fields(&errors), vec!["name", "price", "stock"]);
    }

    #[test]
    fn test_malformed_values() {
        let errors = payload(json!({
            "name": 42,
            "price": "cheap",
            "stock": 2.5,
            "description": ["x"]
        }))
        .into_fields()
        .unwrap_err();

        assert_eq!(
            error_fields(&errors),
            vec!["description", "name", "price", "stock"]
        );
        assert_eq!(
            errors.field_errors()["stock"][0].message.as_deref(),
            Some("The stock field must be an integer.")
        );
    }

    #[test]
    fn test_stock_outside_integer_range() {
        for stock in [json!(1e19), json!(-1e19), json!(9.3e18)] {
            let errors = payload(json!({ "name": "Pen", "price": 1, "stock": stock }))
                .into_fields()
                .unwrap_err();
            assert_eq!(error_fields(&errors), vec!["stock"]);
            assert_eq!(errors.field_errors()["stock"][0].code, "integer");
        }

        let fields = payload(json!({ "name": "Pen", "price": 1, "stock": 12.0 }))
            .into_fields()
            .unwrap();
        assert_eq!(fields.stock, 12);
    }

    #[test]
    fn test_negative_values_are_rejected() {
        let errors = payload(json!({ "name": "Pen", "price": -1, "stock": "-5" }))
            .into_fields()
            .unwrap_err();
        assert_eq!(error_fields(&errors), vec!["price", "stock"]);
        assert_eq!(
            errors.field_errors()["price"][0].message.as_deref(),
            Some("The price field must be at least 0.")
        );
    }

    #[test]
    fn test_name_length_limit() {
        let long_name = "x".repeat(256);
        let errors = payload(json!({ "name": long_name, "price": 1, "stock": 1 }))
            .into_fields()
            .unwrap_err();
        assert_eq!(error_fields(&errors), vec!["name"]);
    }

    #[test]
    fn test_merge_keeps_absent_fields() {
        let current = ProductFields {
            name: "Pen".to_string(),
            price: 1.5,
            stock: 10,
            description: Some("Blue ink".to_string()),
        };

        let merged = payload(json!({ "stock": 4 }))
            .merge_into(current.clone())
            .unwrap();
        assert_eq!(merged.stock, 4);
        assert_eq!(merged.name, current.name);
        assert_eq!(merged.description, current.description);

        let cleared = payload(json!({ "description": "" }))
            .merge_into(current)
            .unwrap();
        assert_eq!(cleared.description, None);
    }
}
