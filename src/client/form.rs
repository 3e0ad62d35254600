//! 产品编辑表单

use serde_json::Value;

use crate::app::product::model::{Product, ProductPayload};

/// 表单控件的原始输入，全部是字符串
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductForm {
    pub name: String,
    pub price: String,
    pub stock: String,
    pub description: String,
}

impl ProductForm {
    pub fn blank() -> Self {
        Self::default()
    }

    /// 用已有产品的当前值预填
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price.to_string(),
            stock: product.stock.to_string(),
            description: product.description.clone().unwrap_or_default(),
        }
    }

    /// 留空的必填字段，非空时不允许提交
    pub fn missing_required(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("price", &self.price),
            ("stock", &self.stock),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    /// 按原样提交字符串，数值解析和校验交给服务端
    pub fn to_payload(&self) -> ProductPayload {
        ProductPayload {
            name: Some(Value::from(self.name.as_str())),
            price: Some(Value::from(self.price.as_str())),
            stock: Some(Value::from(self.stock.as_str())),
            description: Some(Value::from(self.description.as_str())),
        }
    }
}
