//! 页面的文本渲染

use std::fmt::Write;

use super::page::{FormMode, FormState, ListState, ProductPage};
use super::ProductGateway;
use crate::app::product::model::Product;

pub const TITLE: &str = "Product Management";
pub const LOADING: &str = "Loading products...";
pub const EMPTY_PLACEHOLDER: &str = "No products available.";

const HEADERS: [&str; 5] = ["ID", "Name", "Price", "Stock", "Description"];

/// 两位小数的货币格式，例如 `₱1.50`
pub fn format_price(price: f64, currency_symbol: &str) -> String {
    format!("{currency_symbol}{price:.2}")
}

/// 一行的显示内容：名称、价格、库存、描述
pub fn product_row(product: &Product, currency_symbol: &str) -> [String; 4] {
    [
        product.name.clone(),
        format_price(product.price, currency_symbol),
        product.stock.to_string(),
        product.description.clone().unwrap_or_default(),
    ]
}

pub fn render_table(products: &[Product], currency_symbol: &str) -> String {
    let rows: Vec<[String; 5]> = products
        .iter()
        .map(|p| {
            let [name, price, stock, description] = product_row(p, currency_symbol);
            [p.id.to_string(), name, price, stock, description]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &HEADERS.map(String::from), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("-+-"));

    if rows.is_empty() {
        let _ = writeln!(out, "{EMPTY_PLACEHOLDER}");
    }
    for row in &rows {
        push_line(&mut out, row, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect();
    let _ = writeln!(out, "{}", padded.join(" | ").trim_end());
}

pub fn render_list(list: &ListState, currency_symbol: &str) -> String {
    match list {
        ListState::Idle => String::new(),
        ListState::Loading => format!("{LOADING}\n"),
        ListState::Loaded(products) => render_table(products, currency_symbol),
        ListState::Errored => String::new(),
    }
}

pub fn render_form(form: &FormState) -> String {
    match form {
        FormState::Closed => String::new(),
        FormState::Open { mode, form } => {
            let title = match mode {
                FormMode::Create => "Add Product".to_string(),
                FormMode::Edit(product) => format!("Edit Product #{}", product.id),
            };
            format!(
                "[{title}]\n  Name: {}\n  Price: {}\n  Stock: {}\n  Description: {}\n",
                form.name, form.price, form.stock, form.description
            )
        }
    }
}

/// 整个页面：标题、错误横幅、列表、打开的表单
pub fn render_page<G: ProductGateway>(page: &ProductPage<G>, currency_symbol: &str) -> String {
    let mut out = format!("{TITLE}\n\n");
    if let Some(banner) = page.banner() {
        let _ = writeln!(out, "! {banner}\n");
    }
    out.push_str(&render_list(page.list(), currency_symbol));
    let form = render_form(page.form());
    if !form.is_empty() {
        out.push('\n');
        out.push_str(&form);
    }
    out
}
