//! 产品管理终端客户端
//!
//! 命令：add、edit <id>、delete <id>、refresh、help、quit

use std::io::{self, BufRead, Write};

use product_catalog::client::render::{render_page, LOADING};
use product_catalog::client::{
    DeleteOutcome, ListState, ProductApi, ProductGateway, ProductPage, SubmitOutcome,
};
use product_catalog::infrastructure::config;
use product_catalog::infrastructure::logger::Logger;
use product_catalog::ProductId;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let source = config::find_config_file();
    let config = config::load_config(source)?;
    let mut logging = config.logging.clone();
    logging.console_output = false;
    let _log_guard = Logger::init(&logging)?;
    if let Some(path) = source {
        info!("Loaded configuration from {}", path.display());
    }

    let api = ProductApi::from_config(&config.client)?;
    let currency = config.client.currency_symbol.clone();
    println!("Connecting to {}", api.base_url());

    let mut page = ProductPage::new(api).on_list_change(|state| {
        if *state == ListState::Loading {
            println!("{LOADING}");
        }
    });
    page.mount().await;
    println!("{}", render_page(&page, &currency));
    print_help();

    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        let Some(line) = prompt(&mut input, "> ")? else {
            break;
        };
        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or_default();
        let argument = parts.next();

        match command {
            "" => continue,
            "add" => {
                page.open_create();
                edit_form(&mut page, &mut input, &currency).await?;
            }
            "edit" => match parse_id(argument) {
                Some(id) if page.open_edit(id) => {
                    edit_form(&mut page, &mut input, &currency).await?;
                }
                Some(id) => println!("Product {id} is not in the list"),
                None => println!("Usage: edit <id>"),
            },
            "delete" => match parse_id(argument) {
                Some(id) => {
                    let outcome = page
                        .delete(id, |question| confirm(&mut input, question).unwrap_or(false))
                        .await;
                    if outcome == DeleteOutcome::Cancelled {
                        println!("Delete cancelled");
                    }
                }
                None => println!("Usage: delete <id>"),
            },
            "refresh" => page.refresh().await,
            "help" => {
                print_help();
                continue;
            }
            "quit" | "exit" => break,
            other => {
                println!("Unknown command: {other}");
                continue;
            }
        }

        println!("{}", render_page(&page, &currency));
    }

    Ok(())
}

/// 逐项填写表单后提交；提交失败时表单保持打开，可以修改后重试或放弃
async fn edit_form<G: ProductGateway>(
    page: &mut ProductPage<G>,
    input: &mut impl BufRead,
    currency: &str,
) -> anyhow::Result<()> {
    loop {
        println!("{}", render_page(page, currency));
        println!("Press Enter to keep a value.");

        let Some(mut form) = page.form_mut().map(|form| form.clone()) else {
            return Ok(());
        };
        for (label, value) in [
            ("Name", &mut form.name),
            ("Price", &mut form.price),
            ("Stock", &mut form.stock),
            ("Description", &mut form.description),
        ] {
            let Some(entered) = prompt(input, &format!("{label} [{value}]: "))? else {
                page.close_form();
                return Ok(());
            };
            if !entered.is_empty() {
                *value = entered;
            }
        }
        if let Some(open) = page.form_mut() {
            *open = form;
        }

        match page.submit().await {
            SubmitOutcome::Saved(product) => {
                println!("Saved product #{}", product.id);
                return Ok(());
            }
            SubmitOutcome::Incomplete(fields) => {
                println!("Please fill in: {}", fields.join(", "));
            }
            SubmitOutcome::Failed | SubmitOutcome::NotOpen => {}
        }

        if !confirm(input, "Keep editing?")? {
            page.close_form();
            return Ok(());
        }
    }
}

fn prompt(input: &mut impl BufRead, text: &str) -> io::Result<Option<String>> {
    print!("{text}");
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn confirm(input: &mut impl BufRead, question: &str) -> io::Result<bool> {
    let answer = prompt(input, &format!("{question} [y/N] "))?;
    Ok(matches!(answer.as_deref(), Some("y" | "Y" | "yes")))
}

fn parse_id(argument: Option<&str>) -> Option<ProductId> {
    argument.and_then(|a| a.trim_start_matches('#').parse().ok())
}

fn print_help() {
    println!("Commands:");
    println!("  add          - add a product");
    println!("  edit <id>    - edit a product");
    println!("  delete <id>  - delete a product");
    println!("  refresh      - reload the list");
    println!("  quit         - exit");
}
