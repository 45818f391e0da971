//! Product command handlers.

use std::sync::Arc;

use tabled::Tabled;

use shopdesk_core::{Console, Product};

use crate::cli::{GlobalOpts, ProductsArgs, ProductsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ProductRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Stock")]
    stock: String,
}

impl ProductRow {
    fn new(p: &Arc<Product>) -> Self {
        let price = match p.sale_price {
            Some(sale) => format!("{} (was {})", util::money(sale), util::money(p.price)),
            None => util::money(p.price),
        };
        Self {
            id: p.id.to_string(),
            name: p.name.clone(),
            category: p.category.clone().unwrap_or_default(),
            price,
            stock: if p.in_stock() {
                p.stock.to_string()
            } else {
                "out of stock".into()
            },
        }
    }
}

fn by_name(p: &Product, raw: &str) -> bool {
    p.name.eq_ignore_ascii_case(raw)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    console: &Console,
    args: ProductsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let products = console.products();
    let snap = util::load(&products).await?;

    match args.command {
        ProductsCommand::List => {
            let out =
                output::render_list(&global.output, &snap, ProductRow::new, |p| p.id.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProductsCommand::Delete { product } => {
            let found = util::resolve(&products, &product, by_name)?;
            if !util::confirm(
                &format!("Delete product '{}'?", found.name),
                "products delete",
                global.yes,
            )? {
                return Ok(());
            }
            let outcome = products.delete(&found.id).await?;
            util::report(
                &outcome,
                &format!("Product '{}' deleted", found.name),
                global.quiet,
            );
            Ok(())
        }
    }
}
