//! Category command handlers.

use std::sync::Arc;

use tabled::Tabled;

use shopdesk_core::{Category, Console};

use crate::cli::{CategoriesArgs, CategoriesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Subcategories")]
    subcategories: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl CategoryRow {
    fn new(c: &Arc<Category>, color: bool) -> Self {
        Self {
            id: c.id.to_string(),
            name: c.name.clone(),
            subcategories: c
                .subcategories
                .iter()
                .map(|s| s.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            status: output::active_label(c.active, color),
        }
    }
}

fn by_name(c: &Category, raw: &str) -> bool {
    c.name.eq_ignore_ascii_case(raw) || c.slug.as_deref() == Some(raw)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    console: &Console,
    args: CategoriesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let categories = console.categories();
    let snap = util::load(&categories).await?;

    match args.command {
        CategoriesCommand::List => {
            let color = output::should_color(&global.color);
            let out = output::render_list(
                &global.output,
                &snap,
                |c| CategoryRow::new(c, color),
                |c| c.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CategoriesCommand::Toggle { category } => {
            let found = util::resolve(&categories, &category, by_name)?;
            let outcome = categories.toggle(&found.id).await?;
            let active = categories.get(&found.id).map_or(!found.active, |c| c.active);
            util::report(
                &outcome,
                &format!(
                    "Category '{}' is now {}",
                    found.name,
                    output::active_label(active, false)
                ),
                global.quiet,
            );
            Ok(())
        }

        CategoriesCommand::Delete { category } => {
            let found = util::resolve(&categories, &category, by_name)?;
            let prompt = if found.subcategories.is_empty() {
                format!("Delete category '{}'?", found.name)
            } else {
                format!(
                    "Delete category '{}' and its {} subcategories?",
                    found.name,
                    found.subcategories.len()
                )
            };
            if !util::confirm(&prompt, "categories delete", global.yes)? {
                return Ok(());
            }
            let outcome = categories.delete(&found.id).await?;
            util::report(
                &outcome,
                &format!("Category '{}' deleted", found.name),
                global.quiet,
            );
            Ok(())
        }
    }
}
