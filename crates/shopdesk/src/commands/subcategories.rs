//! Subcategory command handlers.

use std::sync::Arc;

use tabled::Tabled;

use shopdesk_core::{Console, Subcategory};

use crate::cli::{GlobalOpts, SubcategoriesArgs, SubcategoriesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct SubcategoryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
}

pub async fn handle(
    console: &Console,
    args: SubcategoriesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let subcategories = console.subcategories();
    let snap = util::load(&subcategories).await?;

    match args.command {
        SubcategoriesCommand::List => {
            let color = output::should_color(&global.color);
            let out = output::render_list(
                &global.output,
                &snap,
                |s: &Arc<Subcategory>| SubcategoryRow {
                    id: s.id.to_string(),
                    name: s.name.clone(),
                    status: output::active_label(s.active, color),
                },
                |s| s.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SubcategoriesCommand::Toggle { subcategory } => {
            let found = util::resolve(&subcategories, &subcategory, |s, raw| {
                s.name.eq_ignore_ascii_case(raw)
            })?;
            let outcome = subcategories.toggle(&found.id).await?;
            let active = subcategories
                .get(&found.id)
                .map_or(!found.active, |s| s.active);
            util::report(
                &outcome,
                &format!(
                    "Subcategory '{}' is now {}",
                    found.name,
                    output::active_label(active, false)
                ),
                global.quiet,
            );
            Ok(())
        }
    }
}
