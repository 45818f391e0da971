//! Banner command handlers.

use std::sync::Arc;

use tabled::Tabled;

use shopdesk_core::{Banner, Console, MutationOutcome, ResourceId};

use crate::cli::{BannerCreateArgs, BannersArgs, BannersCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct BannerRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Sale text")]
    salestext: String,
    #[tabled(rename = "Button")]
    button: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl BannerRow {
    fn new(b: &Arc<Banner>, color: bool) -> Self {
        Self {
            id: b.id.to_string(),
            title: b.title.clone(),
            salestext: b.salestext.clone(),
            button: if b.button_text.is_empty() {
                String::new()
            } else {
                format!("{} -> {}", b.button_text, b.button_link)
            },
            status: output::active_label(b.active, color),
        }
    }
}

fn draft(args: BannerCreateArgs) -> Banner {
    Banner {
        id: ResourceId::from("new"),
        title: args.title,
        salestext: args.salestext,
        description: args.description,
        button_text: args.button_text,
        button_link: args.button_link,
        image_url: args.image_url,
        active: !args.inactive,
    }
}

fn by_title(b: &Banner, raw: &str) -> bool {
    b.title.eq_ignore_ascii_case(raw)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    console: &Console,
    args: BannersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let banners = console.banners();
    let snap = util::load(&banners).await?;

    match args.command {
        BannersCommand::List => {
            let color = output::should_color(&global.color);
            let out = output::render_list(
                &global.output,
                &snap,
                |b| BannerRow::new(b, color),
                |b| b.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            output::notice(
                &format!("{} of {} banners active", banners.active_count(), snap.len()),
                global.quiet || !matches!(global.output, OutputFormat::Table),
            );
            Ok(())
        }

        BannersCommand::Create(args) => {
            let draft = draft(args);
            let title = draft.title.clone();
            let outcome = banners.create(draft).await?;
            let done = match &outcome {
                MutationOutcome::Committed(Some(stored)) => {
                    format!("Banner '{title}' created with id {}", stored.id)
                }
                _ => format!("Banner '{title}' created"),
            };
            util::report(&outcome, &done, global.quiet);
            Ok(())
        }

        BannersCommand::Toggle { banner } => {
            let found = util::resolve(&banners, &banner, by_title)?;
            let outcome = banners.toggle(&found.id).await?;
            let active = banners.get(&found.id).map_or(!found.active, |b| b.active);
            util::report(
                &outcome,
                &format!(
                    "Banner '{}' is now {}",
                    found.title,
                    if active { "shown" } else { "hidden" }
                ),
                global.quiet,
            );
            Ok(())
        }

        BannersCommand::Delete { banner } => {
            let found = util::resolve(&banners, &banner, by_title)?;
            if !util::confirm(
                &format!("Delete banner '{}'?", found.title),
                "banners delete",
                global.yes,
            )? {
                return Ok(());
            }
            let outcome = banners.delete(&found.id).await?;
            util::report(
                &outcome,
                &format!("Banner '{}' deleted", found.title),
                global.quiet,
            );
            Ok(())
        }
    }
}
