//! Coupon command handlers.

use std::sync::Arc;

use tabled::Tabled;

use shopdesk_core::{Console, Coupon};

use crate::cli::{CouponsArgs, CouponsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct CouponRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Discount")]
    discount: String,
    #[tabled(rename = "Min order")]
    min_order: String,
    #[tabled(rename = "Expires")]
    expires: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl CouponRow {
    fn new(c: &Arc<Coupon>, color: bool) -> Self {
        Self {
            id: c.id.to_string(),
            code: c.code.clone(),
            discount: c.discount_label(),
            min_order: c.min_order_amount.map(util::money).unwrap_or_default(),
            expires: c.expiry_date.clone().unwrap_or_else(|| "-".into()),
            status: output::active_label(c.active, color),
        }
    }
}

fn by_code(c: &Coupon, raw: &str) -> bool {
    c.code.eq_ignore_ascii_case(raw)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    console: &Console,
    args: CouponsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let coupons = console.coupons();
    let snap = util::load(&coupons).await?;

    match args.command {
        CouponsCommand::List => {
            let color = output::should_color(&global.color);
            let out = output::render_list(
                &global.output,
                &snap,
                |c| CouponRow::new(c, color),
                |c| c.code.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CouponsCommand::Toggle { coupon } => {
            let found = util::resolve(&coupons, &coupon, by_code)?;
            let outcome = coupons.toggle(&found.id).await?;
            let active = coupons.get(&found.id).map_or(!found.active, |c| c.active);
            util::report(
                &outcome,
                &format!(
                    "Coupon {} is now {}",
                    found.code,
                    output::active_label(active, false)
                ),
                global.quiet,
            );
            Ok(())
        }

        CouponsCommand::Delete { coupon } => {
            let found = util::resolve(&coupons, &coupon, by_code)?;
            if !util::confirm(
                &format!("Delete coupon {}?", found.code),
                "coupons delete",
                global.yes,
            )? {
                return Ok(());
            }
            let outcome = coupons.delete(&found.id).await?;
            util::report(
                &outcome,
                &format!("Coupon {} deleted", found.code),
                global.quiet,
            );
            Ok(())
        }
    }
}
