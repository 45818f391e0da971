//! Customer command handlers.

use std::sync::Arc;

use tabled::Tabled;

use shopdesk_core::{Console, Customer, CustomerStatus};

use crate::cli::{CustomersArgs, CustomersCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct CustomerRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "City")]
    city: String,
    #[tabled(rename = "Orders")]
    orders: u32,
    #[tabled(rename = "Status")]
    status: String,
}

impl CustomerRow {
    fn new(c: &Arc<Customer>, color: bool) -> Self {
        Self {
            id: c.id.to_string(),
            name: c.display_name(),
            email: c.email.clone(),
            phone: c.phone_or_default().to_owned(),
            city: c.shipping_address().city,
            orders: c.orders,
            status: output::active_label(c.status == CustomerStatus::Active, color),
        }
    }
}

fn detail(c: &Arc<Customer>) -> String {
    [
        format!("ID:        {}", c.id),
        format!("Name:      {}", c.display_name()),
        format!("Email:     {}", c.email),
        format!("Phone:     {}", c.phone_or_default()),
        format!("Ship to:   {}", c.shipping_address().summary()),
        format!("Orders:    {}", c.orders),
        format!("Status:    {}", c.status),
    ]
    .join("\n")
}

fn by_email(c: &Customer, raw: &str) -> bool {
    c.email.eq_ignore_ascii_case(raw)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    console: &Console,
    args: CustomersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let customers = console.customers();
    let snap = util::load(&customers).await?;

    match args.command {
        CustomersCommand::List => {
            let color = output::should_color(&global.color);
            let out = output::render_list(
                &global.output,
                &snap,
                |c| CustomerRow::new(c, color),
                |c| c.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CustomersCommand::Get { customer } => {
            let found = util::resolve(&customers, &customer, by_email)?;
            let out = output::render_single(&global.output, &found, detail, |c| c.id.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CustomersCommand::Toggle { customer } => {
            let found = util::resolve(&customers, &customer, by_email)?;
            let outcome = customers.toggle_status(&found.id).await?;
            let status = customers
                .get(&found.id)
                .map_or_else(|| found.status.toggled(), |c| c.status);
            util::report(
                &outcome,
                &format!("Customer {} is now {status}", found.display_name()),
                global.quiet,
            );
            Ok(())
        }
    }
}
