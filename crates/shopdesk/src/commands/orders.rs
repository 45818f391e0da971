//! Order command handlers, including the live `watch` loop.

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tabled::Tabled;
use tokio::sync::{broadcast::error::RecvError, mpsc};

use shopdesk_core::{Console, CoreError, Order, OrderAlerts, OrderFilter, OrdersView};

use crate::cli::{GlobalOpts, OrderFilterArgs, OrdersArgs, OrdersCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct OrderRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Customer")]
    customer: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Items")]
    items: u32,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Payment")]
    payment: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Arc<Order>> for OrderRow {
    fn from(o: &Arc<Order>) -> Self {
        Self {
            id: o.id.to_string(),
            customer: o.customer.clone(),
            date: o.date.clone(),
            items: o.items,
            total: util::money(o.total),
            payment: o.payment_method.to_string(),
            status: o.status.to_string(),
        }
    }
}

fn detail(o: &Arc<Order>) -> String {
    let mut lines = vec![
        format!("ID:        {}", o.id),
        format!("Customer:  {}", o.customer),
        format!("Date:      {}", o.date),
        format!("Items:     {}", o.items),
        format!("Total:     {}", util::money(o.total)),
        format!("Payment:   {}", o.payment_method),
        format!("Status:    {}", o.status),
    ];
    if !o.reference_number.is_empty() {
        lines.push(format!("Reference: {}", o.reference_number));
    }
    lines.join("\n")
}

fn to_filter(args: &OrderFilterArgs) -> OrderFilter {
    let mut filter = OrderFilter::default();
    if let Some(status) = args.status {
        filter = filter.status(status);
    }
    if let Some(query) = &args.search {
        filter = filter.query(query.clone());
    }
    filter
}

fn render(orders: &[Arc<Order>], global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_list(
        &global.output,
        orders,
        |o| OrderRow::from(o),
        |o| o.id.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    console: &Console,
    args: OrdersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let orders = console.orders();

    match args.command {
        OrdersCommand::List(filter) => {
            util::load(&orders).await?;
            render(&orders.filtered(&to_filter(&filter)), global)
        }

        OrdersCommand::Get { order } => {
            util::load(&orders).await?;
            let found = util::resolve(&orders, &order, |o, raw| {
                !o.reference_number.is_empty() && o.reference_number == raw
            })?;
            let out = output::render_single(&global.output, &found, detail, |o| o.id.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        OrdersCommand::Watch { filter, interval } => {
            watch(&orders, &to_filter(&filter), interval, global).await
        }
    }
}

// ── Watch ───────────────────────────────────────────────────────────

/// Print the current orders, then every new arrival until Ctrl-C.
///
/// The first load only primes the arrival baseline, so existing orders are
/// never announced as new. An expired session ends the watch.
async fn watch(
    orders: &OrdersView,
    filter: &OrderFilter,
    interval: Option<Duration>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    let mut arrivals = orders.new_arrivals();

    util::load(orders).await?;
    render(&orders.filtered(filter), global)?;

    let (err_tx, mut err_rx) = mpsc::unbounded_channel::<CoreError>();
    let on_result = move |result: Result<Vec<Arc<Order>>, CoreError>| {
        if let Err(err) = result {
            let _ = err_tx.send(err);
        }
    };
    match interval {
        Some(every) => orders.start_polling_every(every, on_result),
        None => orders.start_polling(on_result),
    }
    output::notice("Watching for new orders (Ctrl-C to stop)", global.quiet);

    let mut alerts = OrderAlerts::new();
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let result = loop {
        tokio::select! {
            _ = &mut shutdown => break Ok(()),

            batch = arrivals.recv() => match batch {
                Ok(batch) => {
                    alerts.record(&filter.apply(&batch));
                    if let Some(text) = alerts.headline() {
                        let text = format!(
                            "[{}] {text} | {} orders total",
                            refreshed_at(orders),
                            orders.store().len()
                        );
                        output::notice(&output::headline(&text, color), global.quiet);
                        if let Err(err) = render(&alerts.acknowledge(), global) {
                            break Err(err);
                        }
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "missed new-order notifications");
                }
                Err(RecvError::Closed) => break Ok(()),
            },

            Some(err) = err_rx.recv() => {
                if matches!(err.root_cause(), CoreError::SessionExpired) {
                    break Err(CliError::SessionExpired);
                }
                output::notice(&format!("{err}; retrying"), global.quiet);
            }
        }
    };

    orders.stop_polling();
    result
}

/// Local wall-clock time of the last successful poll.
fn refreshed_at(orders: &OrdersView) -> String {
    orders
        .store()
        .last_refresh()
        .map_or_else(Local::now, |at| at.with_timezone(&Local))
        .format("%H:%M:%S")
        .to_string()
}
