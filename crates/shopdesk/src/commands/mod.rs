//! Command dispatch: bridges CLI args -> console views -> output formatting.

pub mod auth;
pub mod banners;
pub mod categories;
pub mod config_cmd;
pub mod coupons;
pub mod customers;
pub mod orders;
pub mod products;
pub mod subcategories;
pub mod util;

use shopdesk_core::Console;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a console-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, console: &Console, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Orders(args) => orders::handle(console, args, global).await,
        Command::Customers(args) => customers::handle(console, args, global).await,
        Command::Banners(args) => banners::handle(console, args, global).await,
        Command::Categories(args) => categories::handle(console, args, global).await,
        Command::Subcategories(args) => subcategories::handle(console, args, global).await,
        Command::Coupons(args) => coupons::handle(console, args, global).await,
        Command::Products(args) => products::handle(console, args, global).await,
        Command::Logout => auth::logout(console, global).await,
        // Config, Login and Completions are handled before dispatch
        Command::Config(_) | Command::Login(_) | Command::Completions(_) => unreachable!(),
    }
}
