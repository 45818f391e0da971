//! Clap derive structures for the `shopdesk` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use shopdesk_core::OrderStatus;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// shopdesk -- admin console for the shop backend
#[derive(Debug, Parser)]
#[command(
    name = "shopdesk",
    version,
    about = "Manage shop orders, customers, and storefront content from the command line",
    long_about = "An admin console for the shop backend.\n\n\
        Lists and watches orders, toggles customer accounts, and manages\n\
        banners, categories, coupons, and products. Changes are applied\n\
        optimistically and rolled back if the backend rejects them.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "SHOPDESK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend base URL (overrides profile)
    #[arg(long, short = 'u', env = "SHOPDESK_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Bearer token (overrides keyring and profile)
    #[arg(long, env = "SHOPDESK_TOKEN", global = true, hide_env = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SHOPDESK_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "SHOPDESK_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "SHOPDESK_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one id per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List, inspect, and watch incoming orders
    #[command(alias = "o")]
    Orders(OrdersArgs),

    /// List customers and activate or deactivate accounts
    #[command(alias = "cust")]
    Customers(CustomersArgs),

    /// Manage storefront banners
    Banners(BannersArgs),

    /// Manage product categories
    #[command(alias = "cat")]
    Categories(CategoriesArgs),

    /// List and toggle subcategories
    #[command(alias = "sub")]
    Subcategories(SubcategoriesArgs),

    /// Manage discount coupons
    Coupons(CouponsArgs),

    /// List and remove products
    #[command(alias = "prod")]
    Products(ProductsArgs),

    /// Log in and store the session token
    Login(LoginArgs),

    /// End the backend session and forget the stored token
    Logout,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Orders ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct OrdersArgs {
    #[command(subcommand)]
    pub command: OrdersCommand,
}

#[derive(Debug, Args)]
pub struct OrderFilterArgs {
    /// Only orders in this status (e.g. pending, shipped, out-for-delivery)
    #[arg(long, short = 's')]
    pub status: Option<OrderStatus>,

    /// Case-insensitive match on customer name or order id
    #[arg(long, short = 'f')]
    pub search: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum OrdersCommand {
    /// List orders
    #[command(alias = "ls")]
    List(OrderFilterArgs),

    /// Show one order
    Get {
        /// Order id
        order: String,
    },

    /// Poll for new orders and print them as they arrive
    Watch {
        #[command(flatten)]
        filter: OrderFilterArgs,

        /// Poll interval, e.g. "30s" or "2m" (overrides profile)
        #[arg(long, short = 'i', value_parser = parse_interval)]
        interval: Option<std::time::Duration>,
    },
}

fn parse_interval(raw: &str) -> Result<std::time::Duration, String> {
    shopdesk_config::parse_poll_interval(raw).map_err(|e| e.to_string())
}

// ── Customers ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CustomersArgs {
    #[command(subcommand)]
    pub command: CustomersCommand,
}

#[derive(Debug, Subcommand)]
pub enum CustomersCommand {
    /// List customers (admin accounts are hidden)
    #[command(alias = "ls")]
    List,

    /// Show one customer
    Get {
        /// Customer id or email
        customer: String,
    },

    /// Flip a customer between active and inactive
    Toggle {
        /// Customer id or email
        customer: String,
    },
}

// ── Banners ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct BannersArgs {
    #[command(subcommand)]
    pub command: BannersCommand,
}

#[derive(Debug, Subcommand)]
pub enum BannersCommand {
    /// List banners
    #[command(alias = "ls")]
    List,

    /// Add a banner
    #[command(alias = "add")]
    Create(BannerCreateArgs),

    /// Show or hide a banner on the storefront
    Toggle {
        /// Banner id
        banner: String,
    },

    /// Delete a banner
    #[command(alias = "rm")]
    Delete {
        /// Banner id
        banner: String,
    },
}

#[derive(Debug, Args)]
pub struct BannerCreateArgs {
    /// Banner title (required)
    #[arg(long)]
    pub title: String,

    /// Discount headline shown above the title
    #[arg(long, default_value = "")]
    pub salestext: String,

    #[arg(long, default_value = "")]
    pub description: String,

    /// Call-to-action label
    #[arg(long, default_value = "")]
    pub button_text: String,

    /// Call-to-action target
    #[arg(long, default_value = "")]
    pub button_link: String,

    /// Already-hosted image URL
    #[arg(long, default_value = "")]
    pub image_url: String,

    /// Create the banner hidden
    #[arg(long)]
    pub inactive: bool,
}

// ── Categories ───────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CategoriesArgs {
    #[command(subcommand)]
    pub command: CategoriesCommand,
}

#[derive(Debug, Subcommand)]
pub enum CategoriesCommand {
    /// List categories
    #[command(alias = "ls")]
    List,

    /// Enable or disable a category
    Toggle {
        /// Category id or name
        category: String,
    },

    /// Delete a category
    #[command(alias = "rm")]
    Delete {
        /// Category id or name
        category: String,
    },
}

// ── Subcategories ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SubcategoriesArgs {
    #[command(subcommand)]
    pub command: SubcategoriesCommand,
}

#[derive(Debug, Subcommand)]
pub enum SubcategoriesCommand {
    /// List subcategories
    #[command(alias = "ls")]
    List,

    /// Enable or disable a subcategory
    Toggle {
        /// Subcategory id or name
        subcategory: String,
    },
}

// ── Coupons ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CouponsArgs {
    #[command(subcommand)]
    pub command: CouponsCommand,
}

#[derive(Debug, Subcommand)]
pub enum CouponsCommand {
    /// List coupons
    #[command(alias = "ls")]
    List,

    /// Activate or deactivate a coupon
    Toggle {
        /// Coupon id or code
        coupon: String,
    },

    /// Delete a coupon
    #[command(alias = "rm")]
    Delete {
        /// Coupon id or code
        coupon: String,
    },
}

// ── Products ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub command: ProductsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProductsCommand {
    /// List products
    #[command(alias = "ls")]
    List,

    /// Delete a product
    #[command(alias = "rm")]
    Delete {
        /// Product id
        product: String,
    },
}

// ── Auth ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Admin email (defaults to the profile's email, then prompts)
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Read the password from stdin instead of prompting
    #[arg(long)]
    pub password_stdin: bool,

    /// Keep the token in the config file instead of the system keyring
    #[arg(long)]
    pub plaintext: bool,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive configuration wizard
    Init,

    /// Show the current configuration (secrets masked)
    Show,

    /// Store a bearer token for the active profile in the system keyring
    SetToken {
        /// Token value (prompted when omitted)
        token: Option<String>,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn order_status_accepts_kebab_case() {
        let cli = Cli::try_parse_from([
            "shopdesk",
            "orders",
            "list",
            "--status",
            "out-for-delivery",
        ])
        .unwrap();
        let Command::Orders(OrdersArgs {
            command: OrdersCommand::List(filter),
        }) = cli.command
        else {
            panic!("expected orders list");
        };
        assert_eq!(filter.status, Some(OrderStatus::OutForDelivery));
    }

    #[test]
    fn banner_create_requires_title() {
        let err = Cli::try_parse_from(["shopdesk", "banners", "create"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);

        let cli = Cli::try_parse_from([
            "shopdesk", "banners", "add", "--title", "Eid sale", "--inactive",
        ])
        .unwrap();
        let Command::Banners(BannersArgs {
            command: BannersCommand::Create(args),
        }) = cli.command
        else {
            panic!("expected banners create");
        };
        assert_eq!(args.title, "Eid sale");
        assert!(args.inactive);
        assert_eq!(args.salestext, "");
    }

    #[test]
    fn watch_rejects_zero_interval() {
        let err = Cli::try_parse_from(["shopdesk", "orders", "watch", "--interval", "0s"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }
}
