use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::models::GatewayId;

/// CraftConnect seller dashboard
#[derive(Parser, Debug)]
#[command(name = "craftconnect-seller")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Seller API base URL
    #[arg(long, global = true, env = "CRAFTCONNECT_API_URL")]
    pub api_url: Option<String>,

    /// Where the session token and gateway flags are kept
    #[arg(long, global = true, env = "CRAFTCONNECT_SESSION_FILE")]
    pub session_file: Option<PathBuf>,

    /// Payment gateway provider
    #[arg(long, global = true, value_enum, env = "CRAFTCONNECT_GATEWAY_MODE")]
    pub gateway_mode: Option<GatewayModeArg>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GatewayModeArg {
    Sandbox,
    Live,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and store the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "CRAFTCONNECT_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the session token and gateway connections
    Logout,

    /// Manage products and featured flags
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },

    /// Manage discount codes
    Discounts {
        #[command(subcommand)]
        action: DiscountsAction,
    },

    /// Manage workshops and events
    Workshops {
        #[command(subcommand)]
        action: WorkshopsAction,
    },

    /// View and edit the seller profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Connect payment gateways
    Gateway {
        #[command(subcommand)]
        action: GatewayAction,
    },

    /// Revenue, commission and payment method summary
    Dashboard,
}

#[derive(Args, Debug)]
pub struct ConfirmArgs {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Subcommand, Debug)]
pub enum ProductsAction {
    /// List products
    List {
        /// Only featured products
        #[arg(long)]
        featured: bool,
    },
    /// Create a product
    Create(CreateProductArgs),
    /// Delete a product
    Delete {
        id: String,
        #[command(flatten)]
        confirm: ConfirmArgs,
    },
    /// Toggle the featured flag
    Feature { id: String },
    /// List categories available to products
    Categories,
}

#[derive(Args, Debug)]
pub struct CreateProductArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long, default_value = "")]
    pub description: String,
    /// Price in centavos
    #[arg(long)]
    pub price: i64,
    #[arg(long, default_value_t = 0)]
    pub stock: i64,
    #[arg(long, default_value = "")]
    pub category: String,
    /// Repeat for several tags
    #[arg(long = "tag")]
    pub tags: Vec<String>,
    #[arg(long)]
    pub publish: bool,
    #[arg(long)]
    pub image: Option<PathBuf>,
    /// Repeat for up to five additional images
    #[arg(long = "extra-image")]
    pub extra_images: Vec<PathBuf>,
    #[arg(long)]
    pub video: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DiscountKindArg {
    Percentage,
    Fixed,
}

#[derive(Subcommand, Debug)]
pub enum DiscountsAction {
    /// List discount codes
    List,
    /// Create a discount code
    Create {
        /// Generated when omitted
        #[arg(long)]
        code: Option<String>,
        #[arg(long = "type", value_enum, default_value = "percentage")]
        kind: DiscountKindArg,
        /// Clamped to 1..=100
        #[arg(long, allow_negative_numbers = true)]
        value: i64,
        #[arg(long)]
        usage_limit: Option<u32>,
        /// YYYY-MM-DD
        #[arg(long)]
        expires: Option<NaiveDate>,
    },
    /// Disable a discount code without deleting it
    Disable { id: String },
    /// Delete a discount code
    Delete {
        id: String,
        #[command(flatten)]
        confirm: ConfirmArgs,
    },
    /// Print a random candidate code
    GenerateCode,
}

#[derive(Subcommand, Debug)]
pub enum WorkshopsAction {
    /// List workshops
    List,
    /// Create a workshop
    Create(CreateWorkshopArgs),
    /// Delete a workshop
    Delete {
        id: String,
        #[command(flatten)]
        confirm: ConfirmArgs,
    },
}

#[derive(Args, Debug)]
pub struct CreateWorkshopArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long)]
    pub location: String,
    /// YYYY-MM-DD
    #[arg(long)]
    pub date: NaiveDate,
    /// HH:MM
    #[arg(long, default_value = "")]
    pub time: String,
    #[arg(long, default_value_t = 10)]
    pub max_participants: u32,
    #[arg(long)]
    pub registration_link: Option<String>,
    #[arg(long)]
    pub image: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum ProfileAction {
    /// Show the profile
    Show,
    /// Update profile fields
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// YYYY-MM-DD
        #[arg(long)]
        birthday: Option<NaiveDate>,
        #[arg(long)]
        contact: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },
    /// Deactivate the account
    Deactivate(ConfirmArgs),
    /// Permanently delete the account
    Delete(ConfirmArgs),
}

#[derive(Subcommand, Debug)]
pub enum GatewayAction {
    /// Connect a gateway through the phone + OTP flow
    Connect {
        gateway: GatewayId,
        #[arg(long)]
        phone: String,
        /// Prompted for when omitted
        #[arg(long)]
        otp: Option<String>,
    },
    /// Remove a stored gateway connection
    Disconnect { gateway: GatewayId },
    /// Show stored gateway connections
    Status,
}
