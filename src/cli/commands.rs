use std::{
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, bail};

use super::args::{
    Cli, Commands, CreateProductArgs, CreateWorkshopArgs, DiscountKindArg, DiscountsAction,
    GatewayAction, GatewayModeArg, ProductsAction, ProfileAction, WorkshopsAction,
};
use crate::{
    client::ApiClient,
    config::{AppConfig, GatewayMode},
    dto::upload::FileUpload,
    error::ClientError,
    models::{DiscountType, ProductStatus, ResourceId},
    screens::{
        Confirm, Navigation, Outcome,
        dashboard::DashboardScreen,
        discounts::DiscountScreen,
        gateway::{self, GatewayWizard, WizardStep},
        product_form::{ProductForm, merge_categories},
        products::ProductScreen,
        profile::ProfileEditor,
        workshops::WorkshopScreen,
    },
    services::payment_gateway::provider_for,
    session::{FileSessionStore, Session, SessionStore},
    validation::generate_discount_code,
};

const DEFAULT_SESSION_FILE: &str = ".craftconnect/session.json";

/// Asks on stdin unless `--yes` was given.
struct StdinConfirm {
    assume_yes: bool,
}

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        print!("{prompt} [y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}

fn confirmer(assume_yes: bool) -> Arc<dyn Confirm> {
    Arc::new(StdinConfirm { assume_yes })
}

pub async fn execute(cli: Cli, mut config: AppConfig) -> anyhow::Result<()> {
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }
    if let Some(mode) = cli.gateway_mode {
        config.gateway_mode = match mode {
            GatewayModeArg::Sandbox => GatewayMode::Sandbox,
            GatewayModeArg::Live => GatewayMode::Live,
        };
    }
    let session_file = cli
        .session_file
        .or_else(|| config.session_file.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE));
    let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(&session_file));
    let session = Session::open(store)
        .with_context(|| format!("failed to open session at {}", session_file.display()))?;
    let client = ApiClient::new(&config, session.clone())?;
    tracing::debug!(api = %client.base_url(), "client ready");

    let result = match cli.command {
        Commands::Login { email, password } => {
            client.login(&email, &password).await?;
            println!("Signed in as {email}");
            Ok(())
        }
        Commands::Logout => {
            client.logout()?;
            println!("Signed out");
            Ok(())
        }
        Commands::Products { action } => products(client, action).await,
        Commands::Discounts { action } => discounts(client, action).await,
        Commands::Workshops { action } => workshops(client, action).await,
        Commands::Profile { action } => profile(client, action).await,
        Commands::Gateway { action } => gateway_command(client, &config, action).await,
        Commands::Dashboard => dashboard(client, &config).await,
    };

    match result {
        Err(err) if err.downcast_ref::<ClientError>().is_some_and(ClientError::is_auth) => {
            bail!("{err}. Run `craftconnect-seller login` first.")
        }
        other => other,
    }
}

async fn products(client: ApiClient, action: ProductsAction) -> anyhow::Result<()> {
    match action {
        ProductsAction::List { featured } => {
            let screen = ProductScreen::new(client, confirmer(false));
            screen.load().await?;
            let items = if featured {
                screen.featured()
            } else {
                screen.products()
            };
            for p in items {
                println!(
                    "{:<38} {:<32} {:>10} stock={:<5} {:<9} {}",
                    p.id.map(|id| id.to_string()).unwrap_or_else(|| "-".into()),
                    p.name,
                    format_money(p.price),
                    p.stock_quantity,
                    p.status.as_str(),
                    if p.is_featured { "★ featured" } else { "" }
                );
            }
        }
        ProductsAction::Create(args) => {
            let mut form = product_form(args)?;
            let screen = ProductScreen::new(client, confirmer(false));
            let product = screen.create(&mut form).await?;
            println!(
                "Created {} ({})",
                product.name,
                product.id.map(|id| id.to_string()).unwrap_or_default()
            );
        }
        ProductsAction::Delete { id, confirm } => {
            let screen = ProductScreen::new(client, confirmer(confirm.yes));
            screen.load().await?;
            report(screen.delete(Some(&ResourceId::new(id))).await?, "Product deleted");
        }
        ProductsAction::Feature { id } => {
            let screen = ProductScreen::new(client, confirmer(false));
            screen.load().await?;
            let id = ResourceId::new(id);
            let outcome = screen.toggle_featured(Some(&id)).await?;
            let featured = screen
                .products()
                .iter()
                .any(|p| p.id.as_ref() == Some(&id) && p.is_featured);
            report(
                outcome,
                if featured {
                    "Product is now featured"
                } else {
                    "Product is no longer featured"
                },
            );
        }
        ProductsAction::Categories => {
            let server = match client.list_categories().await {
                Ok(categories) => categories,
                Err(err) if !err.is_auth() => {
                    tracing::warn!(error = %err, "category list unavailable, using fallback");
                    Vec::new()
                }
                Err(err) => return Err(err.into()),
            };
            for category in merge_categories(&server) {
                println!("{}", category.name);
            }
        }
    }
    Ok(())
}

fn product_form(args: CreateProductArgs) -> anyhow::Result<ProductForm> {
    let mut form = ProductForm::default();
    form.title = args.title;
    form.description = args.description;
    form.price = args.price;
    form.stock_quantity = args.stock;
    form.category = args.category;
    form.status = if args.publish {
        ProductStatus::Published
    } else {
        ProductStatus::Draft
    };
    for tag in &args.tags {
        form.add_tag(tag);
    }
    if let Some(path) = &args.image {
        let preview = form.set_main_image(read_upload(path)?)?;
        tracing::debug!(file = %preview.file_name, size = preview.size, "main image attached");
    }
    for path in &args.extra_images {
        form.add_additional_image(read_upload(path)?)?;
    }
    if let Some(path) = &args.video {
        form.set_video(read_upload(path)?)?;
    }
    Ok(form)
}

async fn discounts(client: ApiClient, action: DiscountsAction) -> anyhow::Result<()> {
    match action {
        DiscountsAction::List => {
            let screen = DiscountScreen::new(client, confirmer(false));
            screen.load().await?;
            for d in screen.discounts() {
                let value = match d.kind {
                    DiscountType::Percentage => format!("{}%", d.value),
                    DiscountType::Fixed => format!("₱{}", d.value),
                };
                println!(
                    "{:<38} {:<20} {:>6} uses={:<9} {:<8} expires={}",
                    d.id.map(|id| id.to_string()).unwrap_or_else(|| "-".into()),
                    d.code,
                    value,
                    match (d.remaining_uses, d.usage_limit) {
                        (Some(left), Some(limit)) => format!("{left}/{limit}"),
                        _ => "unlimited".to_string(),
                    },
                    if d.is_active { "active" } else { "disabled" },
                    d.expires_at
                        .map(|date| date.to_string())
                        .unwrap_or_else(|| "never".into())
                );
            }
        }
        DiscountsAction::Create {
            code,
            kind,
            value,
            usage_limit,
            expires,
        } => {
            let screen = DiscountScreen::new(client, confirmer(false));
            let clamped = screen.edit_form(|form| {
                match code {
                    Some(code) => form.set_code(&code),
                    None => {
                        form.generate_code();
                    }
                }
                form.kind = match kind {
                    DiscountKindArg::Percentage => DiscountType::Percentage,
                    DiscountKindArg::Fixed => DiscountType::Fixed,
                };
                form.usage_limit = usage_limit;
                form.expires_at = expires;
                form.set_value(value)
            });
            if i64::from(clamped) != value {
                println!("Discount value adjusted to {clamped}");
            }
            let created = screen.create().await?;
            println!("Created discount code {}", created.code);
        }
        DiscountsAction::Disable { id } => {
            let screen = DiscountScreen::new(client, confirmer(false));
            screen.load().await?;
            report(
                screen.disable(Some(&ResourceId::new(id))).await?,
                "Discount code disabled",
            );
        }
        DiscountsAction::Delete { id, confirm } => {
            let screen = DiscountScreen::new(client, confirmer(confirm.yes));
            screen.load().await?;
            report(
                screen.delete(Some(&ResourceId::new(id))).await?,
                "Discount code deleted",
            );
        }
        DiscountsAction::GenerateCode => {
            println!("{}", generate_discount_code(&mut rand::thread_rng()));
        }
    }
    Ok(())
}

async fn workshops(client: ApiClient, action: WorkshopsAction) -> anyhow::Result<()> {
    match action {
        WorkshopsAction::List => {
            let screen = WorkshopScreen::new(client, confirmer(false));
            screen.load().await?;
            for w in screen.workshops() {
                println!(
                    "{:<38} {:<32} {} {:<5} {:<12} seats={}",
                    w.id.map(|id| id.to_string()).unwrap_or_else(|| "-".into()),
                    w.title,
                    w.date,
                    w.time.unwrap_or_default(),
                    w.status.as_str(),
                    w.max_participants
                );
            }
        }
        WorkshopsAction::Create(args) => {
            let screen = WorkshopScreen::new(client, confirmer(false));
            fill_workshop_form(&screen, args)?;
            let created = screen.create().await?;
            println!(
                "Created workshop {} ({})",
                created.title,
                created.id.map(|id| id.to_string()).unwrap_or_default()
            );
        }
        WorkshopsAction::Delete { id, confirm } => {
            let screen = WorkshopScreen::new(client, confirmer(confirm.yes));
            screen.load().await?;
            report(
                screen.delete(Some(&ResourceId::new(id))).await?,
                "Workshop deleted",
            );
        }
    }
    Ok(())
}

fn fill_workshop_form(screen: &WorkshopScreen, args: CreateWorkshopArgs) -> anyhow::Result<()> {
    let image = args.image.as_deref().map(read_upload).transpose()?;
    screen.edit_form(|form| {
        form.title = args.title;
        form.description = args.description;
        form.location = args.location;
        form.date = Some(args.date);
        form.time = args.time;
        form.max_participants = args.max_participants;
        form.registration_link = args.registration_link.unwrap_or_default();
        match image {
            Some(image) => form.attach_image(image),
            None => Ok(()),
        }
    })?;
    Ok(())
}

async fn profile(client: ApiClient, action: ProfileAction) -> anyhow::Result<()> {
    let assume_yes = match &action {
        ProfileAction::Deactivate(confirm) | ProfileAction::Delete(confirm) => confirm.yes,
        _ => false,
    };
    let mut editor = ProfileEditor::new(client, confirmer(assume_yes));
    match action {
        ProfileAction::Show => {
            editor.load().await?;
            if let Some(p) = editor.profile() {
                println!("Name:     {}", p.user_name);
                println!("Email:    {}", p.user_email);
                println!(
                    "Birthday: {}",
                    p.birthday.map(|d| d.to_string()).unwrap_or_default()
                );
                println!("Contact:  {}", p.contact_number.as_deref().unwrap_or(""));
                println!("Address:  {}", p.address.as_deref().unwrap_or(""));
                println!("Role:     {}", p.role);
            }
        }
        ProfileAction::Update {
            name,
            email,
            birthday,
            contact,
            address,
        } => {
            editor.load().await?;
            editor.begin_edit()?;
            editor.edit(|draft| {
                if let Some(name) = name {
                    draft.user_name = name;
                }
                if let Some(email) = email {
                    draft.user_email = email;
                }
                if birthday.is_some() {
                    draft.birthday = birthday;
                }
                if let Some(contact) = contact {
                    draft.contact_number = Some(contact);
                }
                if let Some(address) = address {
                    draft.address = Some(address);
                }
            })?;
            report(editor.save().await?, "Profile updated");
        }
        ProfileAction::Deactivate(_) => {
            if editor.deactivate().await? == Navigation::Login {
                println!("Account deactivated. Sign in again to reactivate it.");
            }
        }
        ProfileAction::Delete(_) => {
            if editor.delete_account().await? == Navigation::Login {
                println!("Account deleted.");
            }
        }
    }
    Ok(())
}

async fn gateway_command(
    client: ApiClient,
    config: &AppConfig,
    action: GatewayAction,
) -> anyhow::Result<()> {
    let session = client.session().clone();
    match action {
        GatewayAction::Connect {
            gateway: id,
            phone,
            otp,
        } => {
            let provider = provider_for(config.gateway_mode, &client);
            let mut wizard = GatewayWizard::new(id, provider, session);
            wizard.submit_phone(&phone).await?;
            println!("An OTP was sent to {phone}.");
            let otp = match otp {
                Some(otp) => otp,
                None => loop {
                    let entered = prompt("Enter the 6-digit OTP (blank to resend): ")?;
                    if !entered.is_empty() {
                        break entered;
                    }
                    wizard.resend_otp().await?;
                    println!("A new OTP was sent to {phone}.");
                },
            };
            if let WizardStep::Success { connection } = wizard.submit_otp(&otp).await? {
                println!(
                    "{} connected for {}",
                    connection.gateway.display_name(),
                    connection.phone
                );
            }
        }
        GatewayAction::Disconnect { gateway: id } => {
            if gateway::disconnect(&session, id)? {
                println!("{} disconnected", id.display_name());
            } else {
                println!("{} was not connected", id.display_name());
            }
        }
        GatewayAction::Status => {
            for id in crate::models::GatewayId::ALL {
                match session.gateway(id) {
                    Some(c) if c.connected => println!(
                        "{:<8} connected  {} since {}",
                        id.display_name(),
                        c.phone,
                        c.connected_at.format("%Y-%m-%d %H:%M")
                    ),
                    _ => println!("{:<8} not connected", id.display_name()),
                }
            }
        }
    }
    Ok(())
}

async fn dashboard(client: ApiClient, config: &AppConfig) -> anyhow::Result<()> {
    let mut screen = DashboardScreen::new(client, config.commission_rate);
    let summary = screen.load().await?;
    if summary.estimated {
        println!(
            "(estimated from orders at {:.1}% commission)",
            config.commission_rate * 100.0
        );
    }
    println!("Orders:      {}", summary.total_orders);
    println!("Revenue:     {}", format_money(summary.total_revenue));
    println!("Commission:  {}", format_money(summary.total_commission));
    println!("Net:         {}", format_money(summary.net_earnings));
    for row in &summary.payment_methods {
        println!(
            "  {:<10} {:>12} ({} orders)",
            row.method,
            format_money(row.total),
            row.count
        );
    }
    Ok(())
}

fn report(outcome: Outcome, changed: &str) {
    match outcome {
        Outcome::Changed => println!("{changed}"),
        Outcome::Unchanged => println!("Nothing changed"),
    }
}

fn prompt(label: &str) -> anyhow::Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn format_money(centavos: i64) -> String {
    let sign = if centavos < 0 { "-" } else { "" };
    let abs = centavos.unsigned_abs();
    format!("{sign}₱{}.{:02}", abs / 100, abs % 100)
}

fn read_upload(path: &Path) -> anyhow::Result<FileUpload> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    Ok(FileUpload::new(file_name, mime_for(path), bytes))
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        _ => "application/octet-stream",
    }
}
