//! CLI administration tool for short-url-manager.
//!
//! Manages API keys and short URL metadata directly against the database.
//!
//! # Usage
//!
//! ```bash
//! # Create a new API key (restricted keys only see their own short URLs)
//! cargo run --bin admin -- api-key create --name "Marketing" --restricted
//!
//! # List and revoke API keys
//! cargo run --bin admin -- api-key list
//! cargo run --bin admin -- api-key revoke "Marketing"
//!
//! # List short URLs, optionally as seen by an API key
//! cargo run --bin admin -- short-url list --search promo --tag summer --order-by longUrl-DESC
//! cargo run --bin admin -- short-url list --api-key <KEY> --all
//!
//! # Replace the tags of a short URL
//! cargo run --bin admin -- short-url tags abc123 summer promo
//!
//! # Edit short URL metadata
//! cargo run --bin admin -- short-url edit abc123 --long-url https://example.com --validate-url
//! cargo run --bin admin -- short-url edit abc123 --clear-max-visits
//!
//! # Database tools
//! cargo run --bin admin -- db check
//! cargo run --bin admin -- db migrate
//! ```
//!
//! # Environment Variables
//!
//! See [`short_url_manager::config`]. `DATABASE_URL` and `TOKEN_SIGNING_SECRET`
//! are required.

use short_url_manager::application::services::{
    AuthService, ScopedShortUrlResolver, ShortUrlService, hash_api_key,
};
use short_url_manager::config::{self, Config};
use short_url_manager::domain::entities::{
    AccessScope, DateRange, ShortUrl, ShortUrlEdit, ShortUrlIdentifier, ShortUrlsOrdering,
    ShortUrlsParams,
};
use short_url_manager::domain::repositories::ApiKeyRepository;
use short_url_manager::infrastructure::persistence::{
    PgApiKeyRepository, PgShortUrlRepository, PgTagRepository,
};
use short_url_manager::infrastructure::validation::HttpUrlValidator;
use short_url_manager::telemetry;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use serde_json::{Map, Value, json};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;

type PgShortUrlService = ShortUrlService<
    PgShortUrlRepository,
    PgTagRepository,
    ScopedShortUrlResolver<PgShortUrlRepository>,
    HttpUrlValidator,
>;

/// CLI tool for managing short-url-manager.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage API keys
    ApiKey {
        #[command(subcommand)]
        action: ApiKeyAction,
    },

    /// Inspect and edit short URLs
    ShortUrl {
        #[command(subcommand)]
        action: ShortUrlAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// API key management subcommands.
#[derive(Subcommand)]
enum ApiKeyAction {
    /// Create a new API key
    Create {
        /// Key name (e.g., "Marketing", "Mobile App")
        #[arg(short, long)]
        name: Option<String>,

        /// Only allow access to short URLs authored with this key
        #[arg(short, long)]
        restricted: bool,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all API keys
    List,

    /// Revoke an API key
    Revoke {
        /// Key name or ID to revoke
        name_or_id: String,
    },
}

/// Options shared by every short URL command.
#[derive(Args)]
struct ScopeArgs {
    /// Act with the visibility of this API key (default: unrestricted)
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    api_key: Option<String>,
}

/// Short URL subcommands.
#[derive(Subcommand)]
enum ShortUrlAction {
    /// List short URLs
    List {
        #[command(flatten)]
        scope: ScopeArgs,

        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Items per page (1-1000)
        #[arg(long, default_value_t = 10, conflicts_with = "all")]
        items_per_page: u32,

        /// Return every matching short URL on one page
        #[arg(long)]
        all: bool,

        /// Search in long URLs, short codes and tag names
        #[arg(short, long)]
        search: Option<String>,

        /// Only short URLs carrying any of these tags (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// Created at or after this RFC 3339 timestamp
        #[arg(long)]
        since: Option<DateTime<Utc>>,

        /// Created at or before this RFC 3339 timestamp
        #[arg(long)]
        until: Option<DateTime<Utc>>,

        /// Ordering: shortCode, longUrl or dateCreated, suffixed with -ASC or -DESC
        #[arg(long, default_value = "dateCreated-ASC")]
        order_by: ShortUrlsOrdering,
    },

    /// Replace the tags of a short URL
    Tags {
        #[command(flatten)]
        scope: ScopeArgs,

        /// Short code
        short_code: String,

        /// Domain the short code belongs to
        #[arg(short, long)]
        domain: Option<String>,

        /// New tag set; omit to remove every tag
        tags: Vec<String>,

        /// Skip confirmation prompt when clearing tags
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Edit short URL metadata
    Edit(EditArgs),
}

#[derive(Args)]
struct EditArgs {
    #[command(flatten)]
    scope: ScopeArgs,

    /// Short code
    short_code: String,

    /// Domain the short code belongs to
    #[arg(short, long)]
    domain: Option<String>,

    /// New long URL
    #[arg(long)]
    long_url: Option<String>,

    /// Check that the new long URL is reachable
    #[arg(long, requires = "long_url")]
    validate_url: bool,

    /// Start of the validity window (RFC 3339)
    #[arg(long, conflicts_with = "clear_valid_since")]
    valid_since: Option<String>,

    /// Remove the start of the validity window
    #[arg(long)]
    clear_valid_since: bool,

    /// End of the validity window (RFC 3339)
    #[arg(long, conflicts_with = "clear_valid_until")]
    valid_until: Option<String>,

    /// Remove the end of the validity window
    #[arg(long)]
    clear_valid_until: bool,

    /// Maximum number of visits
    #[arg(long, conflicts_with = "clear_max_visits")]
    max_visits: Option<u32>,

    /// Remove the visit limit
    #[arg(long)]
    clear_max_visits: bool,
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env().context("Invalid configuration")?;
    telemetry::init(&config.log_level, &config.log_format);
    config.print_summary();

    let pool = connect(&config).await?;

    match cli.command {
        Commands::ApiKey { action } => handle_api_key_action(action, &pool, &config).await?,
        Commands::ShortUrl { action } => handle_short_url_action(action, &pool, &config).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn connect(config: &Config) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")
}

/// Dispatches API key management commands.
async fn handle_api_key_action(action: ApiKeyAction, pool: &PgPool, config: &Config) -> Result<()> {
    let repo = Arc::new(PgApiKeyRepository::new(Arc::new(pool.clone())));

    match action {
        ApiKeyAction::Create {
            name,
            restricted,
            yes,
        } => create_api_key(repo, &config.token_signing_secret, name, restricted, yes).await,
        ApiKeyAction::List => list_api_keys(repo).await,
        ApiKeyAction::Revoke { name_or_id } => revoke_api_key(repo, name_or_id).await,
    }
}

/// Creates a new API key with interactive prompts.
///
/// Only the HMAC-SHA256 of the key is stored; the raw key is shown once.
async fn create_api_key(
    repo: Arc<PgApiKeyRepository>,
    signing_secret: &str,
    name: Option<String>,
    restricted: bool,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🔑 Create API Key".bright_blue().bold());
    println!();

    let key_name = match name {
        Some(n) => n,
        None => Input::new()
            .with_prompt("Key name")
            .with_initial_text("Default")
            .interact_text()?,
    };

    let raw_key = generate_api_key();

    println!("{}", "Key details:".bright_white().bold());
    println!("  Name:  {}", key_name.cyan());
    println!(
        "  Scope: {}",
        if restricted {
            "own short URLs only".yellow()
        } else {
            "all short URLs".green()
        }
    );
    println!("  Key:   {}", raw_key.bright_yellow().bold());
    println!();
    println!(
        "{}",
        "⚠️  IMPORTANT: Save this key now! You won't be able to see it again."
            .red()
            .bold()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this API key?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let key_hash = hash_api_key(signing_secret, &raw_key);

    let api_key = repo
        .create(&key_name, &key_hash, restricted)
        .await
        .context("Failed to create API key")?;

    tracing::info!(api_key_id = api_key.id, restricted, "API key created");

    println!();
    println!("{}", "✅ API key created successfully!".green().bold());
    println!();
    println!(
        "  Use it with: {} short-url list --api-key {}",
        "cargo run --bin admin --".bright_cyan(),
        raw_key.bright_yellow()
    );
    println!();

    Ok(())
}

/// Lists all API keys with status indicators.
async fn list_api_keys(repo: Arc<PgApiKeyRepository>) -> Result<()> {
    println!("{}", "📋 API Keys".bright_blue().bold());
    println!();

    let keys = repo.list().await.context("Failed to list API keys")?;

    if keys.is_empty() {
        println!("{}", "  No API keys found".yellow());
        println!();
        println!(
            "  Create one with: {} admin api-key create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<5} {:<30} {:<20} {:<12} {:<10}",
        "ID".bright_white().bold(),
        "Name".bright_white().bold(),
        "Created".bright_white().bold(),
        "Scope".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "─".repeat(85).bright_black());

    for key in &keys {
        let status = if key.revoked_at.is_some() {
            "REVOKED".red()
        } else if key.is_active() {
            "ACTIVE".green()
        } else {
            "EXPIRED".yellow()
        };
        let scope = if key.restricted { "restricted" } else { "full" };

        println!(
            "  {:<5} {:<30} {:<20} {:<12} {}",
            key.id.to_string().bright_black(),
            key.name.cyan(),
            key.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            scope,
            status
        );
    }

    println!();
    println!("  Total: {}", keys.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Revokes an API key by name or ID with confirmation prompt.
async fn revoke_api_key(repo: Arc<PgApiKeyRepository>, name_or_id: String) -> Result<()> {
    println!("{}", "🔒 Revoke API Key".bright_blue().bold());
    println!();

    let key = match name_or_id.parse::<i64>() {
        Ok(id) => repo.find_by_id(id).await?,
        Err(_) => repo.find_by_name(&name_or_id).await?,
    };

    let key = key.context("API key not found")?;

    if key.revoked_at.is_some() {
        println!("{}", "⚠️  This API key is already revoked".yellow());
        return Ok(());
    }

    println!("  Key: {}", key.name.cyan());
    println!("  ID:  {}", key.id.to_string().bright_black());
    println!();

    let confirmed = Confirm::new()
        .with_prompt("Revoke this API key?")
        .default(false)
        .interact()?;

    if !confirmed {
        println!("{}", "❌ Cancelled".red());
        return Ok(());
    }

    repo.revoke(key.id)
        .await
        .context("Failed to revoke API key")?;

    tracing::info!(api_key_id = key.id, "API key revoked");

    println!();
    println!("{}", "✅ API key revoked successfully!".green().bold());
    println!();

    Ok(())
}

/// Dispatches short URL commands through the scoped services.
async fn handle_short_url_action(
    action: ShortUrlAction,
    pool: &PgPool,
    config: &Config,
) -> Result<()> {
    let pool = Arc::new(pool.clone());
    let short_url_repository = Arc::new(PgShortUrlRepository::new(pool.clone()));
    let service: PgShortUrlService = ShortUrlService::new(
        short_url_repository.clone(),
        Arc::new(PgTagRepository::new(pool.clone())),
        Arc::new(ScopedShortUrlResolver::new(short_url_repository)),
        Arc::new(HttpUrlValidator::from_config(config)),
    );
    let auth = AuthService::new(
        Arc::new(PgApiKeyRepository::new(pool)),
        config.token_signing_secret.clone(),
    );

    match action {
        ShortUrlAction::List {
            scope,
            page,
            items_per_page,
            all,
            search,
            tags,
            since,
            until,
            order_by,
        } => {
            let scope = auth.resolve_scope(scope.api_key.as_deref()).await?;
            let params = ShortUrlsParams {
                page,
                items_per_page: (!all).then_some(items_per_page),
                search_term: search,
                tags,
                date_range: DateRange {
                    start: since,
                    end: until,
                },
                order_by,
            };
            list_short_urls(&service, &params, &scope).await
        }
        ShortUrlAction::Tags {
            scope,
            short_code,
            domain,
            tags,
            yes,
        } => {
            let scope = auth.resolve_scope(scope.api_key.as_deref()).await?;
            let identifier = ShortUrlIdentifier::new(short_code, domain);

            if tags.is_empty() && !yes {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Remove every tag from {identifier}?"))
                    .default(false)
                    .interact()?;

                if !confirmed {
                    println!("{}", "❌ Cancelled".red());
                    return Ok(());
                }
            }

            let short_url = service
                .set_tags_by_short_code(&identifier, &tags, &scope)
                .await?;

            println!("{}", "✅ Tags updated".green().bold());
            println!();
            print_short_url(&short_url);
            Ok(())
        }
        ShortUrlAction::Edit(args) => {
            let scope = auth.resolve_scope(args.scope.api_key.as_deref()).await?;
            edit_short_url(&service, args, &scope).await
        }
    }
}

/// Prints one page of short URLs.
async fn list_short_urls(
    service: &PgShortUrlService,
    params: &ShortUrlsParams,
    scope: &AccessScope,
) -> Result<()> {
    println!("{}", "🔗 Short URLs".bright_blue().bold());
    println!();

    let paginator = service.list_short_urls(params, scope).await?;

    if paginator.is_empty() {
        println!("{}", "  No short URLs found".yellow());
        println!();
        return Ok(());
    }

    println!(
        "  {:<12} {:<20} {:<50} {:<17} {}",
        "Code".bright_white().bold(),
        "Domain".bright_white().bold(),
        "Long URL".bright_white().bold(),
        "Created".bright_white().bold(),
        "Tags".bright_white().bold()
    );
    println!("  {}", "─".repeat(110).bright_black());

    for short_url in paginator.current_page_results() {
        println!(
            "  {:<12} {:<20} {:<50} {:<17} {}",
            short_url.short_code().cyan(),
            short_url.domain().unwrap_or("-"),
            truncate(short_url.long_url(), 50),
            short_url
                .created_at()
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            short_url.tag_names().join(", ").bright_magenta()
        );
    }

    println!();
    println!(
        "  Page {} of {} ({} total)",
        paginator.current_page().to_string().bright_white().bold(),
        paginator.page_count().to_string().bright_white().bold(),
        paginator.total_items().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Assembles the edit flags into raw data and applies them.
async fn edit_short_url(
    service: &PgShortUrlService,
    args: EditArgs,
    scope: &AccessScope,
) -> Result<()> {
    let raw = edit_args_to_raw_data(&args);
    let edit = ShortUrlEdit::from_raw_data(raw)?;

    let identifier = ShortUrlIdentifier::new(args.short_code, args.domain);
    let short_url = service
        .update_metadata_by_short_code(&identifier, edit, scope)
        .await?;

    println!("{}", "✅ Short URL updated".green().bold());
    println!();
    print_short_url(&short_url);

    Ok(())
}

/// Explicit `--clear-*` flags become `null`; unset flags are left out.
fn edit_args_to_raw_data(args: &EditArgs) -> Value {
    let mut data = Map::new();

    if let Some(long_url) = &args.long_url {
        data.insert("longUrl".into(), json!(long_url));
    }
    if args.validate_url {
        data.insert("validateUrl".into(), json!(true));
    }

    if args.clear_valid_since {
        data.insert("validSince".into(), Value::Null);
    } else if let Some(valid_since) = &args.valid_since {
        data.insert("validSince".into(), json!(valid_since));
    }

    if args.clear_valid_until {
        data.insert("validUntil".into(), Value::Null);
    } else if let Some(valid_until) = &args.valid_until {
        data.insert("validUntil".into(), json!(valid_until));
    }

    if args.clear_max_visits {
        data.insert("maxVisits".into(), Value::Null);
    } else if let Some(max_visits) = args.max_visits {
        data.insert("maxVisits".into(), json!(max_visits));
    }

    Value::Object(data)
}

fn print_short_url(short_url: &ShortUrl) {
    let or_dash = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());

    println!("  Code:        {}", short_url.short_code().cyan());
    println!("  Domain:      {}", short_url.domain().unwrap_or("-"));
    println!("  Long URL:    {}", short_url.long_url());
    println!(
        "  Valid since: {}",
        or_dash(short_url.valid_since().map(|d| d.to_rfc3339()))
    );
    println!(
        "  Valid until: {}",
        or_dash(short_url.valid_until().map(|d| d.to_rfc3339()))
    );
    println!(
        "  Max visits:  {}",
        or_dash(short_url.max_visits().map(|v| v.to_string()))
    );
    println!(
        "  Tags:        {}",
        short_url.tag_names().join(", ").bright_magenta()
    );
    println!();
}

fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let mut truncated: String = value.chars().take(max_chars.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!("  PostgreSQL: {}", version.bright_white());
        }
        DbAction::Migrate => {
            println!("{}", "📦 Applying migrations...".bright_blue());

            sqlx::migrate!("./migrations")
                .run(pool)
                .await
                .context("Failed to apply migrations")?;

            println!("{}", "✅ Migrations applied".green().bold());
        }
    }

    Ok(())
}

/// Generates a cryptographically random API key.
///
/// 48 characters from `A-Z`, `a-z`, `0-9`.
fn generate_api_key() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    const KEY_LEN: usize = 48;

    let mut rng = rand::rng();

    (0..KEY_LEN)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edit_args(argv: &[&str]) -> EditArgs {
        let mut full = vec!["admin", "short-url", "edit"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Commands::ShortUrl {
                action: ShortUrlAction::Edit(args),
            } => args,
            _ => panic!("expected short-url edit"),
        }
    }

    #[test]
    fn test_generate_api_key() {
        let key = generate_api_key();
        assert_eq!(key.len(), 48);
        assert!(key.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(key, generate_api_key());
    }

    #[test]
    fn test_edit_flags_to_raw_data() {
        let args = edit_args(&[
            "abc123",
            "--long-url",
            "https://example.com",
            "--clear-max-visits",
            "--valid-until",
            "2030-01-01T00:00:00Z",
        ]);

        let raw = edit_args_to_raw_data(&args);

        assert_eq!(
            raw,
            json!({
                "longUrl": "https://example.com",
                "maxVisits": null,
                "validUntil": "2030-01-01T00:00:00Z",
            })
        );

        let edit = ShortUrlEdit::from_raw_data(raw).unwrap();
        assert_eq!(edit.max_visits(), Some(None));
        assert_eq!(edit.valid_since(), None);
    }

    #[test]
    fn test_edit_without_flags_is_empty() {
        let args = edit_args(&["abc123"]);
        let edit = ShortUrlEdit::from_raw_data(edit_args_to_raw_data(&args)).unwrap();
        assert!(edit.is_empty());
    }

    #[test]
    fn test_clear_and_set_conflict() {
        let result = Cli::try_parse_from([
            "admin",
            "short-url",
            "edit",
            "abc123",
            "--max-visits",
            "5",
            "--clear-max-visits",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_list_order_by_parsing() {
        let cli = Cli::try_parse_from([
            "admin",
            "short-url",
            "list",
            "--order-by",
            "shortCode-DESC",
            "--all",
        ])
        .unwrap();

        match cli.command {
            Commands::ShortUrl {
                action:
                    ShortUrlAction::List {
                        order_by, all, ..
                    },
            } => {
                assert_eq!(order_by.to_string(), "shortCode-DESC");
                assert!(all);
            }
            _ => panic!("expected short-url list"),
        }
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }
}
