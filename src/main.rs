//! aiclone - command-line client for the AI Clone Me service
//!
//! Entry point for the `aiclone` binary. One-shot subcommands talk to the
//! service directly; `shell` runs the interactive view controller.

use std::io::{self, Write};
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use aiclone_client::cli::{Cli, Commands, ConfigSubcommand, CreateArgs, UsersSubcommand};
use aiclone_client::config::{self, ClientConfig};
use aiclone_client::error::{Error, Result};
use aiclone_client::model::{ConversationRequest, ListField, User};
use aiclone_client::service::{ConversationClient, DirectoryClient, HttpServiceClient, MemoryService};
use aiclone_client::session::{View, ViewController};
use aiclone_client::views::{self, ConversationsView};
use aiclone_client::{logging, shell, version};

fn main() {
    // Parse CLI arguments first (before logging, so we know verbosity)
    let cli = Cli::parse();

    if let Commands::Version = cli.command {
        version::print_version();
        return;
    }

    if let Err(e) = run(cli) {
        eprint!("{}", e.format_for_terminal());
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;

    if let Commands::Config { subcommand } = &cli.command {
        return handle_config_command(subcommand.clone(), &config);
    }

    // The guards must be kept alive for the lifetime of the program
    let _log_guards = logging::init_logging(&config.logging, cli.verbose, cli.quiet)?;

    let build = version::build_info();
    info!(
        version = %build.full_version(),
        service = %config.service.url,
        "Starting aiclone"
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Internal(format!("Failed to create runtime: {}", e)))?;

    runtime.block_on(dispatch(cli.command, config))
}

/// Load file and env configuration, then apply CLI overrides.
///
/// `config init` must work even when the existing configuration is broken,
/// so it skips loading entirely.
fn load_config(cli: &Cli) -> Result<ClientConfig> {
    if let Commands::Config { subcommand: ConfigSubcommand::Init { .. } } = cli.command {
        return Ok(ClientConfig::default());
    }

    let mut config = ClientConfig::load(cli.config.as_deref())?;
    if let Some(ref url) = cli.url {
        config.service.url = url.clone();
        config.validate()?;
    }
    Ok(config)
}

async fn dispatch(command: Commands, config: ClientConfig) -> Result<()> {
    match command {
        Commands::Shell { demo } => run_shell(demo, &config).await,
        Commands::Create(args) => run_create(args, &config).await,
        Commands::Users { subcommand } => run_users(subcommand, &config).await,
        Commands::Converse { from, to, topic } => run_converse(&from, &to, topic.as_deref(), &config).await,
        Commands::Conversations { user, json } => run_conversations(user.as_deref(), json, &config).await,
        Commands::Health => run_health(&config).await,
        Commands::Version | Commands::Config { .. } => {
            // Already handled before the runtime starts
            Ok(())
        }
    }
}

fn http_client(config: &ClientConfig) -> Result<Arc<HttpServiceClient>> {
    Ok(Arc::new(HttpServiceClient::new(&config.service)?))
}

async fn run_shell(demo: bool, config: &ClientConfig) -> Result<()> {
    let controller = if demo {
        info!("Using in-memory demo service");
        ViewController::with_service(Arc::new(MemoryService::with_demo_data()))
    } else {
        ViewController::with_service(http_client(config)?)
    };

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    shell::run(&controller, &config.display, stdin, io::stdout())
        .await
        .map_err(|e| Error::Internal(format!("Shell stopped: {:#}", e)))
}

async fn run_create(args: CreateArgs, config: &ClientConfig) -> Result<()> {
    let controller = ViewController::with_service(http_client(config)?);
    controller.navigate(View::Create);
    controller.edit_form(|form| {
        form.name = args.name;
        form.username = args.username;
        form.communication_style = args.style;
        form.speaking_quirks = args.quirks.unwrap_or_default();
        form.background = args.background.unwrap_or_default();
        for (field, items) in [
            (ListField::Interests, &args.interests),
            (ListField::PersonalityTraits, &args.traits),
            (ListField::FavoriteTopics, &args.topics),
        ] {
            for item in items {
                form.add_list_item(field, item);
            }
        }
    });

    let user = controller.submit_persona().await?;
    println!(
        "Created {} (@{}) with id {}",
        user.display_name(),
        user.username,
        user.user_id
    );
    Ok(())
}

async fn run_users(subcommand: UsersSubcommand, config: &ClientConfig) -> Result<()> {
    let client = http_client(config)?;
    match subcommand {
        UsersSubcommand::List { json } => {
            if json {
                print_json(&client.list_users().await?)?;
            } else {
                let controller = ViewController::with_service(client);
                controller.refresh_users().await?;
                controller.navigate(View::Explore);
                print!("{}", views::render(&controller.state(), &config.display));
            }
        }
        UsersSubcommand::Show { user_id, json } => {
            let user = client.get_user(&user_id).await?;
            if json {
                print_json(&user)?;
            } else {
                print_user(&user);
            }
        }
    }
    Ok(())
}

async fn run_converse(from: &str, to: &str, topic: Option<&str>, config: &ClientConfig) -> Result<()> {
    if from == to {
        return Err(Error::unavailable("start a conversation", "a clone cannot talk to itself"));
    }

    let client = http_client(config)?;
    let request = ConversationRequest::new(from, to, topic);
    let generated = client.request_conversation(&request).await?;

    println!(
        "Conversation {} generated: {} x {} on '{}' ({} messages).",
        generated.conversation_id,
        generated.participants.user1,
        generated.participants.user2,
        request.topic,
        generated.messages.len()
    );
    println!("Run 'aiclone conversations --user {}' to read it.", from);
    Ok(())
}

async fn run_conversations(user: Option<&str>, json: bool, config: &ClientConfig) -> Result<()> {
    let client = http_client(config)?;
    let conversations = match user {
        Some(user_id) => client.list_user_conversations(user_id).await?,
        None => client.list_conversations().await?,
    };

    if json {
        print_json(&conversations)?;
    } else {
        print!("{}", ConversationsView::from_conversations(&conversations));
    }
    Ok(())
}

async fn run_health(config: &ClientConfig) -> Result<()> {
    let client = http_client(config)?;
    let health = client.health().await?;
    println!("{}: {} ({})", client.base_url(), health.status, health.message);
    if !health.is_healthy() {
        return Err(Error::Internal(format!("Service reports '{}'", health.status)));
    }
    Ok(())
}

fn print_user(user: &User) {
    let persona = &user.personality;
    println!("{} (@{})", persona.name, user.username);
    println!("  id:         {}", user.user_id);
    println!("  created:    {}", user.created_at.date_label());
    println!("  style:      {}", persona.communication_style.as_str());
    for field in ListField::all() {
        println!("  {:<11} {}", format!("{}:", field.key()), persona.list(*field).join(", "));
    }
    println!("  quirks:     {}", persona.speaking_quirks);
    println!("  background: {}", persona.background);
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| Error::Internal(format!("Failed to encode JSON: {}", e)))?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", text)?;
    Ok(())
}

/// Handle configuration subcommands
fn handle_config_command(subcommand: ConfigSubcommand, config: &ClientConfig) -> Result<()> {
    match subcommand {
        ConfigSubcommand::Show => {
            println!("{}", toml::to_string_pretty(config)?);
        }
        ConfigSubcommand::Init { path, force } => {
            let path = config::init_config(path.as_deref(), force)?;
            println!("Configuration file created: {}", path.display());
        }
        ConfigSubcommand::Validate => {
            // Loading already validated it
            println!("Configuration is valid.");
        }
    }

    Ok(())
}
