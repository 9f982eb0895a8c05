use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use client_core::{
    listing::{empty_message, filter_and_sort, SortOrder},
    load_settings, DeleteOutcome, HttpUserCollection, InteractionCoordinator, SaveOutcome,
    ScreenView, UserStore,
};
use shared::domain::{NewUser, User, UserDraft, UserId, UserStatus};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Manage the remote users collection")]
struct Args {
    /// Overrides the configured collection URL.
    #[arg(long)]
    base_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    List {
        #[arg(long, default_value = "")]
        filter: String,
        #[arg(long)]
        desc: bool,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, value_enum, default_value_t = StatusArg::Active)]
        status: StatusArg,
    },
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, value_enum)]
        status: StatusArg,
    },
    Delete {
        #[arg(long)]
        id: i64,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StatusArg {
    Active,
    Inactive,
}

impl From<StatusArg> for UserStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Active => UserStatus::Active,
            StatusArg::Inactive => UserStatus::Inactive,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings().context("failed to load client settings")?;
    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    let remote = HttpUserCollection::from_settings(&settings)
        .with_context(|| format!("invalid users endpoint {}", settings.base_url))?;
    let store = UserStore::new(Arc::new(remote));
    let coordinator = InteractionCoordinator::new(store, &settings);

    let (filter, order) = match args.command {
        Command::List { filter, desc } => {
            let order = if desc {
                SortOrder::Descending
            } else {
                SortOrder::Ascending
            };
            (filter, order)
        }
        Command::Create {
            name,
            email,
            status,
        } => {
            let draft = UserDraft::New(NewUser::new(name, email, status.into()));
            report_save(coordinator.save(draft).await);
            (String::new(), SortOrder::Ascending)
        }
        Command::Update {
            id,
            name,
            email,
            status,
        } => {
            let draft = UserDraft::Existing(User {
                id: UserId(id),
                name,
                email,
                status: status.into(),
            });
            report_save(coordinator.save(draft).await);
            (String::new(), SortOrder::Ascending)
        }
        Command::Delete { id } => {
            if let DeleteOutcome::Failed(err) = coordinator.delete(UserId(id)).await {
                tracing::debug!("delete failed: {err}");
            }
            (String::new(), SortOrder::Ascending)
        }
    };

    coordinator.store().read().await;
    render(&coordinator.view().await, &filter, order);
    Ok(())
}

fn report_save(outcome: SaveOutcome) {
    match outcome {
        SaveOutcome::Rejected(err) => eprintln!("{err}"),
        SaveOutcome::Failed(err) => tracing::debug!("save failed: {err}"),
        SaveOutcome::Created(_) | SaveOutcome::Updated(_) => {}
    }
}

fn render(view: &ScreenView, filter: &str, order: SortOrder) {
    if view.notification.visible {
        println!(
            "[{}] {}",
            view.notification.severity.as_str(),
            view.notification.message
        );
    }
    if view.has_error {
        println!("Ocorreu um erro ao processar sua requisição.");
    }
    if let Some(message) = &view.users.error_message {
        println!("list failed: {message}");
    }

    let rows = filter_and_sort(&view.users.data, filter, order);
    if let Some(message) = empty_message(view.users.data.len(), rows.len()) {
        println!("{message}");
        return;
    }
    for user in rows {
        println!(
            "{:>5}  {:<24}  {:<32}  {}",
            user.id,
            user.name,
            user.email,
            user.status.label()
        );
    }
}
