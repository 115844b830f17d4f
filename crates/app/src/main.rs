use std::{error::Error, path::PathBuf};

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use engine::Engine;
use migration::{Migrator, MigratorTrait};
use settings::Settings;

mod settings;

#[derive(Parser, Debug)]
#[command(name = "tallybook")]
#[command(about = "Personal ledger: accounts, debts, recurring charges and goals")]
struct Cli {
    /// Settings file (also read from `TALLYBOOK_CONFIG`).
    #[arg(long, env = "TALLYBOOK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply pending schema migrations.
    Migrate,
    User(User),
    /// List the accounts of a user.
    Accounts(UserArgs),
    /// Charge every active recurring expense due on or before the date.
    RunDue(DateArgs),
    /// Print the dashboard summary of a user.
    Summary(SummaryArgs),
    /// Print the audit trail of a user.
    Audit(UserArgs),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create(UserCreateArgs),
    List,
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    email: String,
    #[arg(long)]
    name: String,
}

#[derive(Args, Debug)]
struct UserArgs {
    #[arg(long)]
    email: String,
}

#[derive(Args, Debug)]
struct DateArgs {
    /// Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
struct SummaryArgs {
    #[arg(long)]
    email: String,
    #[arg(long)]
    date: Option<NaiveDate>,
}

fn today_or(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Local::now().date_naive())
}

async fn connect_db(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let database = sea_orm::Database::connect(config.url()).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}

async fn run_due(engine: &Engine, as_of: NaiveDate) -> Result<(), Box<dyn Error + Send + Sync>> {
    let due = engine.all_due_recurring(as_of).await?;
    tracing::info!(count = due.len(), %as_of, "executing due recurring expenses");

    let mut failed = 0usize;
    for expense in due {
        match engine
            .execute_recurring(expense.user_id, expense.id, as_of)
            .await
        {
            Ok(execution) => println!(
                "{}: charged {} (next on {})",
                expense.name, execution.payment.amount, execution.next_date
            ),
            Err(err) => {
                failed += 1;
                tracing::error!(recurring_id = %expense.id, "failed to execute: {err}");
            }
        }
    }
    if failed > 0 {
        return Err(format!("{failed} recurring expenses failed").into());
    }
    Ok(())
}

async fn run(cli: Cli, settings: Settings) -> Result<(), Box<dyn Error + Send + Sync>> {
    let db = connect_db(&settings.database).await?;
    let engine = Engine::builder()
        .database(db)
        .settings(settings.ledger)
        .build()
        .await?;

    match cli.command {
        Command::Migrate => {
            tracing::info!("database schema is up to date");
        }
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let user = engine.new_user(&args.email, &args.name).await?;
            println!("created user: {} ({})", user.email, user.id);
        }
        Command::User(User {
            command: UserCommand::List,
        }) => {
            for user in engine.users().await? {
                println!("{}\t{}\t{}", user.id, user.email, user.name);
            }
        }
        Command::Accounts(args) => {
            let user = engine.user_by_email(&args.email).await?;
            for account in engine.accounts(user.id).await? {
                let limit = account
                    .credit_limit
                    .map(|limit| format!(" / {limit}"))
                    .unwrap_or_default();
                println!(
                    "{}\t{}\t{}\t{}{limit}",
                    account.id,
                    account.name,
                    account.kind.as_str(),
                    account.balance
                );
            }
        }
        Command::RunDue(args) => run_due(&engine, today_or(args.date)).await?,
        Command::Summary(args) => {
            let user = engine.user_by_email(&args.email).await?;
            let summary = engine.summary(user.id, today_or(args.date)).await?;
            println!("assets:     {}", summary.total_assets);
            println!("card debt:  {}", summary.total_debt);
            println!("net:        {}", summary.net_balance);
            println!("income:     {}", summary.income_month);
            println!("expenses:   {}", summary.expense_month);
            println!("I owe:      {}", summary.debts_owed_by_me);
            println!("owed to me: {}", summary.debts_owed_to_me);
            for expense in &summary.upcoming_recurring {
                println!(
                    "upcoming:   {} {} on {}",
                    expense.name, expense.amount, expense.next_date
                );
            }
            for tx in &summary.recent_transactions {
                println!(
                    "recent:     {} {} {} {}",
                    tx.date,
                    tx.kind.as_str(),
                    tx.amount,
                    tx.description
                );
            }
        }
        Command::Audit(args) => {
            let user = engine.user_by_email(&args.email).await?;
            for record in engine.audit_records(user.id).await? {
                println!(
                    "{}\t{}\t{}",
                    record.created_at,
                    record.action,
                    record.details.unwrap_or_default()
                );
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();
    let settings = Settings::new(cli.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "tallybook={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    if let Err(err) = run(cli, settings).await {
        tracing::error!("{err}");
        return Err(err);
    }
    Ok(())
}
