use std::error::Error;

use clap::{Parser, Subcommand};
use migration::Migrator;
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;

#[derive(Parser, Debug)]
#[command(name = "tallybook-migrate")]
#[command(about = "Manage the tallybook database schema")]
struct Cli {
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./tallybook.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Apply pending migrations (all of them unless `--steps` is given).
    Up {
        #[arg(long)]
        steps: Option<u32>,
    },
    /// Roll back applied migrations, one unless `--steps` is given.
    Down {
        #[arg(long, default_value_t = 1)]
        steps: u32,
    },
    /// Drop every table and re-apply all migrations.
    Fresh,
    /// Print which migrations are applied.
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();
    let db = Database::connect(&cli.database_url).await?;

    match cli.command.unwrap_or(Command::Up { steps: None }) {
        Command::Up { steps } => Migrator::up(&db, steps).await?,
        Command::Down { steps } => Migrator::down(&db, Some(steps)).await?,
        Command::Fresh => Migrator::fresh(&db).await?,
        Command::Status => Migrator::status(&db).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn down_defaults_to_one_step() {
        let cli = Cli::try_parse_from(["migrate", "down"]).unwrap();
        assert_eq!(cli.command, Some(Command::Down { steps: 1 }));
    }

    #[test]
    fn url_flag_and_missing_command() {
        let cli =
            Cli::try_parse_from(["migrate", "--database-url", "sqlite::memory:"]).unwrap();
        assert_eq!(cli.database_url, "sqlite::memory:");
        assert!(cli.command.is_none());
    }

    #[test]
    fn unknown_command_is_rejected() {
        assert!(Cli::try_parse_from(["migrate", "sideways"]).is_err());
    }
}
