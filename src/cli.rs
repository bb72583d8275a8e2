use std::path::{Path, PathBuf};

mod add;
mod delete;
mod edit;
mod fields;
mod list;
mod menu;
mod search;
mod terminal;

use anyhow::Context;
use clap::ArgAction;
use list::List;
use menu::Menu;
use phonebook::{Config, Phonebook};
use search::{Find, Search};

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The contact file (overrides the configured `data_file`)
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// The configuration file
    #[arg(short, long, default_value = "phonebook.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let config = load_config(&self.config);
        let file = self.file.unwrap_or_else(|| config.data_file.clone());
        let mut phonebook = Phonebook::open(&file)
            .with_context(|| format!("failed to open contact file {}", file.display()))?;

        match self.command {
            Some(command) => command.run(&mut phonebook, &config),
            None => Menu::new(&mut phonebook, config.page_size().get()).run(),
        }
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Show a page of contacts
    List(List),

    /// Add a contact
    Add(add::Command),

    /// Edit the contact at a position
    Edit(edit::Command),

    /// Delete the contact at a position
    Delete(delete::Command),

    /// Find contacts whose field exactly matches a value
    Search(Search),

    /// Find contacts matching every given field exactly
    Find(Find),
}

impl Command {
    fn run(self, phonebook: &mut Phonebook, config: &Config) -> anyhow::Result<()> {
        match self {
            Self::List(command) => command.run(phonebook, config)?,
            Self::Add(command) => {
                command.run(phonebook)?;
            }
            Self::Edit(command) => command.run(phonebook)?,
            Self::Delete(command) => command.run(phonebook)?,
            Self::Search(command) => command.run(phonebook)?,
            Self::Find(command) => command.run(phonebook)?,
        }
        Ok(())
    }
}

fn load_config(path: &Path) -> Config {
    Config::load(path).unwrap_or_else(|e| {
        tracing::debug!("Failed to load config: {e}");
        Config::default()
    })
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use clap::Parser;
    use tempfile::TempDir;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("phonebook").chain(args.iter().copied())).unwrap()
    }

    fn run(tmp: &TempDir, command: Command) -> anyhow::Result<Phonebook> {
        let mut phonebook = Phonebook::open(tmp.path().join("phonebook.csv"))?;
        command.run(&mut phonebook, &Config::default())?;
        Ok(phonebook)
    }

    fn subcommand(args: &[&str]) -> Command {
        parse(args).command.expect("a subcommand")
    }

    #[test]
    fn no_subcommand_means_interactive_menu() {
        let cli = parse(&[]);
        assert!(cli.command.is_none());
        assert_eq!(cli.config, PathBuf::from("phonebook.toml"));
        assert_eq!(cli.file, None);
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = parse(&["list", "-vv", "--file", "other.csv"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.file, Some(PathBuf::from("other.csv")));
    }

    #[test]
    fn add_run_creates_contact() {
        let tmp = TempDir::new().unwrap();
        let phonebook = run(
            &tmp,
            subcommand(&[
                "add",
                "--surname",
                "Smith",
                "--given-name",
                "John",
                "--organization",
                "Acme, Inc.",
                "--work-phone",
                "0123",
                "--personal-phone",
                "4567",
            ]),
        )
        .unwrap();

        let reopened = Phonebook::open(phonebook.path()).unwrap();
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.contacts()[0].organization, "Acme, Inc.");
        assert_eq!(reopened.contacts()[0].work_phone, "0123");
    }

    #[test]
    fn add_run_rejects_invalid_phone() {
        let tmp = TempDir::new().unwrap();
        let error = run(
            &tmp,
            subcommand(&["add", "--work-phone", "12-34", "--personal-phone", "1"]),
        )
        .unwrap_err();

        assert!(error.to_string().contains("invalid work phone"));
        let reopened = Phonebook::open(tmp.path().join("phonebook.csv")).unwrap();
        assert!(reopened.is_empty());
    }

    #[test]
    fn edit_then_delete_run_updates_file() {
        let tmp = TempDir::new().unwrap();
        for surname in ["A", "B", "C"] {
            run(
                &tmp,
                subcommand(&[
                    "add",
                    "--surname",
                    surname,
                    "--work-phone",
                    "1",
                    "--personal-phone",
                    "2",
                ]),
            )
            .unwrap();
        }

        run(&tmp, subcommand(&["edit", "2", "--surname", "Z"])).unwrap();
        let phonebook = run(&tmp, subcommand(&["delete", "0", "--yes"])).unwrap();

        let surnames: Vec<_> = phonebook
            .contacts()
            .iter()
            .map(|c| c.surname.clone())
            .collect();
        assert_eq!(surnames, vec!["B", "Z"]);
        assert_eq!(Phonebook::open(phonebook.path()).unwrap(), phonebook);
    }

    #[test]
    fn search_and_find_run_on_existing_contacts() {
        let tmp = TempDir::new().unwrap();
        run(
            &tmp,
            subcommand(&[
                "add",
                "--surname",
                "Smith",
                "--work-phone",
                "1",
                "--personal-phone",
                "2",
            ]),
        )
        .unwrap();

        run(&tmp, subcommand(&["search", "Surname", "Smith"])).unwrap();
        run(&tmp, subcommand(&["search", "work-phone", "1", "--output", "json"])).unwrap();
        run(&tmp, subcommand(&["find", "--surname", "", "--work-phone", "1"])).unwrap();
        run(&tmp, subcommand(&["list", "--page", "3"])).unwrap();
    }

    #[test]
    fn search_rejects_unknown_field() {
        let result = Cli::try_parse_from(["phonebook", "search", "Nickname", "x"]);
        assert!(result.is_err());
    }

    #[test]
    fn list_rejects_zero_page_size() {
        let result = Cli::try_parse_from(["phonebook", "list", "--page-size", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn load_config_falls_back_to_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("missing.toml"));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_config_reads_page_size() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("phonebook.toml");
        let mut expected = Config::default();
        expected.set_page_size(NonZeroUsize::new(2).unwrap());
        expected.save(&path).unwrap();

        assert_eq!(load_config(&path), expected);
    }
}
