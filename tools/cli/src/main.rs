//! PocketVault CLI - Command line interface for the password vault, the
//! finance tracker and the bill splitter.
//!
//! Vaults are stored as encrypted slots in a local data directory.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;
use zeroize::Zeroizing;

use pocketvault_common::EntryId;
use pocketvault_crypto::{
    evaluate_strength, generate_password, GeneratorOptions, KdfParams, VaultCodec,
};
use pocketvault_settlement::{calculate_balances, settle, Expense, Participant};
use pocketvault_storage::{LocalProvider, SlotProvider};
use pocketvault_vault::finance::{
    category_totals, monthly_summary, net_balance, total_expense, total_income,
};
use pocketvault_vault::{
    parse_date, FinanceVault, PasswordDraft, PasswordVault, TransactionDraft, TransactionKind,
};

/// Shortest master password accepted for a new vault.
const MIN_PASSPHRASE_LEN: usize = 8;

#[derive(Parser)]
#[command(name = "pocketvault")]
#[command(about = "PocketVault - Encrypted passwords, finances and bill splitting")]
#[command(version)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding the vault files.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// KDF strength for encryption: "interactive", "moderate", or "sensitive".
    #[arg(long, global = true, default_value = "moderate")]
    strength: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the password vault.
    Passwords {
        #[command(subcommand)]
        action: PasswordCommand,
    },

    /// Manage the finance tracker vault.
    Finance {
        #[command(subcommand)]
        action: FinanceCommand,
    },

    /// Compute balances and settlements for a group.
    Settle {
        /// JSON file with `participants` and `expenses`.
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Generate a random password.
    Generate(GenerateArgs),
}

#[derive(Subcommand)]
enum PasswordCommand {
    /// Create an empty password vault.
    Init,

    /// List stored entries.
    List {
        /// Print passwords in clear text.
        #[arg(long)]
        show: bool,
    },

    /// Add an entry. The password is prompted for unless --generate is set.
    Add {
        #[arg(short, long)]
        label: String,

        #[arg(short, long)]
        username: Option<String>,

        #[arg(short, long)]
        notes: Option<String>,

        /// Generate a password instead of prompting for one.
        #[arg(short, long)]
        generate: bool,

        /// Length of a generated password.
        #[arg(long, default_value_t = 16)]
        length: usize,
    },

    /// Edit an entry.
    Edit {
        /// Entry id.
        id: String,

        #[arg(short, long)]
        label: Option<String>,

        #[arg(short, long)]
        username: Option<String>,

        #[arg(short, long)]
        notes: Option<String>,

        /// Prompt for a new password.
        #[arg(short, long)]
        password: bool,
    },

    /// Remove an entry.
    Remove {
        /// Entry id.
        id: String,
    },

    /// Write the encrypted vault to a file.
    Export {
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Replace the vault with an exported file.
    Import {
        #[arg(short, long)]
        input: PathBuf,

        /// Overwrite an existing vault.
        #[arg(long)]
        force: bool,
    },

    /// Change the master password.
    ChangePassphrase,

    /// Delete the vault and everything in it.
    Reset {
        /// Confirm deletion.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum FinanceCommand {
    /// Create an empty finance vault.
    Init,

    /// List transactions.
    List,

    /// Record a transaction.
    Add {
        #[arg(short, long)]
        amount: f64,

        /// "income" or "expense".
        #[arg(short = 't', long = "type")]
        kind: TransactionKind,

        #[arg(short, long)]
        category: String,

        #[arg(short, long)]
        description: String,

        /// RFC 3339 timestamp or YYYY-MM-DD (default: now).
        #[arg(long)]
        date: Option<String>,
    },

    /// Remove a transaction.
    Remove {
        /// Transaction id.
        id: String,
    },

    /// Show totals per category and per month.
    Summary {
        /// Number of months to show.
        #[arg(short, long, default_value_t = 6)]
        months: u32,
    },
}

#[derive(Args)]
struct GenerateArgs {
    #[arg(short, long, default_value_t = 16)]
    length: usize,

    #[arg(long)]
    no_uppercase: bool,

    #[arg(long)]
    no_lowercase: bool,

    #[arg(long)]
    no_numbers: bool,

    #[arg(long)]
    no_symbols: bool,
}

impl GenerateArgs {
    fn options(&self) -> GeneratorOptions {
        GeneratorOptions {
            uppercase: !self.no_uppercase,
            lowercase: !self.no_lowercase,
            numbers: !self.no_numbers,
            symbols: !self.no_symbols,
        }
    }
}

/// Group description read by `settle`.
#[derive(Deserialize)]
struct GroupInput {
    participants: Vec<Participant>,
    #[serde(default)]
    expenses: Vec<Expense>,
}

/// Where vaults live and how they are encrypted.
struct Vaults {
    provider: Arc<dyn SlotProvider>,
    codec: VaultCodec,
}

impl Vaults {
    fn new(data_dir: Option<PathBuf>, strength: &str) -> Result<Self> {
        let root = match data_dir {
            Some(dir) => dir,
            None => dirs::data_dir()
                .context("Could not determine a data directory; pass --data-dir")?
                .join("pocketvault"),
        };
        let params = KdfParams::from_preset(strength)
            .context("Invalid strength. Use: interactive, moderate, or sensitive")?;
        let provider =
            LocalProvider::new(&root).with_context(|| format!("Cannot use {}", root.display()))?;
        debug!(data_dir = %provider.root().display(), strength, "Using vault storage");

        Ok(Self {
            provider: Arc::new(provider),
            codec: VaultCodec::new(params),
        })
    }

    fn passwords(&self) -> Result<PasswordVault> {
        Ok(PasswordVault::for_default_slot(
            self.provider.clone(),
            self.codec.clone(),
        )?)
    }

    fn finance(&self) -> Result<FinanceVault> {
        Ok(FinanceVault::for_default_slot(
            self.provider.clone(),
            self.codec.clone(),
        )?)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Passwords { action } => {
            let vaults = Vaults::new(cli.data_dir, &cli.strength)?;
            cmd_passwords(&vaults, action).await
        }
        Commands::Finance { action } => {
            let vaults = Vaults::new(cli.data_dir, &cli.strength)?;
            cmd_finance(&vaults, action).await
        }
        Commands::Settle { input } => cmd_settle(&input).await,
        Commands::Generate(args) => cmd_generate(&args),
    }
}

/// Prompt for password securely.
fn prompt_password(prompt: &str) -> Result<Zeroizing<String>> {
    let password = rpassword::prompt_password(prompt).context("Failed to read password")?;
    Ok(Zeroizing::new(password))
}

/// Prompt for a new master password twice.
fn prompt_new_password(prompt: &str) -> Result<Zeroizing<String>> {
    let password = prompt_password(prompt)?;
    let confirm = prompt_password("Confirm password: ")?;

    if *password != *confirm {
        anyhow::bail!("Passwords do not match");
    }

    if password.chars().count() < MIN_PASSPHRASE_LEN {
        anyhow::bail!(
            "Password must be at least {} characters long",
            MIN_PASSPHRASE_LEN
        );
    }

    Ok(password)
}

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

async fn cmd_passwords(vaults: &Vaults, action: PasswordCommand) -> Result<()> {
    let vault = vaults.passwords()?;

    match action {
        PasswordCommand::Init => {
            info!("Creating password vault");
            let password = prompt_new_password("Choose master password: ")?;
            vault
                .create(password.as_bytes())
                .await
                .context("Failed to create password vault")?;
            println!("Password vault created.");
        }

        PasswordCommand::List { show } => {
            let password = prompt_password("Master password: ")?;
            let session = vault
                .open_session(&password)
                .await
                .context("Failed to unlock password vault")?;

            if session.entries().is_empty() {
                println!("No passwords stored.");
            }
            for entry in session.entries() {
                println!("{}  {}", entry.id, entry.label);
                println!("    Username: {}", or_dash(entry.username.as_deref()));
                if show {
                    println!("    Password: {}", entry.password);
                }
                if let Some(notes) = &entry.notes {
                    println!("    Notes: {}", notes);
                }
                println!("    Updated: {}", entry.updated_at.format("%Y-%m-%d %H:%M"));
            }
            session.lock();
        }

        PasswordCommand::Add {
            label,
            username,
            notes,
            generate,
            length,
        } => {
            let master = prompt_password("Master password: ")?;
            let mut session = vault
                .open_session(&master)
                .await
                .context("Failed to unlock password vault")?;

            let secret = if generate {
                Zeroizing::new(generate_password(length, &GeneratorOptions::default()))
            } else {
                prompt_password("Password for the new entry: ")?
            };

            let mut draft = PasswordDraft::new(label, secret.as_str());
            draft.username = username;
            draft.notes = notes;

            let id = session.add(draft).await.context("Failed to add entry")?;
            if generate {
                println!("Generated password: {}", *secret);
            }
            println!("Entry added: {}", id);
            session.lock();
        }

        PasswordCommand::Edit {
            id,
            label,
            username,
            notes,
            password,
        } => {
            let master = prompt_password("Master password: ")?;
            let mut session = vault
                .open_session(&master)
                .await
                .context("Failed to unlock password vault")?;

            let id = EntryId::new(id);
            let mut entry = session
                .find(&id)
                .cloned()
                .with_context(|| format!("Entry not found: {}", id))?;

            if let Some(label) = label {
                entry.label = label;
            }
            if let Some(username) = username {
                entry.username = Some(username).filter(|u| !u.trim().is_empty());
            }
            if let Some(notes) = notes {
                entry.notes = Some(notes).filter(|n| !n.trim().is_empty());
            }
            if password {
                entry.password = prompt_password("New password for the entry: ")?.as_str().to_owned();
            }

            session.update(entry).await.context("Failed to update entry")?;
            println!("Entry updated: {}", id);
            session.lock();
        }

        PasswordCommand::Remove { id } => {
            let master = prompt_password("Master password: ")?;
            let mut session = vault
                .open_session(&master)
                .await
                .context("Failed to unlock password vault")?;

            let id = EntryId::new(id);
            session.delete(&id).await.context("Failed to remove entry")?;
            println!("Entry removed: {}", id);
            session.lock();
        }

        PasswordCommand::Export { output } => {
            let master = prompt_password("Master password: ")?;
            let session = vault
                .open_session(&master)
                .await
                .context("Failed to unlock password vault")?;

            let exported = session.export().context("Failed to export vault")?;
            tokio::fs::write(&output, exported)
                .await
                .context("Failed to write export file")?;
            println!(
                "Exported {} entries to {}",
                session.entries().len(),
                output.display()
            );
            session.lock();
        }

        PasswordCommand::Import { input, force } => {
            if vault.exists().await? && !force {
                anyhow::bail!("A password vault already exists. Use --force to replace it");
            }

            let ciphertext = tokio::fs::read_to_string(&input)
                .await
                .context("Failed to read import file")?;
            let master = prompt_password("Master password of the export: ")?;

            let blob = vault
                .restore(ciphertext.trim(), master.as_bytes())
                .await
                .context("Failed to import vault")?;
            println!("Imported {} entries.", blob.len());
        }

        PasswordCommand::ChangePassphrase => {
            let old = prompt_password("Current master password: ")?;
            let mut session = vault
                .open_session(&old)
                .await
                .context("Failed to unlock password vault")?;

            let new = prompt_new_password("New master password: ")?;
            session
                .change_passphrase(&new)
                .await
                .context("Failed to change master password")?;
            println!("Master password changed.");
            session.lock();
        }

        PasswordCommand::Reset { yes } => {
            if !yes {
                anyhow::bail!("This deletes every stored password. Re-run with --yes to confirm");
            }
            vault
                .destroy()
                .await
                .context("Failed to reset password vault")?;
            println!("Password vault deleted.");
        }
    }

    Ok(())
}

async fn cmd_finance(vaults: &Vaults, action: FinanceCommand) -> Result<()> {
    let vault = vaults.finance()?;

    match action {
        FinanceCommand::Init => {
            info!("Creating finance vault");
            let password = prompt_new_password("Choose master password: ")?;
            vault
                .create(password.as_bytes())
                .await
                .context("Failed to create finance vault")?;
            println!("Finance vault created.");
        }

        FinanceCommand::List => {
            let master = prompt_password("Master password: ")?;
            let session = vault
                .open_session(&master)
                .await
                .context("Failed to unlock finance vault")?;

            if session.entries().is_empty() {
                println!("No transactions recorded.");
            }
            for tx in session.entries() {
                println!(
                    "{}  {}  {:>7}  {:>10.2}  {}  {}",
                    tx.id,
                    tx.date.format("%Y-%m-%d"),
                    tx.kind,
                    tx.amount,
                    tx.category,
                    tx.description
                );
            }
            session.lock();
        }

        FinanceCommand::Add {
            amount,
            kind,
            category,
            description,
            date,
        } => {
            let date = date.as_deref().map(parse_date).transpose()?;
            let master = prompt_password("Master password: ")?;
            let mut session = vault
                .open_session(&master)
                .await
                .context("Failed to unlock finance vault")?;

            let id = session
                .add(TransactionDraft {
                    amount,
                    kind,
                    category,
                    description,
                    date,
                })
                .await
                .context("Failed to add transaction")?;
            println!("Transaction added: {}", id);
            session.lock();
        }

        FinanceCommand::Remove { id } => {
            let master = prompt_password("Master password: ")?;
            let mut session = vault
                .open_session(&master)
                .await
                .context("Failed to unlock finance vault")?;

            let id = EntryId::new(id);
            session
                .delete(&id)
                .await
                .context("Failed to remove transaction")?;
            println!("Transaction removed: {}", id);
            session.lock();
        }

        FinanceCommand::Summary { months } => {
            let master = prompt_password("Master password: ")?;
            let session = vault
                .open_session(&master)
                .await
                .context("Failed to unlock finance vault")?;
            let transactions = session.entries();

            println!("Income:  {:>12.2}", total_income(transactions));
            println!("Expense: {:>12.2}", total_expense(transactions));
            println!("Balance: {:>12.2}", net_balance(transactions));

            for kind in [TransactionKind::Income, TransactionKind::Expense] {
                let totals = category_totals(transactions, kind);
                if totals.is_empty() {
                    continue;
                }
                println!("\n{} by category:", kind);
                for total in totals {
                    println!("  {:<16} {:>12.2}", total.category, total.total);
                }
            }

            println!("\nLast {} months:", months);
            for month in monthly_summary(transactions, months, Utc::now().date_naive()) {
                println!(
                    "  {:<9} income {:>10.2}  expense {:>10.2}",
                    month.month, month.income, month.expense
                );
            }
            session.lock();
        }
    }

    Ok(())
}

async fn cmd_settle(input: &Path) -> Result<()> {
    let raw = tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let group: GroupInput = serde_json::from_str(&raw).context("Invalid group file")?;

    let balances = calculate_balances(&group.participants, &group.expenses);
    println!("Balances:");
    for balance in &balances {
        println!(
            "  {:<16} {:>+10.2}",
            balance.participant_name, balance.balance
        );
    }

    let plan = settle(&balances);
    if plan.settlements.is_empty() {
        println!("\nEveryone is settled up.");
    } else {
        println!("\nSettlements:");
        for s in &plan.settlements {
            println!("  {} pays {} {:.2}", s.from_name, s.to_name, s.amount);
        }
    }

    if !plan.is_balanced() {
        println!("\nUnsettled (expenses do not add up):");
        for balance in &plan.residual {
            println!(
                "  {:<16} {:>+10.2}",
                balance.participant_name, balance.balance
            );
        }
    }

    Ok(())
}

fn cmd_generate(args: &GenerateArgs) -> Result<()> {
    if args.length == 0 {
        anyhow::bail!("Length must be at least 1");
    }

    let options = args.options();
    let password = Zeroizing::new(generate_password(args.length, &options));
    let strength = evaluate_strength(&password, &options);

    println!("{}", *password);
    println!("{}", strength.message());

    Ok(())
}
