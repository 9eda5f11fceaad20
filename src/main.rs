//! commit-assist - CLI entry point.

use anyhow::{Context, Result, bail};
use clap::Parser;
use dialoguer::{Input, Password, Select};
use tracing_subscriber::EnvFilter;

use commit_assist::git::{SystemGit, check_git_installed};
use commit_assist::{
    Action, CompletionClient, Config, ConfigOverrides, Credential, FailureKind, GitGateway,
    Outcome, Session, Workflow, resolve_credential,
};

type CliWorkflow = Workflow<GitGateway<SystemGit>, CompletionClient>;

/// Generate conventional commit messages from your working-tree changes.
#[derive(Parser, Debug)]
#[command(name = "commit-assist")]
#[command(about = "Generate conventional commit messages from your working-tree changes")]
#[command(version)]
struct Cli {
    /// Path to the local git repository (prompted for when omitted)
    #[arg(short = 'C', long)]
    repo: Option<String>,

    /// API key for the completion service (defaults to GROQ_API_KEY, then MY_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Model identifier
    #[arg(long)]
    model: Option<String>,

    /// Sampling temperature (0.0 - 2.0)
    #[arg(long)]
    temperature: Option<f32>,

    /// Maximum tokens in the generated message
    #[arg(long)]
    max_tokens: Option<u32>,

    /// Base URL of an OpenAI-compatible API
    #[arg(long)]
    base_url: Option<String>,

    /// Print the generated message and exit without committing
    #[arg(long)]
    print: bool,

    /// Show debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    check_git_installed().await.context("git is required")?;

    let config = Config::from_env()
        .with_overrides(ConfigOverrides {
            model: cli.model.clone(),
            base_url: cli.base_url.clone(),
            temperature: cli.temperature,
            max_tokens: cli.max_tokens,
        })
        .context("Invalid configuration")?;

    let gateway = GitGateway::new(SystemGit::new(config.git_timeout));
    let client = CompletionClient::new(config).context("Failed to create HTTP client")?;

    if cli.print {
        return print_once(cli, gateway, client).await;
    }

    println!("AI Git Commit Message Generator\n");

    let repo = match cli.repo {
        Some(repo) => repo,
        None => Input::<String>::new()
            .with_prompt("Repository path")
            .default(".".to_string())
            .interact_text()
            .context("Failed to read repository path")?,
    };

    let credential = match resolve_credential(cli.api_key.as_deref()) {
        Some(key) => key,
        None => Password::new()
            .with_prompt("Groq API key")
            .interact()
            .context("Failed to read API key")?,
    };

    let session = Session::new(repo, Credential::new(credential));
    let mut workflow = Workflow::with_session(gateway, client, session);

    run_interactive(&mut workflow).await
}

/// Non-interactive mode: generate once and write the message to stdout.
async fn print_once(
    cli: Cli,
    gateway: GitGateway<SystemGit>,
    client: CompletionClient,
) -> Result<()> {
    let repo = cli.repo.unwrap_or_else(|| ".".to_string());
    let credential = resolve_credential(cli.api_key.as_deref()).unwrap_or_default();

    let mut workflow =
        Workflow::with_session(gateway, client, Session::new(repo, Credential::new(credential)));

    match workflow.dispatch(Action::Generate).await? {
        Outcome::Generated { message } => {
            println!("{message}");
            Ok(())
        }
        Outcome::NoChanges => {
            eprintln!("No changes detected in this repository.");
            Ok(())
        }
        Outcome::Committed(_) => bail!("unexpected commit in print mode"),
    }
}

async fn run_interactive(workflow: &mut CliWorkflow) -> Result<()> {
    let mut action = Action::Generate;

    loop {
        match action {
            Action::Generate => println!("Analyzing changes..."),
            Action::Refresh => println!("Refreshing diff and regenerating..."),
            Action::Commit => println!("Committing..."),
        }

        match workflow.dispatch(action).await {
            Ok(Outcome::Generated { message }) => {
                println!("\n✓ Commit message generated:\n");
                print_message(&message);
            }
            Ok(Outcome::NoChanges) => println!("No changes detected in this repository."),
            Ok(Outcome::Committed(summary)) => {
                println!("✓ Commit created successfully!");
                if !summary.output.is_empty() {
                    println!("  {}", summary.output);
                }
            }
            Err(e) => {
                eprintln!("✗ {e}");
                if e.kind() == FailureKind::MissingInput {
                    prompt_missing_inputs(workflow)?;
                }
            }
        }

        println!();
        match choose_next(workflow)? {
            Some(next) => action = next,
            None => return Ok(()),
        }
    }
}

/// Offer the actions valid in the current state, plus quit.
fn choose_next(workflow: &CliWorkflow) -> Result<Option<Action>> {
    let ready = workflow.available_actions().contains(&Action::Commit);

    let choices: Vec<(&str, Option<Action>)> = if ready {
        vec![
            ("Commit changes", Some(Action::Commit)),
            ("Refresh diff & regenerate", Some(Action::Refresh)),
            ("Quit", None),
        ]
    } else {
        vec![
            ("Detect changes & generate commit message", Some(Action::Generate)),
            ("Quit", None),
        ]
    };

    let labels: Vec<&str> = choices.iter().map(|(label, _)| *label).collect();
    let selection = Select::new()
        .with_prompt("What next?")
        .items(&labels)
        .default(0)
        .interact()
        .context("Failed to read selection")?;

    Ok(choices[selection].1)
}

fn prompt_missing_inputs(workflow: &mut CliWorkflow) -> Result<()> {
    if workflow.session().repository_path().trim().is_empty() {
        let repo: String = Input::new()
            .with_prompt("Repository path")
            .default(".".to_string())
            .interact_text()
            .context("Failed to read repository path")?;
        workflow.set_repository_path(repo);
    }
    if workflow.session().credential().is_empty() {
        let key = Password::new()
            .with_prompt("Groq API key")
            .interact()
            .context("Failed to read API key")?;
        workflow.set_credential(Credential::new(key));
    }
    Ok(())
}

fn print_message(message: &str) {
    for line in message.lines() {
        println!("    {line}");
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("commit_assist=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
