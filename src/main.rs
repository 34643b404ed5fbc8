use clap::{Arg, Command};
use tracing::info;

use cognet::config::Config;
use cognet::console::Console;
use cognet::router::CommandRouter;
use cognet::tasks::TaskOrchestrator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let matches = Command::new("cog")
        .about("Cog - a plugin-dispatch personal assistant")
        .long_about("cog classifies free-text commands into intents and routes them to plugins; it can also run a battery of daily tasks, singly or all at once")
        .arg(Arg::new("command")
            .help("Free-text command to process once")
            .num_args(1..))
        .arg(Arg::new("interactive")
            .long("interactive")
            .short('i')
            .help("Start an interactive session")
            .action(clap::ArgAction::SetTrue))
        .arg(Arg::new("tasks")
            .long("tasks")
            .help("Open the numbered daily-task menu")
            .action(clap::ArgAction::SetTrue))
        .arg(Arg::new("run-all")
            .long("run-all")
            .help("Run every daily task and print the report")
            .action(clap::ArgAction::SetTrue))
        .arg(Arg::new("task")
            .long("task")
            .help("Run a single daily task by name")
            .value_name("NAME")
            .num_args(1))
        .arg(Arg::new("set-api-key")
            .long("set-api-key")
            .help("Set the Anthropic API key")
            .value_name("API_KEY")
            .num_args(1))
        .arg(Arg::new("config")
            .long("config")
            .help("Show configuration information")
            .action(clap::ArgAction::SetTrue))
        .get_matches();

    // Handle configuration commands
    if let Some(api_key) = matches.get_one::<String>("set-api-key") {
        let mut config = Config::load()?;
        config.set_api_key(api_key.clone())?;
        println!("✅ API key saved successfully");
        return Ok(());
    }

    if matches.get_flag("config") {
        Config::show_config_info()?;
        return Ok(());
    }

    let config = Config::load()?;
    let console = Console::new();

    if matches.get_flag("run-all") {
        let orchestrator = TaskOrchestrator::with_defaults(&config);
        let report = orchestrator.run_all().await;
        console.show_report(&report);
        return Ok(());
    }

    if let Some(name) = matches.get_one::<String>("task") {
        let orchestrator = TaskOrchestrator::with_defaults(&config);
        match orchestrator.run(name).await {
            Some(outcome) => console.show_outcome(&outcome),
            None => {
                eprintln!(
                    "Unknown task '{}'. Available: {}",
                    name,
                    orchestrator.task_names().join(", ")
                );
            }
        }
        return Ok(());
    }

    if matches.get_flag("tasks") {
        let orchestrator = TaskOrchestrator::with_defaults(&config);
        return run_task_menu(&orchestrator, &console).await;
    }

    if matches.get_flag("interactive") {
        let router = CommandRouter::new(&config)?;
        return run_session(&router, &console).await;
    }

    // Handle one-shot command processing
    let command_args: Vec<String> = matches
        .get_many::<String>("command")
        .unwrap_or_default()
        .map(|s| s.to_string())
        .collect();

    if command_args.is_empty() {
        eprintln!("No command provided. Use 'cog --help' for usage information.");
        return Ok(());
    }

    let command = command_args.join(" ");
    info!("Processing command: {}", command);

    let router = CommandRouter::new(&config)?;
    let envelope = router.process(&command).await;
    console.show_envelope(&envelope);

    Ok(())
}

/// Interactive session: one command per line, responses in submission
/// order, stops on goodbye or end of input.
async fn run_session(router: &CommandRouter, console: &Console) -> anyhow::Result<()> {
    console.show_welcome();

    loop {
        let Some(line) = console.prompt("you> ")? else {
            break;
        };
        if line.is_empty() {
            continue;
        }

        let envelope = router.process(&line).await;
        console.show_envelope(&envelope);

        if envelope.get_str("action") == Some("goodbye") {
            break;
        }
    }

    Ok(())
}

/// Numbered menu over the daily tasks, plus a run-all aggregate option.
async fn run_task_menu(
    orchestrator: &TaskOrchestrator,
    console: &Console,
) -> anyhow::Result<()> {
    let run_all_choice = orchestrator.len() + 1;
    let names = orchestrator.task_names();

    loop {
        console.show_menu(orchestrator);
        let Some(choice) = console.prompt("Select a task: ")? else {
            break;
        };

        let Ok(index) = choice.parse::<usize>() else {
            println!("Please enter a number between 0 and {}.", run_all_choice);
            continue;
        };

        if index == 0 {
            println!("Goodbye! 👋");
            break;
        }
        if index == run_all_choice {
            let report = orchestrator.run_all().await;
            console.show_report(&report);
            continue;
        }

        match names.get(index - 1) {
            Some(name) => {
                if let Some(outcome) = orchestrator.run(name).await {
                    console.show_outcome(&outcome);
                }
            }
            None => println!("Please enter a number between 0 and {}.", run_all_choice),
        }
    }

    Ok(())
}
