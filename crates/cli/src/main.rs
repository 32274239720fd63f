//! `cnc` - the assistant's interactive REPL.
//!
//! Free-text lines go to the assistant; slash commands handle session
//! management and exports. `--once` runs a single exchange for scripts
//! and tests.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use cncassist::Assistant;

#[derive(Parser)]
#[command(name = "cnc", about = "Rule-based cutting-mode assistant for CNC operators")]
struct Args {
    /// Data directory for sessions, journals and profiles
    #[arg(long, default_value = "./data")]
    data_dir: PathBuf,

    /// cutting_modes.toml overriding the builtin rules table
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Session name, one context per user
    #[arg(long, default_value = "operator")]
    user: String,

    /// Run a single exchange non-interactively and exit
    #[arg(long)]
    once: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let assistant = match &args.rules {
        Some(path) => Assistant::with_rules(&args.data_dir, path)?,
        None => Assistant::open(&args.data_dir)?,
    };

    if let Some(text) = &args.once {
        let reply = assistant.handle(&args.user, text)?;
        println!("{}", reply.text);
        return Ok(());
    }

    repl(&assistant, &args)
}

fn repl(assistant: &Assistant, args: &Args) -> Result<()> {
    let mut editor = DefaultEditor::new()?;
    let history_path = args.data_dir.join("history.txt");
    let _ = editor.load_history(&history_path);

    println!("cnc assistant - describe the job, e.g. 'turning steel from 60 to 50'.");
    println!("/help for examples, exit or Ctrl-D to leave.");

    loop {
        match editor.readline("cnc> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line);

                if matches!(line, "exit" | "quit" | "выход") {
                    break;
                }
                if line.starts_with('/') && dispatch_command(assistant, &args.user, line)? {
                    continue;
                }

                match assistant.handle(&args.user, line) {
                    Ok(reply) => println!("{}", reply.text),
                    Err(err) => eprintln!("error: {err:#}"),
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        }
    }

    let _ = editor.save_history(&history_path);
    println!("bye");
    Ok(())
}

/// Handle the session-management commands; returns false for commands
/// the assistant itself answers (/help, /context).
fn dispatch_command(assistant: &Assistant, user: &str, line: &str) -> Result<bool> {
    let parts = shlex::split(line).unwrap_or_default();
    let command = parts.first().map(String::as_str).unwrap_or("");

    match command {
        "/reset" => {
            assistant.reset(user)?;
            println!("Context cleared - tell me about the next job.");
            Ok(true)
        }
        "/stats" => {
            match assistant.stats(user) {
                Some(profile) => {
                    println!("Operator: {}", profile.user);
                    println!("  decisions logged   {}", profile.total_decisions);
                    println!("  mean |deviation|   {:.3}", profile.mean_abs_deviation);
                    println!("  mean rpm           {:.0}", profile.mean_rpm);
                    match profile.consistency {
                        Some(c) => println!("  consistency        {c:.3}"),
                        None => println!("  consistency        n/a (need 3+ decisions)"),
                    }
                    if let Some(machine) = profile.machine {
                        println!("  likely machine     {machine}");
                    }
                    println!("  experience         {}", profile.experience);
                }
                None => println!("No decisions logged yet for '{user}'."),
            }
            Ok(true)
        }
        "/export" => {
            let report = assistant.export_dataset()?;
            println!("{}", report.summary());
            println!(
                "Training set written to {}",
                assistant.data_dir().join("training.jsonl").display()
            );
            Ok(true)
        }
        _ => Ok(false),
    }
}
