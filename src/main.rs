// tasksage - a task assistant that understands plain sentences
//
// This is the main entry point. Parses CLI args and dispatches to handlers.

use chrono::Local;
use std::env;
use std::sync::Arc;
use tasksage_lib::{
    assistant::{morning_summary, Assistant, Searcher},
    db::{generate_id, Task},
    intelligence::{Analyzer, Classifier},
    Database, Result, SageError,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Grab whatever the user typed
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return Ok(());
    }

    let command = &args[1];

    match command.as_str() {
        "ask" => handle_ask(&args[2..]).await,
        "add" => handle_add(&args[2..]).await,
        "list" => handle_list().await,
        "done" => handle_done(&args[2..]).await,
        "delete" => handle_delete(&args[2..]).await,
        "search" => handle_search(&args[2..]).await,
        "analyze" => handle_analyze().await,
        "suggest" => handle_suggest().await,
        "accept" => handle_accept(&args[2..]).await,
        "dismiss" => handle_dismiss(&args[2..]).await,
        "morning" => handle_morning().await,
        "status" => handle_status().await,
        "version" | "-v" | "--version" => {
            println!("tasksage v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "-h" | "--help" => {
            print_usage();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            Ok(())
        }
    }
}

async fn handle_ask(args: &[String]) -> Result<()> {
    if args.is_empty() {
        eprintln!("Error: Nothing to ask. Try: tasksage ask \"add a task to buy milk tomorrow\"");
        return Ok(());
    }

    let command = args.join(" ");
    let db = Arc::new(get_database().await?);
    let assistant = Assistant::new(db);

    match assistant.handle(&command).await {
        Ok(reply) => println!("{}", reply),
        Err(e) => eprintln!("{}", e.user_message()),
    }

    Ok(())
}

async fn handle_add(args: &[String]) -> Result<()> {
    // Parse flags and gather the title words
    let mut title_parts = Vec::new();
    let mut due: Option<String> = None;
    let mut priority: Option<String> = None;
    let mut category: Option<String> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--due" => {
                i += 1;
                if i < args.len() {
                    due = Some(args[i].clone());
                }
            }
            "--priority" => {
                i += 1;
                if i < args.len() {
                    priority = Some(args[i].clone());
                }
            }
            "--category" => {
                i += 1;
                if i < args.len() {
                    category = Some(args[i].clone());
                }
            }
            arg => title_parts.push(arg.to_string()),
        }
        i += 1;
    }

    if title_parts.is_empty() {
        return Err(SageError::InvalidTask("title must not be empty".to_string()));
    }

    if let Some(date) = &due {
        if chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
            return Err(SageError::InvalidDate(date.clone()));
        }
    }

    let mut task = Task::new(generate_id(), title_parts.join(" "));
    task.due_date = due;
    if let Some(p) = priority {
        task.priority = p;
    }

    let classifier = Classifier::new();
    task.category = Some(match category {
        Some(c) => c,
        None => classifier.categorize(&task.text()).id().to_string(),
    });
    let tags = classifier.suggest_tags(&task.text());
    if !tags.is_empty() {
        task.set_tags(tags)?;
    }

    let db = Arc::new(get_database().await?);
    db.insert_task(&task).await?;

    // Keep the suggestion cache in step with the collection
    Analyzer::new(Arc::clone(&db)).refresh_now().await;

    match &task.due_date {
        Some(date) => println!("Added \"{}\" (due {})", task.title, date),
        None => println!("Added \"{}\"", task.title),
    }

    Ok(())
}

async fn handle_list() -> Result<()> {
    let db = get_database().await?;
    let tasks = db.get_all_tasks().await?;

    if tasks.is_empty() {
        println!("No tasks yet. Add one with: tasksage add <title>");
        return Ok(());
    }

    println!("\nYour tasks:");
    println!("{}", "=".repeat(60));
    for task in &tasks {
        let mark = if task.is_completed { "x" } else { " " };
        let due = task
            .due_date
            .as_deref()
            .map(|d| format!("  due {}", d))
            .unwrap_or_default();
        let kind = if task.is_event { " [event]" } else { "" };
        println!(
            "[{}] {}  ({}){}{}   id={}",
            mark, task.title, task.priority, kind, due, task.id
        );
    }
    println!("{}", "=".repeat(60));

    Ok(())
}

async fn handle_done(args: &[String]) -> Result<()> {
    let Some(id) = args.first() else {
        eprintln!("Error: No task id provided");
        return Ok(());
    };

    let db = get_database().await?;
    match db.toggle_completed(id).await {
        Ok(true) => println!("Marked as completed."),
        Ok(false) => println!("Reopened."),
        Err(e) => eprintln!("{}", e.user_message()),
    }

    Ok(())
}

async fn handle_delete(args: &[String]) -> Result<()> {
    let Some(id) = args.first() else {
        eprintln!("Error: No task id provided");
        return Ok(());
    };

    let db = get_database().await?;
    match db.delete_task(id).await {
        Ok(()) => println!("Deleted."),
        Err(e) => eprintln!("{}", e.user_message()),
    }

    Ok(())
}

async fn handle_search(args: &[String]) -> Result<()> {
    if args.is_empty() {
        eprintln!("Error: No search query provided");
        return Ok(());
    }

    let query = args.join(" ");
    let db = Arc::new(get_database().await?);
    let searcher = Searcher::new(db);

    let results = searcher.search(&query, 20).await?;

    if results.is_empty() {
        println!("No tasks found matching '{}'", query);
    } else {
        println!("\nFound {} task(s) matching '{}':", results.len(), query);
        println!("{}", "=".repeat(60));
        for (i, result) in results.iter().enumerate() {
            let due = result
                .task
                .due_date
                .as_deref()
                .map(|d| format!("  due {}", d))
                .unwrap_or_default();
            println!("{:3}. {}{}", i + 1, result.task.title, due);
        }
        println!("{}", "=".repeat(60));
    }

    Ok(())
}

async fn handle_analyze() -> Result<()> {
    let db = Arc::new(get_database().await?);
    let analyzer = Analyzer::new(db);

    println!("\nAnalyzing your tasks...\n");

    let report = analyzer.refresh_now().await;

    println!("{}", "=".repeat(60));
    println!("Analysis Report");
    println!("{}", "=".repeat(60));
    println!("\nRecurring patterns:   {}", report.recurring.len());
    println!("Related pairs:        {}", report.related.len());
    println!("Forgotten tasks:      {}", report.forgotten.len());
    println!("Category habits:      {}", report.categorical.len());

    if !report.recurring.is_empty() {
        println!("\nRecurring:");
        for pattern in &report.recurring {
            println!(
                "  - \"{}\" every ~{:.0} days ({})",
                pattern.title, pattern.interval_days, pattern.cadence
            );
        }
    }

    if !report.suggestions.is_empty() {
        println!("\nSuggestions:");
        for (i, suggestion) in report.suggestions.iter().enumerate() {
            println!(
                "\n  {}. {} (confidence: {:.0}%)",
                i + 1,
                suggestion.message,
                suggestion.confidence * 100.0
            );
        }
    }

    println!("\n{}", "=".repeat(60));

    Ok(())
}

async fn handle_suggest() -> Result<()> {
    let db = Arc::new(get_database().await?);
    let analyzer = Analyzer::new(db);

    analyzer.refresh_now().await;
    let suggestions = analyzer.cached().await?;

    if suggestions.is_empty() {
        println!("No suggestions right now.");
        println!("Add and complete more tasks so tasksage can spot your patterns!");
    } else {
        println!("{}", "=".repeat(60));
        println!("Suggestions");
        println!("{}", "=".repeat(60));

        for (id, suggestion) in &suggestions {
            println!(
                "\n{:3}. {} (confidence: {:.0}%)",
                id,
                suggestion.message,
                suggestion.confidence * 100.0
            );
        }

        println!("\n{}", "=".repeat(60));
        println!("\nAccept one with 'tasksage accept <id>' or drop it with 'tasksage dismiss <id>'.");
    }

    Ok(())
}

async fn handle_accept(args: &[String]) -> Result<()> {
    let Some(id) = args.first().and_then(|s| s.parse::<i64>().ok()) else {
        eprintln!("Error: Expected a numeric suggestion id");
        return Ok(());
    };

    let db = Arc::new(get_database().await?);
    let analyzer = Analyzer::new(db);

    match analyzer.accept(id, Local::now().date_naive()).await {
        Ok(outcome) => println!("{}", outcome),
        Err(e) => eprintln!("{}", e.user_message()),
    }

    Ok(())
}

async fn handle_dismiss(args: &[String]) -> Result<()> {
    let Some(id) = args.first().and_then(|s| s.parse::<i64>().ok()) else {
        eprintln!("Error: Expected a numeric suggestion id");
        return Ok(());
    };

    let db = Arc::new(get_database().await?);
    let analyzer = Analyzer::new(db);

    match analyzer.dismiss(id).await {
        Ok(()) => println!("Dismissed."),
        Err(e) => eprintln!("{}", e.user_message()),
    }

    Ok(())
}

async fn handle_morning() -> Result<()> {
    let db = get_database().await?;
    let tasks = db.get_all_tasks().await?;

    println!("{}", morning_summary(&tasks, Local::now().date_naive()));

    Ok(())
}

async fn handle_status() -> Result<()> {
    let db = get_database().await?;
    let stats = db.stats().await?;

    println!("\ntasksage Status");
    println!("{}", "=".repeat(60));
    println!("\nDatabase: {}", db.path().display());
    println!("\nStored:");
    println!("  Tasks:       {}", stats.total_tasks);
    println!("  Notes:       {}", stats.total_notes);
    println!("  Reminders:   {}", stats.total_reminders);
    println!("  Suggestions: {}", stats.total_suggestions);
    println!("\nConnections: {} ({} idle)", stats.pool_size, stats.idle_connections);
    println!("{}", "=".repeat(60));

    Ok(())
}

async fn get_database() -> Result<Database> {
    let home = dirs::home_dir().expect("Could not find home directory");
    let db_path = home.join(".tasksage").join("tasksage.db");
    Database::new(db_path).await
}

fn print_usage() {
    println!(
        r#"tasksage v{} - A task assistant that understands plain sentences

USAGE:
    tasksage <COMMAND> [OPTIONS]

COMMANDS:
    ask <sentence>         Tell the assistant what you want
    add <title> [--due YYYY-MM-DD] [--priority P] [--category C]
                           Add a task directly
    list                   Show all tasks
    done <id>              Toggle a task's completion
    delete <id>            Delete a task
    search <query>         Fuzzy-search tasks
    analyze                Analyze task patterns
    suggest                Show current suggestions
    accept <id>            Act on a suggestion
    dismiss <id>           Drop a suggestion
    morning                Morning briefing
    status                 Show status and stats
    version                Show version
    help                   Show this help

EXAMPLES:
    tasksage ask "add a task to buy milk tomorrow"
    tasksage ask "remind me to call mom on friday"
    tasksage add "Pay rent" --due 2025-07-01 --category finance
    tasksage suggest
    tasksage morning
"#,
        env!("CARGO_PKG_VERSION")
    );
}
