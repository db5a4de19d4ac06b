//! A command-line front end to a to-do list stored in a local folder.
//!
//! Set the RUST_LOG environment variable to display more info.

use std::error::Error;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use kitchen_todo::app::{Command, Target};
use kitchen_todo::confirm::TerminalConfirm;
use kitchen_todo::notifications::{notification_channel, poll};
use kitchen_todo::settings::Theme;
use kitchen_todo::storage::{FolderStore, KeyValueStore};
use kitchen_todo::store::Variant;
use kitchen_todo::utils::{print_categories, print_view};
use kitchen_todo::view::ViewMode;
use kitchen_todo::{config, App, CategoryId, Priority, Recurrence, TaskDraft, TaskId, TaskStore};


/// A local to-do list
#[derive(Parser)]
#[command(name = "todo", version, about)]
struct Cli {
    /// Folder that holds the data files
    #[arg(long)]
    data: Option<PathBuf>,

    /// Use a plain checklist, where tasks are identified by their text
    #[arg(long)]
    simple: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Show every task
    List,
    /// Show the tasks due today
    Today,
    /// Show the tasks that contain a text
    Search { text: Vec<String> },
    /// Add a task
    Add {
        text: Vec<String>,
        #[arg(long)]
        priority: Option<Priority>,
        /// Category id
        #[arg(long)]
        category: Option<String>,
        /// Due date, as YYYY-MM-DD
        #[arg(long)]
        due: Option<NaiveDate>,
        #[arg(long)]
        repeat: Option<Recurrence>,
    },
    /// Toggle the completion of a task, given its id or text
    Done { task: Vec<String> },
    /// Delete a task, given its id or text
    Rm { task: Vec<String> },
    /// Delete every task
    Clear,
    /// List the categories
    Categories,
    /// Create a category
    AddCategory { name: String, icon: Option<String> },
    /// Delete a category, given its id
    RmCategory { id: String },
    /// Switch between the light and dark themes
    Theme { theme: Theme },
    /// Print reminders about due tasks, until interrupted
    Watch,
}


fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let variant = if cli.simple { Variant::Simple } else { Variant::Rich };
    let storage = match &cli.data {
        Some(folder) => FolderStore::new(folder),
        None => FolderStore::default_folder(),
    };
    log::debug!("Using data folder {:?}", storage.folder());
    let mut app = App::new(TaskStore::load(storage, variant));

    let command = match cli.action {
        Action::List => Command::SetViewMode(ViewMode::List),
        Action::Today => Command::SetViewMode(ViewMode::Today),
        Action::Search { text } => Command::Search(text.join(" ")),
        Action::Add { text, priority, category, due, repeat } => Command::Add(TaskDraft {
            text: text.join(" "),
            priority,
            category: category.as_deref().map(CategoryId::from),
            due_date: due,
            recurrence: repeat.unwrap_or_default(),
            ..TaskDraft::default()
        }),
        Action::Done { task } => Command::Toggle(target(&app, &task)?),
        Action::Rm { task } => Command::Delete(target(&app, &task)?),
        Action::Clear => Command::ClearAll,
        Action::Categories => {
            print_categories(app.store().categories());
            return Ok(());
        },
        Action::AddCategory { name, icon } => Command::AddCategory { name, icon: icon.unwrap_or_default() },
        Action::RmCategory { id } => Command::DeleteCategory(CategoryId::from(id.as_str())),
        Action::Theme { theme } => Command::SetTheme(theme),
        Action::Watch => return watch(app),
    };

    let view = app.handle(command, &mut TerminalConfirm)?;
    print_view(&view);
    Ok(())
}

/// Tasks can be designated by their id, or by their text
fn target<S: KeyValueStore>(app: &App<S>, words: &[String]) -> Result<Target, Box<dyn Error>> {
    let text = words.join(" ");
    if text.is_empty() {
        return Err("Missing task id or text".into());
    }
    let id = TaskId::from(text.as_str());
    if app.store().task(&id).is_some() {
        Ok(Target::Id(id))
    } else {
        Ok(Target::Text(text))
    }
}

fn watch(app: App<FolderStore>) -> Result<(), Box<dyn Error>> {
    let interval = config::get(&config::NOTIFICATION_INTERVAL);
    println!("Checking due tasks every {} seconds. Press Ctrl+C to stop.", interval.as_secs());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;

    runtime.block_on(async move {
        let (sender, mut receiver) = notification_channel();
        let app = Arc::new(Mutex::new(app));
        let poller = tokio::spawn(poll(app, sender, interval));

        while let Some(notification) = receiver.recv().await {
            println!("🔔 {}", notification);
        }
        let _ = poller.await;
    });
    Ok(())
}
