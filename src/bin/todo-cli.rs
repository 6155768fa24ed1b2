use clap::{Parser, Subcommand};
use serde::Serialize;
use todo_sdk::{NewTodo, SdkError, TodoClient};

#[derive(Parser)]
#[command(name = "todo-cli")]
#[command(about = "Command-line client for the TODO API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every todo
    List,
    /// Show one todo
    Get { id: i64 },
    /// Create a todo
    Add {
        title: String,
        #[arg(short, long, default_value = "")]
        description: String,
        #[arg(short, long, default_value_t = 0)]
        priority: i64,
    },
    /// Mark a todo as completed
    Complete { id: i64 },
    /// Mark a todo as not completed
    Reopen { id: i64 },
    /// Delete a todo
    Delete { id: i64 },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = TodoClient::new(&cli.url);

    let result = match cli.command {
        Commands::List => client.list().await.and_then(|todos| print_json(&todos)),
        Commands::Get { id } => client.get(id).await.and_then(|todo| print_json(&todo)),
        Commands::Add {
            title,
            description,
            priority,
        } => {
            let new = NewTodo {
                title,
                description,
                priority,
            };
            client.add(&new).await.and_then(|todo| print_json(&todo))
        }
        Commands::Complete { id } => client.set_status(id, true).await,
        Commands::Reopen { id } => client.set_status(id, false).await,
        Commands::Delete { id } => client.delete(id).await,
    };

    if let Err(SdkError::Status { status, body }) = &result {
        eprintln!("Error: API returned status {}", status);
        eprintln!("Response: {}", body);
        std::process::exit(1);
    }
    result?;
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), SdkError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
