// Interactive terminal client: prompts for troops and fields and solves them on the game service.

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use blotto_backend::cli::TerminalView;
use blotto_backend::client::HttpGameService;
use blotto_backend::config::ClientConfig;
use blotto_backend::presenter::ResultPresenter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::load();
    let service = HttpGameService::new(&config.service_url);
    let mut presenter = ResultPresenter::new(service, TerminalView::new(std::io::stdout()));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        println!(
            "\n--- Colonel Blotto Game Solver ({}) ---",
            presenter.service().base_url()
        );
        println!("1. Solve a puzzle");
        println!("2. Quit");

        let Some(choice) = prompt(&mut lines, "Enter your choice (1 or 2): ").await else {
            break;
        };
        match choice.trim() {
            "1" => {
                let Some(troops) = prompt(&mut lines, "Enter the number of troops: ").await else {
                    break;
                };
                let Some(fields) = prompt(&mut lines, "Enter the number of fields: ").await else {
                    break;
                };
                presenter.on_solve_requested(&troops, &fields).await;
            }
            "2" => {
                println!("Exiting Colonel Blotto Game Solver. Goodbye!");
                break;
            }
            _ => println!("Invalid choice. Please enter 1 or 2."),
        }
    }
}

/// Print `text` and read one line. `None` on end of input or a read error.
async fn prompt<R>(lines: &mut tokio::io::Lines<R>, text: &str) -> Option<String>
where
    R: tokio::io::AsyncBufRead + Unpin,
{
    use std::io::Write;

    print!("{text}");
    let _ = std::io::stdout().flush();
    match lines.next_line().await {
        Ok(line) => line,
        Err(e) => {
            tracing::error!("Failed to read input: {e}");
            None
        }
    }
}
