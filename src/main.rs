use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;

use relay::app::App;
use relay::config::Config;
use relay::cycle;
use relay::http::{HttpClient, OutboundRequest};
use relay::models::ResponseSummary;
use relay::{logging, ui};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    let log_path = logging::init(&config.logging)?;
    tracing::info!(log = %log_path.display(), "Starting relay");

    // Not fatal: the defaults are already in hand.
    match config.write_if_missing() {
        Ok(true) => tracing::info!("Wrote default config file"),
        Ok(false) => {}
        Err(e) => tracing::warn!(error = %e, "Could not write default config file"),
    }

    let client = HttpClient::new(&config.client).context("Failed to create HTTP client")?;

    let mut terminal = ratatui::init();
    let result = run(&mut terminal, &config, client);
    ratatui::restore();

    if let Err(e) = &result {
        tracing::error!(error = %e, "Exited with error");
    }
    result
}

fn send_request(
    client: HttpClient,
    request: OutboundRequest,
    tx: mpsc::UnboundedSender<ResponseSummary>,
) {
    tokio::spawn(async move {
        let summary = cycle::send(&client, request).await;
        let _ = tx.send(summary);
    });
}

fn run(terminal: &mut DefaultTerminal, config: &Config, client: HttpClient) -> Result<()> {
    let mut app = App::new(&config.defaults);
    let (tx, mut rx) = mpsc::unbounded_channel();

    loop {
        while let Ok(summary) = rx.try_recv() {
            app.finish_send(summary);
        }

        terminal.draw(|frame| ui::render(frame, &app))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            if let Some(request) = app.handle_key(key) {
                send_request(client.clone(), request, tx.clone());
            }
        }

        if app.should_quit {
            break;
        }
    }

    tracing::info!("Quit");
    Ok(())
}
