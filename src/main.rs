use forkify::commands::{Command, HELP};
use forkify::{build_terminal_controller, Event, Settings, UploadForm};
use log::{error, info};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedSender};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let settings = Settings::load()?;
    info!("Using API at {}", settings.api_url);

    let controller = build_terminal_controller(&settings)?;
    let (events, rx) = mpsc::unbounded_channel();

    events.send(Event::BookmarksRequested)?;
    println!("{}", HELP);

    let input = tokio::spawn(read_commands(events));
    controller.run(rx).await;
    input.abort();

    Ok(())
}

/// Turn stdin lines into controller events until `quit` or end of input
async fn read_commands(events: UnboundedSender<Event>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read input: {}", e);
                break;
            }
        };

        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                println!("{}", message);
                continue;
            }
        };

        let event = match command {
            Command::Help => {
                println!("{}", HELP);
                continue;
            }
            Command::Upload(path) => match read_form(&path).await {
                Ok(form) => Event::RecipeSubmitted(form),
                Err(e) => {
                    println!("! Could not read {}: {}", path, e);
                    continue;
                }
            },
            other => match other.into_event() {
                Some(event) => event,
                None => continue,
            },
        };

        let quit = matches!(event, Event::Shutdown);
        if events.send(event).is_err() || quit {
            break;
        }
    }

    let _ = events.send(Event::Shutdown);
}

async fn read_form(path: &str) -> Result<UploadForm, Box<dyn std::error::Error + Send + Sync>> {
    let content = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&content)?)
}
