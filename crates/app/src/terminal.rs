use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use outloud_core::model::Viewer;
use outloud_core::{Event, NavInput, Screen, ViewerSession};
use services::{Backend, Host, ViewerController};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use ui::vm::{map_catalog, map_question};

/// Line-oriented host: prompts and alerts go to the terminal.
struct TerminalHost {
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl TerminalHost {
    fn new() -> Self {
        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }

    /// Next input line, trimmed. `None` at end of input.
    async fn read_line(&self) -> io::Result<Option<String>> {
        let line = self.lines.lock().await.next_line().await?;
        Ok(line.map(|line| line.trim().to_owned()))
    }
}

#[async_trait(?Send)]
impl Host for TerminalHost {
    async fn confirm(&self, prompt: &str) -> bool {
        println!("{prompt} [y/N]");
        match self.read_line().await {
            Ok(Some(answer)) => matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"),
            _ => false,
        }
    }

    fn alert(&self, message: &str) {
        println!("! {message}");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Select(usize),
    Navigate(NavInput),
    Back,
    BuyAll,
    Quit,
    Help,
}

impl Command {
    fn parse(input: &str) -> Option<Self> {
        match input {
            "" => Some(Self::Navigate(NavInput::Tap)),
            "n" | "next" => Some(Self::Navigate(NavInput::Next)),
            "p" | "prev" => Some(Self::Navigate(NavInput::Prev)),
            "b" | "back" => Some(Self::Back),
            "all" => Some(Self::BuyAll),
            "q" | "quit" => Some(Self::Quit),
            "?" | "h" | "help" => Some(Self::Help),
            other => other.parse::<usize>().ok().map(Self::Select),
        }
    }
}

fn print_help() {
    println!("  <number>  open a block");
    println!("  all       buy all blocks");
    println!("  n / p     next / previous question (Enter also advances)");
    println!("  b         back to the block list");
    println!("  q         quit");
}

fn render(session: &ViewerSession) {
    match (session.screen(), map_question(session)) {
        (Screen::Questions, Some(vm)) => {
            println!();
            println!("[{} · {}]", vm.block_name, vm.progress);
            println!("{}", vm.text);
        }
        _ => {
            let vm = map_catalog(session);
            println!();
            if let Some(greeting) = vm.greeting {
                println!("{greeting}");
            }
            if vm.blocks.is_empty() {
                println!("No blocks yet.");
            }
            for (position, card) in vm.blocks.iter().enumerate() {
                println!("{:>3}. {} [{}]", position + 1, card.name, card.label);
            }
            println!("all. {}", vm.buy_all_label);
        }
    }
}

/// Browse the catalog from the terminal until `q` or end of input.
///
/// # Errors
///
/// Returns an error if stdin cannot be read.
pub async fn browse(backend: Arc<dyn Backend>, viewer: Option<Viewer>) -> io::Result<()> {
    let host = TerminalHost::new();
    let mut controller = ViewerController::new(backend, viewer);

    controller.dispatch(Event::Started, &host).await;
    render(controller.session());
    print_help();

    while let Some(line) = host.read_line().await? {
        let Some(command) = Command::parse(&line.to_ascii_lowercase()) else {
            println!("unknown command: {line} (type ? for help)");
            continue;
        };
        let event = match command {
            Command::Quit => break,
            Command::Help => {
                print_help();
                continue;
            }
            Command::Select(position) => {
                let target = position
                    .checked_sub(1)
                    .and_then(|index| controller.session().catalog().get(index))
                    .map(|block| block.id());
                match target {
                    Some(block_id) => Event::BlockSelected(block_id),
                    None => {
                        println!("no block #{position}");
                        continue;
                    }
                }
            }
            Command::Navigate(input) => Event::Navigate(input),
            Command::Back => Event::BackToCatalog,
            Command::BuyAll => Event::BuyAllRequested,
        };
        controller.dispatch(event, &host).await;
        render(controller.session());
    }

    controller.settle().await;
    Ok(())
}
