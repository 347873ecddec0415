mod cli;

use std::cell::RefCell;

use anyhow::{Context, Result};
use clap::Parser;
use form_shell::render::view_text;
use form_shell::{Command, Controller, ViewState};
use scenario_client::{ClientConfig, ScenarioClient};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{parse_line, Cli, Line, LogFormat, HELP};

fn init_tracing(cli: &Cli) {
    let filter = EnvFilter::try_new(&cli.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    match cli.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

struct Console {
    controller: Controller<ScenarioClient>,
    view: RefCell<ViewState>,
}

impl Console {
    async fn run(&self, command: Command) {
        if let Err(err) = self.controller.dispatch(&self.view, command).await {
            error!(command = command.name(), error = %err, "command failed");
        }
        for message in self.view.borrow_mut().take_notifications() {
            println!(">> {message}");
        }
        if command != Command::Refresh {
            print!("{}", view_text(&self.view.borrow()));
        }
    }

    /// Returns `false` once the user asks to quit.
    async fn handle(&self, line: Line) -> bool {
        match line {
            Line::Set(field, value) => self.view.borrow_mut().form.set(field, value),
            Line::Email(address) => self.view.borrow_mut().form.report_email = address,
            Line::Select(id) => {
                if !self.view.borrow_mut().selector.select_value(&id) {
                    println!("no saved scenario with id {id}");
                }
            }
            Line::Run(command) => self.run(command).await,
            Line::Show => print!("{}", view_text(&self.view.borrow())),
            Line::Help => println!("{HELP}"),
            Line::Quit => return false,
            Line::Blank => {}
        }
        true
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let client = ScenarioClient::new(ClientConfig::default().with_base_url(&cli.base_url))
        .with_context(|| format!("cannot use {} as the service address", cli.base_url))?;
    info!(base_url = %client.base_url(), "roi console ready");

    let console = Console {
        controller: Controller::new(client),
        view: RefCell::new(ViewState::new()),
    };
    console.run(Command::Refresh).await;
    print!("{}", view_text(&console.view.borrow()));
    println!("type `help` for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        match parse_line(&line) {
            Ok(parsed) => {
                if !console.handle(parsed).await {
                    break;
                }
            }
            Err(message) => println!("{message}"),
        }
    }
    Ok(())
}
