use std::ops::ControlFlow;

use clap::Subcommand;
use chronos_core::{run_ticks, Config, TickExit, Ticker};

use super::{open_controller, print_json, CmdResult};

#[derive(Subcommand)]
pub enum FastAction {
    /// Start a fast (no-op if one is running)
    Start,
    /// End the fast and record completed phases
    Stop,
    /// Discard the running fast without recording it
    Reset,
    /// Print the current session snapshot as JSON
    Status,
    /// Stream events and snapshots, one JSON line per tick, until Ctrl-C
    Watch,
}

pub fn run(action: FastAction, config: &Config) -> CmdResult {
    let mut controller = open_controller(config)?;

    match action {
        FastAction::Start => match controller.start() {
            Some(event) => print_json(&event)?,
            None => print_json(&controller.snapshot())?,
        },
        FastAction::Stop => match controller.stop() {
            Some(event) => print_json(&event)?,
            None => print_json(&controller.snapshot())?,
        },
        FastAction::Reset => {
            if let Some(event) = controller.reset() {
                print_json(&event)?;
            }
        }
        FastAction::Status => {
            controller.tick();
            print_json(&controller.snapshot())?;
        }
        FastAction::Watch => {
            if !controller.is_running() {
                controller.tick();
                return print_json(&controller.snapshot());
            }

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;

            let mut failure: Option<serde_json::Error> = None;
            let exit = runtime.block_on(async {
                let mut ticker = Ticker::from_config(&config.timer);
                let shutdown = async {
                    let _ = tokio::signal::ctrl_c().await;
                };
                run_ticks(&mut controller, &mut ticker, shutdown, |c, events| {
                    for event in events.iter().chain(std::iter::once(&c.snapshot())) {
                        match serde_json::to_string(event) {
                            Ok(line) => println!("{line}"),
                            Err(e) => {
                                failure = Some(e);
                                return ControlFlow::Break(());
                            }
                        }
                    }
                    ControlFlow::Continue(())
                })
                .await
            });

            if let Some(e) = failure {
                return Err(e.into());
            }
            tracing::debug!(?exit, "watch finished");
            if exit == TickExit::Shutdown {
                eprintln!("stopped watching; the fast is still running");
            }
        }
    }

    Ok(())
}
