//! Interactive terminal shell over a [`Gallery`].
//!
//! Reads one command per line, dispatches `search` and `load_more` to the
//! gallery, manages the detail overlay, and re-renders after every change.

mod command;
mod overlay;

pub use command::{Command, CommandError};
pub use overlay::DetailOverlay;

use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::gallery::{FetchHandle, Gallery, Phase};
use crate::ui::{self, Spinner, Status};

/// Whether the shell keeps reading input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Line-oriented presentation shell
#[derive(Debug)]
pub struct Shell {
    gallery: Gallery,
    overlay: DetailOverlay,
    interactive: bool,
}

impl Shell {
    /// Create a shell; `interactive` enables the prompt and spinner
    pub fn new(gallery: Gallery, interactive: bool) -> Self {
        Self {
            gallery,
            overlay: DetailOverlay::new(),
            interactive,
        }
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    pub fn overlay(&self) -> &DetailOverlay {
        &self.overlay
    }

    /// Read and execute commands until `quit` or end of input
    pub async fn run<R>(&mut self, input: R) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        if self.interactive {
            ui::print_banner(self.gallery.source_name());
        }

        let mut lines = input.lines();
        loop {
            self.prompt()?;
            let Some(line) = lines.next_line().await? else {
                break;
            };

            match line.parse::<Command>() {
                Ok(command) => {
                    if self.handle(command).await == Flow::Exit {
                        break;
                    }
                }
                Err(e) => ui::print_status(Status::Warning, &e.to_string()),
            }
        }

        tracing::debug!("Shell input closed");
        Ok(())
    }

    fn prompt(&self) -> std::io::Result<()> {
        if !self.interactive {
            return Ok(());
        }
        let mut stdout = std::io::stdout();
        write!(stdout, "gallery> ")?;
        stdout.flush()
    }

    /// Execute one command
    pub async fn handle(&mut self, command: Command) -> Flow {
        match command {
            Command::Search(query) => {
                match self.gallery.search(&query) {
                    Some(fetch) => self.settle(fetch).await,
                    None => ui::print_status(Status::Info, "Enter some search terms."),
                }
                self.render();
            }
            Command::More => match self.gallery.load_more() {
                Some(fetch) => {
                    self.settle(fetch).await;
                    self.render();
                }
                None => ui::print_status(Status::Warning, self.load_more_refusal()),
            },
            Command::Open(number) => {
                let record = number
                    .checked_sub(1)
                    .and_then(|index| self.gallery.result(index));
                match record {
                    Some(record) => {
                        self.overlay.select_image(&record);
                        if let Some(selected) = self.overlay.visible() {
                            ui::print_detail_overlay(selected);
                        }
                    }
                    None => ui::print_status(
                        Status::Warning,
                        &format!(
                            "No photo #{} (showing {})",
                            number,
                            self.gallery.results().len()
                        ),
                    ),
                }
            }
            Command::Close => {
                if self.overlay.is_open() {
                    self.overlay.deselect_image();
                    self.render();
                } else {
                    ui::print_status(Status::Info, "No photo is open.");
                }
            }
            Command::List => self.render(),
            Command::Status => ui::print_state_summary(&self.gallery.snapshot()),
            Command::Help => ui::print_help(),
            Command::Quit => return Flow::Exit,
            Command::Empty => {}
        }

        Flow::Continue
    }

    /// Wait for a fetch while showing the loading indicator
    async fn settle(&self, fetch: FetchHandle) {
        let spinner = if self.interactive {
            Spinner::new(&format!(
                "Loading \"{}\" page {}...",
                fetch.query(),
                fetch.page()
            ))
        } else {
            Spinner::hidden()
        };

        let phase = fetch.wait().await;
        spinner.finish();

        if phase == Phase::Loaded {
            tracing::debug!(
                page = self.gallery.page(),
                total_pages = self.gallery.total_pages(),
                "Fetch settled"
            );
        }
    }

    fn load_more_refusal(&self) -> &'static str {
        let state = self.gallery.snapshot();
        if state.loading {
            "Still loading, please wait."
        } else if state.results.is_empty() {
            "Search for something first."
        } else {
            "You have reached the last page."
        }
    }

    fn render(&self) {
        let state = self.gallery.snapshot();
        if state.loading {
            ui::print_status(Status::Info, "Loading...");
        }
        ui::print_gallery(&state);
        if let Some(selected) = self.overlay.visible() {
            ui::print_detail_overlay(selected);
        }
    }
}
