//! Trendline - a desktop timeline chart for metric history and release
//! events.

mod demo;
mod style;
mod widget;

use data::timeline::{Dataset, DatasetError};
use iced::{Element, Task, Theme};

use widget::timeline::Timeline;

fn main() -> iced::Result {
    if let Err(err) = setup_logger() {
        eprintln!("logger setup failed: {err}");
    }

    let dataset = match std::env::args().nth(1) {
        Some(path) => match load_dataset(&path) {
            Ok(dataset) => {
                log::info!(
                    "loaded {}: {} series, {} snapshots, {} events",
                    path,
                    dataset.series.len(),
                    dataset.snapshot_count(),
                    dataset.events.len(),
                );
                dataset
            }
            Err(err) => {
                log::error!("failed to load {path}: {err}");
                std::process::exit(1);
            }
        },
        None => match demo::dataset() {
            Ok(dataset) => {
                log::info!("no dataset given, showing demo data");
                dataset
            }
            Err(err) => {
                log::error!("demo dataset rejected: {err}");
                std::process::exit(1);
            }
        },
    };

    iced::application(
        move || (App::new(dataset.clone()), Task::none()),
        App::update,
        App::view,
    )
    .title(App::title)
    .theme(App::theme)
    .run()
}

#[derive(thiserror::Error, Debug)]
enum LoadError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

fn load_dataset(path: &str) -> Result<Dataset, LoadError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(Dataset::from_json(&raw)?)
}

fn setup_logger() -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}] [{}] {}: {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ));
        })
        .level(log::LevelFilter::Info)
        .chain(std::io::stdout())
        .apply()?;
    Ok(())
}

struct App {
    dataset: Dataset,
}

#[derive(Debug, Clone, Copy)]
enum Message {}

impl App {
    fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }

    fn title(&self) -> String {
        format!("Trendline - {} snapshots", self.dataset.snapshot_count())
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {}
    }

    fn view(&self) -> Element<'_, Message> {
        iced::widget::container(Timeline::new(&self.dataset))
            .padding(8)
            .into()
    }

    fn theme(&self) -> Theme {
        Theme::Custom(data::config::theme::default_theme().into())
    }
}
