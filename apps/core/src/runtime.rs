use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use thiserror::Error;

use crate::config::{self, Config, ConfigError};
use crate::contract::{IndicatorDto, LabelDto, LinkDto, PageSpec, ReplayReport, StepDto};
use crate::controller::{ControllerOptions, SearchController};
use crate::document::Document;
use crate::hotkey::{parse_key_script, KeyEvent, KeyParseError};
use crate::memory_dom::{MemoryDocument, PageError};
use crate::model::{ElementId, LinkRef};
use crate::overlay_state::Mode;
use crate::popup::SettingsPopup;
use crate::settings::{FileSettingsStore, SettingsError, SettingsLoad};

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),
    #[error("page error: {0}")]
    Page(#[from] PageError),
    #[error("key script error: {0}")]
    Keys(#[from] KeyParseError),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Parser)]
#[command(name = "typeahead-core", version, about = "Type-ahead link navigation")]
pub struct Cli {
    /// Config file (TOML, or JSON5 by extension).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a key script against a page description and print the outcome.
    Replay(ReplayArgs),
    /// Show or change the mnemonic setting.
    Settings(SettingsArgs),
}

#[derive(Debug, Args)]
pub struct ReplayArgs {
    #[arg(long)]
    pub page: PathBuf,
    /// e.g. "/ home ArrowDown Enter"
    #[arg(long)]
    pub keys: String,
    /// Overrides the stored setting.
    #[arg(long, value_enum)]
    pub mnemonics: Option<Toggle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

#[derive(Debug, Args)]
pub struct SettingsArgs {
    #[arg(long, conflicts_with_all = ["enable", "disable"])]
    pub toggle: bool,
    #[arg(long, conflicts_with = "disable")]
    pub enable: bool,
    #[arg(long)]
    pub disable: bool,
}

pub fn load_config(cli: &Cli) -> Result<Config, RuntimeError> {
    Ok(config::load(cli.config.as_deref())?)
}

pub fn run(cli: Cli, cfg: Config) -> Result<(), RuntimeError> {
    match cli.command {
        Command::Replay(args) => {
            let raw = fs::read_to_string(&args.page).map_err(|source| RuntimeError::Io {
                path: args.page.clone(),
                source,
            })?;
            let page: PageSpec = serde_json::from_str(&raw)?;
            let script = parse_key_script(&args.keys)?;

            // The replay waits for the settings read so its output is deterministic.
            let settings = match args.mnemonics {
                Some(toggle) => SettingsLoad::resolved(toggle == Toggle::On),
                None => {
                    let mut load =
                        SettingsLoad::spawn(FileSettingsStore::new(&cfg.settings_path));
                    let enabled = load.wait();
                    SettingsLoad::resolved(enabled)
                }
            };

            let report = replay(&page, &script, ControllerOptions::from(&cfg), settings)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Settings(args) => {
            let mut popup = SettingsPopup::open(FileSettingsStore::new(&cfg.settings_path));
            if args.toggle {
                popup.click_label()?;
            } else if args.enable {
                popup.set(true)?;
            } else if args.disable {
                popup.set(false)?;
            }
            let view = popup.view();
            println!(
                "mnemonics {} ({})",
                if view.toggle_enabled { "enabled" } else { "disabled" },
                cfg.settings_path.display()
            );
        }
    }
    Ok(())
}

/// Drives a controller over `script` on a fresh in-memory page.
pub fn replay(
    page: &PageSpec,
    script: &[KeyEvent],
    options: ControllerOptions,
    settings: SettingsLoad,
) -> Result<ReplayReport, RuntimeError> {
    let document = MemoryDocument::from_page(page)?;
    let mut controller = SearchController::new(document, options, settings);

    let mut steps = Vec::with_capacity(script.len());
    for event in script {
        let decision = controller.handle_key_down(event);
        steps.push(StepDto {
            key: event.to_string(),
            action: format!("{:?}", decision.action),
            prevented: decision.prevent_default,
        });
    }

    let doc = controller.document();
    let link_dto = |element: ElementId| {
        LinkDto::from(LinkRef::from_owned(
            element,
            doc.text_content(element),
            doc.resolved_href(element),
        ))
    };

    Ok(ReplayReport {
        steps,
        mode: match controller.mode() {
            Mode::Idle => "idle".to_string(),
            Mode::Searching => "searching".to_string(),
        },
        query: controller.query().to_string(),
        matches: controller.matches().iter().copied().map(link_dto).collect(),
        selected: controller.selected_index(),
        indicator: IndicatorDto::from(doc.indicator()),
        labels: controller
            .label_placements()
            .iter()
            .map(|placement| LabelDto {
                letter: placement.letter,
                link: placement.link.0,
                top: placement.top,
                left: placement.left,
                page_top: placement.page_top,
                page_left: placement.page_left,
            })
            .collect(),
        activated: doc.clicks().into_iter().map(link_dto).collect(),
    })
}
