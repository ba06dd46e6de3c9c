pub mod config;
pub mod display;
pub mod runtime;
pub mod score;
pub mod session;
pub mod ui;
pub mod words;

use crate::{
    config::{Config, ConfigStore, FileConfigStore},
    display::{DisplayState, WordFlow, MAX_ZOOM, MIN_ZOOM},
    runtime::{spawn_event_channel, AppEvent, TICK_INTERVAL},
    session::Session,
    words::{Dictionary, DictionaryError},
};
use anyhow::Context;
use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::{
    event::{KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io::{self, stdin};

/// one minute typing speed test in the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type the highlighted word and commit it with a space. After sixty seconds the test ends and every correctly typed word counts towards your score."
)]
pub struct Cli {
    /// number of words to draw for the test
    #[clap(short = 'w', long)]
    number_of_words: Option<usize>,

    /// dictionary to draw words from
    #[clap(short = 'd', long, value_enum)]
    dictionary: Option<SupportedDictionary>,
}

#[derive(Debug, Copy, Clone, ValueEnum, strum_macros::Display)]
pub enum SupportedDictionary {
    /// words of two to six letters
    Standard,
    /// words of two to four letters
    Short,
}

impl SupportedDictionary {
    /// File stem of the embedded dictionary under `data/`.
    fn file_name(&self) -> &'static str {
        match self {
            SupportedDictionary::Standard => "words_2-6",
            SupportedDictionary::Short => "words_2-4",
        }
    }

    fn config_name(&self) -> String {
        self.to_string().to_lowercase()
    }

    fn from_config_name(name: &str) -> Option<Self> {
        match name {
            "standard" => Some(SupportedDictionary::Standard),
            "short" => Some(SupportedDictionary::Short),
            _ => None,
        }
    }
}

/// Options in effect for this run: the config file fills in whatever the
/// command line left unset.
#[derive(Debug, Clone)]
pub struct Settings {
    pub number_of_words: usize,
    pub dictionary: SupportedDictionary,
}

impl Settings {
    fn resolve(cli: &Cli, config: &Config) -> Self {
        Self {
            number_of_words: cli.number_of_words.unwrap_or(config.number_of_words),
            dictionary: cli
                .dictionary
                .or_else(|| SupportedDictionary::from_config_name(&config.dictionary))
                .unwrap_or(SupportedDictionary::Standard),
        }
    }
}

#[derive(Debug)]
pub struct App {
    pub settings: Settings,
    pub dictionary: Dictionary,
    pub session: Session,
    pub display: DisplayState,
    pub config_store: FileConfigStore,
}

impl App {
    pub fn new(cli: &Cli, config_store: FileConfigStore) -> Result<Self, DictionaryError> {
        let config = config_store.load();
        let settings = Settings::resolve(cli, &config);
        let dictionary = Dictionary::bundled(settings.dictionary.file_name())?;
        let words = dictionary.sample(settings.number_of_words)?;
        let mut display = DisplayState::new(words.len());
        display.zoom = config.zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        Ok(Self {
            session: Session::new(words),
            settings,
            dictionary,
            display,
            config_store,
        })
    }

    /// Throw the round away: fresh word draw, zeroed tallies, full timer.
    pub fn reset(&mut self) -> Result<(), DictionaryError> {
        let words = self.dictionary.sample(self.settings.number_of_words)?;
        self.display = DisplayState::new(words.len());
        self.session = Session::new(words);
        Ok(())
    }

    /// Run the keystroke buffer through the engine. The engine gets the
    /// same word panel geometry the renderer draws with, so its wrap
    /// bookkeeping matches what is on screen.
    pub fn submit_buffer(&mut self, panel_width: u16) {
        let flow = WordFlow::new(self.session.words.words(), panel_width, self.display.zoom);
        let events = self.session.submit_input(&self.display.buffer, &flow);
        if self.display.buffer.ends_with(char::is_whitespace) {
            self.display.buffer.clear();
        }
        self.display.apply_all(&events);
    }

    fn current_config(&self) -> Config {
        Config {
            number_of_words: self.settings.number_of_words,
            dictionary: self.settings.dictionary.config_name(),
            zoom: self.display.zoom,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let mut app =
        App::new(&cli, FileConfigStore::new()).context("could not prepare the word draw")?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result?;

    app.config_store
        .save(&app.current_config())
        .context("could not save the config file")?;

    Ok(())
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> anyhow::Result<()> {
    let events = spawn_event_channel(TICK_INTERVAL);

    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        match events.recv()? {
            AppEvent::Tick => {
                let ticked = app.session.on_tick();
                app.display.apply_all(&ticked);
            }
            AppEvent::Resize => {
                // redrawn at the top of the loop
            }
            AppEvent::Key(key) => match key.code {
                KeyCode::Esc => break,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
                KeyCode::Left => {
                    if app.display.restart_enabled {
                        app.reset()?;
                    }
                }
                KeyCode::Up => app.display.decrease_density(),
                KeyCode::Down => app.display.increase_density(),
                KeyCode::Backspace => {
                    app.display.buffer.pop();
                    let width = panel_width(terminal)?;
                    app.submit_buffer(width);
                }
                KeyCode::Char('r') if app.session.has_finished() => app.reset()?,
                KeyCode::Char(c) => {
                    if !app.session.has_finished() {
                        app.display.buffer.push(c);
                        let width = panel_width(terminal)?;
                        app.submit_buffer(width);
                    }
                }
                _ => {}
            },
        }
    }

    Ok(())
}

/// Width of the word panel, which the layout carves out of the terminal
/// with a fixed horizontal margin on both sides.
fn panel_width<B: Backend>(terminal: &Terminal<B>) -> io::Result<u16> {
    Ok(terminal
        .size()?
        .width
        .saturating_sub(2 * ui::HORIZONTAL_MARGIN))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{IDLE_HINT, RUNNING_HINT};
    use crate::score::TEST_SECONDS;
    use crate::session::Outcome;
    use crate::words::WordList;
    use clap::Parser;
    use tempfile::tempdir;

    fn test_app(words: &[&str]) -> App {
        let list = WordList::new(words.iter().map(|w| w.to_string()).collect());
        App {
            settings: Settings {
                number_of_words: words.len(),
                dictionary: SupportedDictionary::Standard,
            },
            dictionary: Dictionary::from_json("test", r#"{"ab":1,"cat":1,"dog":1}"#).unwrap(),
            display: DisplayState::new(list.len()),
            session: Session::new(list),
            config_store: FileConfigStore::with_path("typethis-main-test-config.json"),
        }
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["typethis"]);

        assert!(cli.number_of_words.is_none());
        assert!(cli.dictionary.is_none());
    }

    #[test]
    fn test_cli_number_of_words() {
        let cli = Cli::parse_from(["typethis", "-w", "40"]);
        assert_eq!(cli.number_of_words, Some(40));

        let cli = Cli::parse_from(["typethis", "--number-of-words", "250"]);
        assert_eq!(cli.number_of_words, Some(250));
    }

    #[test]
    fn test_cli_dictionary() {
        let cli = Cli::parse_from(["typethis", "-d", "standard"]);
        assert!(matches!(cli.dictionary, Some(SupportedDictionary::Standard)));

        let cli = Cli::parse_from(["typethis", "--dictionary", "short"]);
        assert!(matches!(cli.dictionary, Some(SupportedDictionary::Short)));
    }

    #[test]
    fn test_dictionary_file_names() {
        assert_eq!(SupportedDictionary::Standard.file_name(), "words_2-6");
        assert_eq!(SupportedDictionary::Short.file_name(), "words_2-4");
    }

    #[test]
    fn test_dictionary_display() {
        assert_eq!(SupportedDictionary::Standard.to_string(), "Standard");
        assert_eq!(SupportedDictionary::Short.to_string(), "Short");
    }

    #[test]
    fn test_dictionary_config_names_round_trip() {
        for dict in [SupportedDictionary::Standard, SupportedDictionary::Short] {
            let name = dict.config_name();
            assert!(matches!(
                SupportedDictionary::from_config_name(&name),
                Some(back) if back.file_name() == dict.file_name()
            ));
        }
        assert!(SupportedDictionary::from_config_name("klingon").is_none());
    }

    #[test]
    fn test_settings_prefer_cli_over_config() {
        let cli = Cli {
            number_of_words: Some(40),
            dictionary: Some(SupportedDictionary::Short),
        };
        let config = Config {
            number_of_words: 250,
            dictionary: "standard".to_string(),
            zoom: 1,
        };

        let settings = Settings::resolve(&cli, &config);

        assert_eq!(settings.number_of_words, 40);
        assert!(matches!(settings.dictionary, SupportedDictionary::Short));
    }

    #[test]
    fn test_settings_fall_back_to_config() {
        let cli = Cli {
            number_of_words: None,
            dictionary: None,
        };
        let config = Config {
            number_of_words: 100,
            dictionary: "short".to_string(),
            zoom: 1,
        };

        let settings = Settings::resolve(&cli, &config);

        assert_eq!(settings.number_of_words, 100);
        assert!(matches!(settings.dictionary, SupportedDictionary::Short));
    }

    #[test]
    fn test_settings_ignore_unknown_config_dictionary() {
        let cli = Cli {
            number_of_words: None,
            dictionary: None,
        };
        let config = Config {
            number_of_words: 250,
            dictionary: "klingon".to_string(),
            zoom: 1,
        };

        let settings = Settings::resolve(&cli, &config);

        assert!(matches!(settings.dictionary, SupportedDictionary::Standard));
    }

    #[test]
    fn test_app_new_samples_requested_words() {
        let dir = tempdir().unwrap();
        let cli = Cli {
            number_of_words: Some(12),
            dictionary: Some(SupportedDictionary::Short),
        };

        let app = App::new(&cli, FileConfigStore::with_path(dir.path().join("config.json")))
            .unwrap();

        assert_eq!(app.session.words.len(), 12);
        assert_eq!(app.display.marks.len(), 12);
        assert_eq!(app.session.remaining_seconds, TEST_SECONDS);
        assert!(!app.session.has_started());
    }

    #[test]
    fn test_app_new_rejects_oversized_draw() {
        let dir = tempdir().unwrap();
        let cli = Cli {
            number_of_words: Some(1_000_000),
            dictionary: None,
        };

        let err = App::new(&cli, FileConfigStore::with_path(dir.path().join("config.json")))
            .unwrap_err();

        assert!(matches!(err, DictionaryError::TooFewWords { .. }));
    }

    #[test]
    fn test_submit_buffer_judges_on_whitespace() {
        let mut app = test_app(&["ab", "cat", "dog"]);

        app.display.buffer.push('a');
        app.submit_buffer(60);

        assert!(app.session.has_started());
        assert_eq!(app.display.buffer, "a");
        assert_eq!(app.session.cursor, 0);

        app.display.buffer.push('b');
        app.display.buffer.push(' ');
        app.submit_buffer(60);

        assert!(app.display.buffer.is_empty());
        assert_eq!(app.session.correct_words, 1);
        assert_eq!(app.display.active, 1);
        assert_eq!(app.display.hint, RUNNING_HINT);
    }

    #[test]
    fn test_app_reset_clears_round() {
        let mut app = test_app(&["ab", "cat", "dog"]);

        app.display.buffer.push_str("ab ");
        app.submit_buffer(60);
        assert_eq!(app.session.correct_words, 1);
        assert_eq!(app.display.marks[0], Some(Outcome::Correct));

        app.reset().unwrap();

        assert_eq!(app.session.cursor, 0);
        assert_eq!(app.session.correct_words, 0);
        assert_eq!(app.session.remaining_seconds, TEST_SECONDS);
        assert_eq!(app.session.words.len(), 3);
        assert_eq!(app.display.hint, IDLE_HINT);
        assert!(app.display.marks.iter().all(|m| m.is_none()));
        assert!(app.display.buffer.is_empty());
        assert!(!app.session.has_started());

        // A tick queued before the reset lands on the new session: inert.
        assert!(app.session.on_tick().is_empty());
        assert_eq!(app.session.remaining_seconds, TEST_SECONDS);
    }

    #[test]
    fn test_current_config_tracks_zoom() {
        let mut app = test_app(&["ab", "cat", "dog"]);
        app.display.decrease_density();

        let config = app.current_config();

        assert_eq!(config.zoom, 2);
        assert_eq!(config.dictionary, "standard");
        assert_eq!(config.number_of_words, 3);
    }
}
