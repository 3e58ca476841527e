use std::io::{self, Stdout};
use std::sync::mpsc::{self, Receiver};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{enable_raw_mode, EnterAlternateScreen, SetTitle},
};
use log::info;
use ratatui::{backend::CrosstermBackend, Terminal};

use hexview::app::{spawn_input_thread, App, HostEvent, INPUT_QUEUE_CAPACITY};
use hexview::buffer::FsStorage;
use hexview::config::Config;
use hexview::logging;
use hexview::terminal::terminal_guard;
use hexview::ui::FilePicker;

fn main() -> Result<()> {
    let config = Config::parse();

    logging::init(config.log_file())?;

    // ターミナルの初期化（以降はどこで抜けても元に戻す）
    enable_raw_mode()?;
    let guard = terminal_guard();
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // 入力スレッド -> キュー -> メインループ
    let (tx, rx) = mpsc::sync_channel(INPUT_QUEUE_CAPACITY);
    let result = match spawn_input_thread(tx) {
        Ok(input) => {
            let result = run_app(&mut terminal, &config, &rx);
            input.stop();
            result
        }
        Err(e) => Err(e),
    };

    // ターミナルの後処理
    drop(terminal);
    guard.restore();

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    config: &Config,
    events: &Receiver<HostEvent>,
) -> Result<()> {
    // 引数で指定されていなければファイル選択ダイアログ
    let path = match config.file() {
        Some(path) => path.to_path_buf(),
        None => {
            let picker = FilePicker::new(config.start_dir(), config.extension()).with_context(
                || format!("unable to open directory {}", config.start_dir().display()),
            )?;
            match picker.run(terminal, events)? {
                Some(path) => path,
                None => return Ok(()),
            }
        }
    };

    let mut app = App::new(FsStorage::new(), path);

    // ウィンドウタイトルを設定
    let title = format!("hexview - {}", app.filename().unwrap_or("[unnamed]"));
    execute!(terminal.backend_mut(), SetTitle(&title))?;

    app.run(terminal, events)?;
    info!("Closed {}", app.path().display());

    Ok(())
}
