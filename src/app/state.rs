use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, SyncSender, TrySendError};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use crossterm::event::{self, Event};
use log::{debug, error, info, warn};
use ratatui::{backend::Backend, Terminal};

use super::{Action, HostEvent, InputEvent, ViewerModel};
use crate::buffer::Storage;
use crate::ui::HexView;

/// 入力キューの容量
pub const INPUT_QUEUE_CAPACITY: usize = 8;

/// 入力スレッドのポーリング間隔
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// モデルをロックする
fn lock(model: &Mutex<ViewerModel>) -> Result<MutexGuard<'_, ViewerModel>> {
    model.lock().map_err(|_| anyhow!("view model lock poisoned"))
}

/// アプリケーション状態
pub struct App<S: Storage> {
    /// ファイルアクセス
    storage: S,
    /// 表示中のファイル
    path: PathBuf,
    /// 描画スレッドと共有するモデル
    model: Arc<Mutex<ViewerModel>>,
    /// 終了フラグ
    should_quit: bool,
}

impl<S: Storage> App<S> {
    /// 新しいアプリケーションを作成
    pub fn new(storage: S, path: impl Into<PathBuf>) -> Self {
        Self {
            storage,
            path: path.into(),
            model: Arc::new(Mutex::new(ViewerModel::new())),
            should_quit: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// ファイル名を取得
    pub fn filename(&self) -> Option<&str> {
        self.path.file_name().and_then(|s| s.to_str())
    }

    /// 共有モデルへの参照
    pub fn model(&self) -> Arc<Mutex<ViewerModel>> {
        Arc::clone(&self.model)
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// 先頭ウィンドウを読み込む
    pub fn open(&mut self) -> Result<()> {
        let mut model = lock(&self.model)?;
        model.reload(&self.storage, &self.path)?;
        info!(
            "Opened {} ({} bytes in first window)",
            self.path.display(),
            model.window().len()
        );
        Ok(())
    }

    /// アクションを実行
    pub fn execute(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.should_quit = true;
                return Ok(());
            }
            Action::None => return Ok(()),
            _ => {}
        }

        let mut model = lock(&self.model)?;
        match action {
            Action::ScrollUp => model.scroll_up(&self.storage, &self.path)?,
            Action::ScrollDown => model.scroll_down(&self.storage, &self.path)?,
            Action::ToggleMode => model.toggle_mode(),
            Action::Quit | Action::None => {}
        }

        debug!(
            "{:?}: line {} offset {} mode {:?} | {}",
            action,
            model.line(),
            model.offset(),
            model.mode(),
            HexView::new(&model).row_text(0).unwrap_or_default()
        );
        Ok(())
    }

    /// メインループ
    ///
    /// 描画は別スレッドで行い、モデルはミューテックス越しに共有する。
    /// Back で終了するか入力キューが閉じるまで戻らない。
    pub fn run<B>(&mut self, terminal: &mut Terminal<B>, events: &Receiver<HostEvent>) -> Result<()>
    where
        B: Backend + Send,
    {
        if let Err(e) = self.open() {
            error!("Unable to load file: {}: {:#}", self.path.display(), e);
            return Err(e);
        }

        let (redraw_tx, redraw_rx) = mpsc::channel();
        let model = Arc::clone(&self.model);

        thread::scope(|scope| {
            let renderer = thread::Builder::new()
                .name("hexview-draw".to_string())
                .spawn_scoped(scope, move || render_loop(terminal, &model, redraw_rx))
                .context("failed to spawn draw thread")?;

            let result = self.event_loop(events, &redraw_tx);

            // 送信側を閉じて描画スレッドを終了させる
            drop(redraw_tx);
            let rendered = renderer
                .join()
                .map_err(|_| anyhow!("draw thread panicked"))?;

            result.and(rendered)
        })
    }

    /// 入力キューからイベントを受け取って処理
    fn event_loop(&mut self, events: &Receiver<HostEvent>, redraw: &Sender<()>) -> Result<()> {
        // 初回描画
        if redraw.send(()).is_err() {
            return Ok(());
        }

        while let Ok(event) = events.recv() {
            if let HostEvent::Input(input) = event {
                let action = Action::from_input(input);
                if action == Action::None {
                    continue;
                }

                if let Err(e) = self.execute(action) {
                    error!("Unable to load file: {}: {:#}", self.path.display(), e);
                    return Err(e);
                }

                if self.should_quit {
                    break;
                }
            }

            // 描画スレッドが終了していたら抜ける（エラーは join で拾う）
            if redraw.send(()).is_err() {
                break;
            }
        }

        Ok(())
    }
}

/// 再描画要求ごとにモデルを描画
fn render_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    model: &Mutex<ViewerModel>,
    requests: Receiver<()>,
) -> Result<()> {
    while requests.recv().is_ok() {
        // 溜まった要求はまとめて1回で描く
        while requests.try_recv().is_ok() {}

        let model = lock(model)?;
        terminal
            .draw(|f| f.render_widget(HexView::new(&model), f.area()))
            .context("failed to draw")?;
    }
    Ok(())
}

/// 入力スレッドのハンドル
pub struct InputThread {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl InputThread {
    /// スレッドを止めて待つ
    pub fn stop(self) {
        self.stop.store(true, Ordering::Relaxed);
        if self.handle.join().is_err() {
            warn!("input thread panicked");
        }
    }
}

/// ターミナルのキー入力をキューに流すスレッドを起動
///
/// キューが一杯のときは待たずに捨てる。
pub fn spawn_input_thread(queue: SyncSender<HostEvent>) -> Result<InputThread> {
    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);

    let handle = thread::Builder::new()
        .name("hexview-input".to_string())
        .spawn(move || input_loop(&queue, &flag))
        .context("failed to spawn input thread")?;

    Ok(InputThread { stop, handle })
}

fn input_loop(queue: &SyncSender<HostEvent>, stop: &AtomicBool) {
    while !stop.load(Ordering::Relaxed) {
        let event = match event::poll(POLL_INTERVAL) {
            Ok(false) => continue,
            Ok(true) => match event::read() {
                Ok(event) => event,
                Err(e) => {
                    error!("Failed to read input: {}", e);
                    break;
                }
            },
            Err(e) => {
                error!("Failed to poll input: {}", e);
                break;
            }
        };

        if forward(queue, event).is_break() {
            break;
        }
    }
}

/// ターミナルイベントを変換してキューに入れる
///
/// 待たずに送る。キューが一杯なら捨てて警告、受信側が閉じていれば `Break`。
fn forward(queue: &SyncSender<HostEvent>, event: Event) -> ControlFlow<()> {
    let host_event = match event {
        Event::Key(key) => match InputEvent::from_key_event(key) {
            Some(input) => HostEvent::Input(input),
            None => return ControlFlow::Continue(()),
        },
        Event::Resize(..) => HostEvent::Resize,
        _ => return ControlFlow::Continue(()),
    };

    match queue.try_send(host_event) {
        Ok(()) => ControlFlow::Continue(()),
        Err(TrySendError::Full(dropped)) => {
            warn!("Input queue full, dropped {:?}", dropped);
            ControlFlow::Continue(())
        }
        Err(TrySendError::Disconnected(_)) => ControlFlow::Break(()),
    }
}
