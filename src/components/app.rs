use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use gloo::events::{EventListener, EventListenerOptions};
use gloo::render::{AnimationFrame, request_animation_frame};
use gloo::timers::callback::{Interval, Timeout};
use gloo::timers::future::TimeoutFuture;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlCanvasElement, HtmlElement, KeyboardEvent};
use yew::prelude::*;

use super::achievements_panel::{AchievementRow, AchievementsPanel};
use super::controls_panel::ControlsPanel;
use super::leaderboard_panel::LeaderboardPanel;
use super::maze_canvas::{CanvasSurface, MazeCanvas, available_area};
use super::time_display::TimeDisplay;
use super::toasts::{Toast, ToastStack};
use super::win_popup::WinPopup;
use crate::api::HttpApi;
use crate::audio::AudioPlayer;
use crate::config::{DEFAULT_DIMENSION, GameConfig, TROPHY_IMAGE_SRC};
use crate::input::{KeyAction, map_key};
use crate::layout::{Rgb, Scene, Surface, render};
use crate::leaderboard::{self, BoardStatus, DimensionFilter, Leaderboard, ScoreEntry};
use crate::popup::{Popup, PopupContent};
use crate::session::{Command, Phase, Session, SessionEvent};
use crate::storage::{self, Settings};
use crate::timer::SystemClock;
use crate::util::{cdebug, cerror, clog, format_time, set_debug_logging};

/// Owns the session and every browser resource it needs. Commands emitted by the
/// session are executed here; async results come back in as events.
pub struct Driver {
    config: GameConfig,
    session: RefCell<Session>,
    board: Rc<RefCell<Leaderboard>>,
    api: HttpApi,
    audio: AudioPlayer,
    settings: RefCell<Settings>,
    surface: RefCell<Option<CanvasSurface>>,
    container: HtmlElement,
    queue: RefCell<VecDeque<SessionEvent>>,
    dispatching: Cell<bool>,
    refresh: RefCell<Option<Interval>>,
    popup_dismiss: RefCell<Option<Timeout>>,
    close_fallback: RefCell<Option<Timeout>>,
    resize_debounce: RefCell<Option<Timeout>>,
    frame: RefCell<Option<AnimationFrame>>,
    listeners: RefCell<Vec<EventListener>>,
    toasts: RefCell<Vec<Toast>>,
    next_toast: Cell<u32>,
    rerender: Callback<()>,
}

/// Everything the view needs for one render.
#[derive(Clone, PartialEq)]
pub struct Snapshot {
    pub status: String,
    pub elapsed: f64,
    pub finished: bool,
    pub solve_enabled: bool,
    pub popup: Option<PopupContent>,
    pub popup_visible: bool,
    pub achievements: Vec<AchievementRow>,
    pub toasts: Vec<Toast>,
    pub board_status: BoardStatus,
    pub entries: Vec<ScoreEntry>,
    pub muted: bool,
    pub player_color: String,
}

impl Snapshot {
    fn empty() -> Self {
        Self {
            status: String::new(),
            elapsed: 0.0,
            finished: false,
            solve_enabled: false,
            popup: None,
            popup_visible: false,
            achievements: Vec::new(),
            toasts: Vec::new(),
            board_status: BoardStatus::Loading,
            entries: Vec::new(),
            muted: false,
            player_color: Settings::default().player_color,
        }
    }
}

impl Driver {
    pub fn new(config: GameConfig, canvas: HtmlCanvasElement, container: HtmlElement, rerender: Callback<()>) -> Rc<Self> {
        let settings = Settings::load();
        let session = Session::new(config.clone(), Box::new(SystemClock), storage::load_player_name());
        Rc::new(Self {
            api: HttpApi::new(config.clone()),
            audio: AudioPlayer::new(config.music_volume, settings.muted),
            config,
            session: RefCell::new(session),
            board: Rc::new(RefCell::new(Leaderboard::default())),
            settings: RefCell::new(settings),
            surface: RefCell::new(CanvasSurface::new(canvas)),
            container,
            queue: RefCell::new(VecDeque::new()),
            dispatching: Cell::new(false),
            refresh: RefCell::new(None),
            popup_dismiss: RefCell::new(None),
            close_fallback: RefCell::new(None),
            resize_debounce: RefCell::new(None),
            frame: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
            toasts: RefCell::new(Vec::new()),
            next_toast: Cell::new(0),
            rerender,
        })
    }

    /// Feeds one event through the session. Events raised while commands are being
    /// executed are queued and handled in order by the outermost call.
    pub fn dispatch(self: &Rc<Self>, event: SessionEvent) {
        self.queue.borrow_mut().push_back(event);
        if self.dispatching.replace(true) {
            return;
        }
        loop {
            let Some(event) = self.queue.borrow_mut().pop_front() else {
                break;
            };
            let commands = self.session.borrow_mut().handle(event);
            for command in commands {
                self.execute(command);
            }
        }
        self.dispatching.set(false);
        self.rerender.emit(());
    }

    fn execute(self: &Rc<Self>, command: Command) {
        match command {
            Command::FetchMaze { generation, dimension } => {
                let d = Rc::clone(self);
                spawn_local(async move {
                    let result = d.api.fetch_maze(dimension).await;
                    d.dispatch(SessionEvent::MazeFetched { generation, result });
                });
            }
            Command::Solve { generation, grid, start, goal } => {
                let d = Rc::clone(self);
                spawn_local(async move {
                    let result = d.api.solve(&grid, start, goal).await;
                    d.dispatch(SessionEvent::SolveFetched { generation, result });
                });
            }
            Command::SubmitScore { generation, origin, name, time, dimension } => {
                let d = Rc::clone(self);
                spawn_local(async move {
                    let result = leaderboard::submit(&d.api, &d.board, &name, time, dimension).await;
                    d.dispatch(SessionEvent::ScoreSubmitted { generation, origin, result });
                });
            }
            Command::StartTimerRefresh => {
                let weak = Rc::downgrade(self);
                let tick = Interval::new(self.config.timer_refresh_ms, move || {
                    if let Some(d) = weak.upgrade() {
                        d.rerender.emit(());
                    }
                });
                *self.refresh.borrow_mut() = Some(tick);
            }
            Command::StopTimerRefresh => {
                self.refresh.borrow_mut().take();
            }
            Command::Redraw => self.schedule_redraw(),
            Command::ArmPopupDismiss(ms) => {
                *self.popup_dismiss.borrow_mut() = Some(self.timeout_event(ms, SessionEvent::PopupDismissTimeout));
            }
            Command::CancelPopupDismiss => {
                self.popup_dismiss.borrow_mut().take();
            }
            Command::ArmCloseFallback(ms) => {
                *self.close_fallback.borrow_mut() = Some(self.timeout_event(ms, SessionEvent::PopupCloseFallback));
            }
            Command::CancelCloseFallback => {
                self.close_fallback.borrow_mut().take();
            }
            Command::PromptName { time } => {
                let weak = Rc::downgrade(self);
                // let the closed popup paint before the blocking dialog
                spawn_local(async move {
                    TimeoutFuture::new(0).await;
                    let message = format!(
                        "Congratulations! Time: {}\nEnter your name for the leaderboard:",
                        format_time(time)
                    );
                    let answer = gloo::dialogs::prompt(&message, Some(""));
                    if let Some(d) = weak.upgrade() {
                        d.dispatch(SessionEvent::NameEntered(answer));
                    }
                });
            }
            Command::PersistName(name) => storage::save_player_name(&name),
            Command::NotifyAchievements(list) => {
                for (i, achievement) in list.into_iter().enumerate() {
                    let weak = Rc::downgrade(self);
                    let delay = self.config.toast_delay(i);
                    let visible = self.config.toast_visible_ms;
                    spawn_local(async move {
                        TimeoutFuture::new(delay).await;
                        let Some(id) = weak
                            .upgrade()
                            .map(|d| d.push_toast(format!("🏆 Achievement Unlocked: {}!", achievement.name)))
                        else {
                            return;
                        };
                        TimeoutFuture::new(visible).await;
                        if let Some(d) = weak.upgrade() {
                            d.remove_toast(id);
                        }
                    });
                }
            }
            Command::PauseMusic => self.audio.pause_music(),
            Command::PlayWinSound => self.audio.play_win_sound(),
            Command::TryStartMusic => self.audio.try_start_music(),
        }
    }

    fn timeout_event(self: &Rc<Self>, ms: u32, event: SessionEvent) -> Timeout {
        let weak = Rc::downgrade(self);
        Timeout::new(ms, move || {
            if let Some(d) = weak.upgrade() {
                d.dispatch(event);
            }
        })
    }

    /// Coalesces redraw requests into one paint per animation frame.
    fn schedule_redraw(self: &Rc<Self>) {
        if self.frame.borrow().is_some() {
            return;
        }
        let weak = Rc::downgrade(self);
        let handle = request_animation_frame(move |_| {
            if let Some(d) = weak.upgrade() {
                d.frame.borrow_mut().take();
                d.draw();
            }
        });
        *self.frame.borrow_mut() = Some(handle);
    }

    fn draw(&self) {
        let session = self.session.borrow();
        let mut surface = self.surface.borrow_mut();
        let Some(surface) = surface.as_mut() else {
            return;
        };
        match session.maze() {
            Some(maze) => {
                let scene = Scene {
                    maze,
                    player_color: Rgb::parse_or_fallback(&self.settings.borrow().player_color),
                    won: session.won(),
                };
                render(surface, available_area(&self.container), &scene);
            }
            None => surface.clear(),
        }
    }

    fn install_listeners(self: &Rc<Self>) {
        let Some(window) = web_sys::window() else {
            cerror("window unavailable, input disabled");
            return;
        };
        let mut listeners = Vec::new();

        if let Some(document) = window.document() {
            let weak = Rc::downgrade(self);
            listeners.push(EventListener::new_with_options(
                &document,
                "keydown",
                EventListenerOptions::enable_prevent_default(),
                move |event| {
                    let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                        return;
                    };
                    let action = map_key(&event.key());
                    if action.is_some() {
                        event.prevent_default();
                    }
                    if let Some(d) = weak.upgrade() {
                        d.dispatch(SessionEvent::Key(action));
                    }
                },
            ));
        }

        let weak = Rc::downgrade(self);
        listeners.push(EventListener::new(&window, "resize", move |_| {
            let Some(d) = weak.upgrade() else {
                return;
            };
            let inner: Weak<Self> = Rc::downgrade(&d);
            // replacing the handle cancels the previous pending redraw
            let debounce = Timeout::new(d.config.resize_debounce_ms, move || {
                if let Some(d) = inner.upgrade() {
                    d.schedule_redraw();
                }
            });
            *d.resize_debounce.borrow_mut() = Some(debounce);
        }));

        *self.listeners.borrow_mut() = listeners;
    }

    pub fn start(self: &Rc<Self>, dimension: u32) {
        clog("initializing game");
        self.install_listeners();
        self.refresh_leaderboard();
        self.dispatch(SessionEvent::RequestLoad(dimension));
    }

    pub fn shutdown(self: &Rc<Self>) {
        cdebug("tearing down game driver");
        self.listeners.borrow_mut().clear();
        let commands = self.session.borrow_mut().teardown();
        for command in commands {
            self.execute(command);
        }
        self.resize_debounce.borrow_mut().take();
        self.frame.borrow_mut().take();
    }

    pub fn refresh_leaderboard(self: &Rc<Self>) {
        let d = Rc::clone(self);
        spawn_local(async move {
            if let Err(e) = leaderboard::fetch_all(&d.api, &d.board).await {
                cdebug(&format!("leaderboard unavailable: {e}"));
            }
            d.rerender.emit(());
        });
    }

    pub fn toggle_mute(&self) {
        let muted = self.audio.toggle_mute();
        let mut settings = self.settings.borrow_mut();
        settings.muted = muted;
        settings.save();
        drop(settings);
        self.rerender.emit(());
    }

    pub fn set_player_color(self: &Rc<Self>, color: String) {
        {
            let mut settings = self.settings.borrow_mut();
            settings.player_color = color;
            settings.save();
        }
        self.schedule_redraw();
        self.rerender.emit(());
    }

    fn push_toast(&self, text: String) -> u32 {
        let id = self.next_toast.get();
        self.next_toast.set(id.wrapping_add(1));
        self.toasts.borrow_mut().push(Toast { id, text });
        self.rerender.emit(());
        id
    }

    fn remove_toast(&self, id: u32) {
        self.toasts.borrow_mut().retain(|t| t.id != id);
        self.rerender.emit(());
    }

    pub fn snapshot(&self, filter: DimensionFilter) -> Snapshot {
        let session = self.session.borrow();
        let board = self.board.borrow();
        let settings = self.settings.borrow();
        Snapshot {
            status: session.status().to_string(),
            elapsed: session.elapsed(),
            finished: session.won(),
            solve_enabled: *session.phase() == Phase::Playing && !session.won(),
            popup: session.popup().content().cloned(),
            popup_visible: matches!(session.popup(), Popup::Open(_)),
            achievements: session
                .achievements()
                .entries()
                .map(|(a, unlocked)| AchievementRow { name: a.name, description: a.description, unlocked })
                .collect(),
            toasts: self.toasts.borrow().clone(),
            board_status: board.status().clone(),
            entries: board.filtered(filter).into_iter().cloned().collect(),
            muted: self.audio.is_muted(),
            player_color: settings.player_color.clone(),
        }
    }
}

fn driver_callback<T: 'static>(
    driver: &Rc<RefCell<Option<Rc<Driver>>>>,
    f: impl Fn(&Rc<Driver>, T) + 'static,
) -> Callback<T> {
    let driver = driver.clone();
    Callback::from(move |value: T| {
        let current = driver.borrow().clone();
        if let Some(d) = current {
            f(&d, value);
        }
    })
}

#[function_component(App)]
pub fn app() -> Html {
    let container_ref = use_node_ref();
    let canvas_ref = use_node_ref();
    let driver = use_mut_ref(|| None::<Rc<Driver>>);
    let force = use_force_update();
    let selected_dimension = use_state(|| DEFAULT_DIMENSION);
    let filter = use_state(|| DimensionFilter::Size(DEFAULT_DIMENSION));

    {
        let driver = driver.clone();
        let container_ref = container_ref.clone();
        let canvas_ref = canvas_ref.clone();
        use_effect_with((), move |_| {
            let config = GameConfig::load();
            set_debug_logging(config.debug_logging);
            let rerender = Callback::from(move |_| force.force_update());
            let created = match (canvas_ref.cast::<HtmlCanvasElement>(), container_ref.cast::<HtmlElement>()) {
                (Some(canvas), Some(container)) => Some(Driver::new(config, canvas, container, rerender)),
                _ => {
                    cerror("canvas or its container missing, game not started");
                    None
                }
            };
            *driver.borrow_mut() = created.clone();
            if let Some(d) = &created {
                d.start(DEFAULT_DIMENSION);
            }
            move || {
                if let Some(d) = created {
                    d.shutdown();
                }
            }
        });
    }

    let on_new_maze = {
        let selected = selected_dimension.clone();
        driver_callback(&driver, move |d, ()| d.dispatch(SessionEvent::RequestLoad(*selected)))
    };
    let on_dimension = {
        let selected = selected_dimension.clone();
        Callback::from(move |dim: u32| selected.set(dim))
    };
    let on_solve = driver_callback(&driver, |d, ()| d.dispatch(SessionEvent::Key(Some(KeyAction::Solve))));
    let on_toggle_mute = driver_callback(&driver, |d, ()| d.toggle_mute());
    let on_color = driver_callback(&driver, |d, color: String| d.set_player_color(color));
    let on_close_popup = driver_callback(&driver, |d, ()| d.dispatch(SessionEvent::PopupCloseRequested));
    let on_popup_faded = driver_callback(&driver, |d, ()| d.dispatch(SessionEvent::PopupTransitionEnd));
    let on_filter = {
        let filter = filter.clone();
        Callback::from(move |f: DimensionFilter| filter.set(f))
    };

    let snap = driver
        .borrow()
        .as_ref()
        .map(|d| d.snapshot(*filter))
        .unwrap_or_else(Snapshot::empty);

    html! {
        <div style="display:flex; flex-direction:column; height:100vh; background:#0e1116; color:#c9d1d9; font-family:sans-serif;">
            <div id="top-bar" style="display:flex; justify-content:center; padding:8px;">
                <ControlsPanel
                    dimension={*selected_dimension}
                    on_dimension={on_dimension}
                    on_new_maze={on_new_maze}
                    on_solve={on_solve}
                    solve_enabled={snap.solve_enabled}
                    muted={snap.muted}
                    on_toggle_mute={on_toggle_mute}
                    player_color={snap.player_color.clone()}
                    on_color={on_color}
                />
            </div>
            <TimeDisplay elapsed_secs={snap.elapsed} finished={snap.finished} status={snap.status.clone()} />
            <div style="display:flex; flex:1; min-height:0; gap:12px; padding:0 12px 12px 12px;">
                <MazeCanvas container_ref={container_ref} canvas_ref={canvas_ref} />
                <div style="display:flex; flex-direction:column; gap:12px; overflow-y:auto;">
                    <LeaderboardPanel filter={*filter} on_filter={on_filter} status={snap.board_status.clone()} entries={snap.entries.clone()} />
                    <AchievementsPanel rows={snap.achievements.clone()} />
                </div>
            </div>
            <WinPopup
                content={snap.popup.clone()}
                visible={snap.popup_visible}
                trophy_src={TROPHY_IMAGE_SRC}
                on_close={on_close_popup}
                on_faded_out={on_popup_faded}
            />
            <ToastStack toasts={snap.toasts} />
        </div>
    }
}
