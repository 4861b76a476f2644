pub mod achievements_panel;
pub mod app;
pub mod controls_panel;
pub mod leaderboard_panel;
pub mod maze_canvas;
pub mod time_display;
pub mod toasts;
pub mod win_popup;

pub use app::App;
