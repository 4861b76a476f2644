mod achievements;
mod api;
mod audio;
mod components;
mod config;
mod error;
mod input;
mod layout;
mod leaderboard;
mod model;
mod movement;
mod popup;
mod session;
mod storage;
mod timer;
mod util;

use components::App;

fn main() {
    yew::Renderer::<App>::new().render();
}
