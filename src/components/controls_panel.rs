use crate::config::MAZE_DIMENSIONS;
use crate::layout::PLAYER_COLORS;
use web_sys::HtmlSelectElement;
use yew::prelude::*;

pub fn dimension_label(dimension: u32) -> String {
    let name = match dimension {
        3 => "Small",
        5 => "Medium",
        7 => "Large",
        10 => "Extra Large",
        15 => "Giant",
        20 => "Colossal",
        100 => "HUGE",
        _ => "Custom",
    };
    format!("{name} ({dimension}x{dimension})")
}

#[derive(Properties, PartialEq, Clone)]
pub struct ControlsPanelProps {
    pub dimension: u32,
    pub on_dimension: Callback<u32>,
    pub on_new_maze: Callback<()>,
    pub on_solve: Callback<()>,
    pub solve_enabled: bool,
    pub muted: bool,
    pub on_toggle_mute: Callback<()>,
    pub player_color: AttrValue,
    pub on_color: Callback<String>,
}

#[function_component]
pub fn ControlsPanel(props: &ControlsPanelProps) -> Html {
    let new_maze_cb = {
        let cb = props.on_new_maze.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let solve_cb = {
        let cb = props.on_solve.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let mute_cb = {
        let cb = props.on_toggle_mute.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let size_cb = {
        let cb = props.on_dimension.clone();
        Callback::from(move |e: Event| {
            let value = e.target_unchecked_into::<HtmlSelectElement>().value();
            if let Ok(d) = value.parse::<u32>() {
                cb.emit(d);
            }
        })
    };
    let color_cb = {
        let cb = props.on_color.clone();
        Callback::from(move |e: Event| cb.emit(e.target_unchecked_into::<HtmlSelectElement>().value()))
    };
    html! {<div style="display:flex; flex-wrap:wrap; gap:8px; align-items:center; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:8px;">
        <select id="mazeSizeSelect" onchange={size_cb}>
            { for MAZE_DIMENSIONS.iter().map(|&d| html!{
                <option value={d.to_string()} selected={d == props.dimension}>{ dimension_label(d) }</option>
            }) }
        </select>
        <button onclick={new_maze_cb}>{"New Maze"}</button>
        <button onclick={solve_cb} disabled={!props.solve_enabled}>{"Solve"}</button>
        <button onclick={mute_cb}>{ if props.muted { "🔊 Unmute" } else { "🔇 Mute" } }</button>
        <select id="snakeColorSelect" onchange={color_cb}>
            { for PLAYER_COLORS.iter().map(|(name, _)| html!{
                <option value={*name} selected={*name == props.player_color.as_str()}>{ *name }</option>
            }) }
        </select>
        <div style="font-size:11px; opacity:0.7;">{"Arrows / WASD to move, E to solve"}</div>
    </div>}
}
