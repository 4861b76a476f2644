use super::controls_panel::dimension_label;
use crate::config::MAZE_DIMENSIONS;
use crate::leaderboard::{BoardStatus, DimensionFilter, ScoreEntry};
use crate::util::format_time;
use web_sys::HtmlSelectElement;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct LeaderboardPanelProps {
    pub filter: DimensionFilter,
    pub on_filter: Callback<DimensionFilter>,
    pub status: BoardStatus,
    /// Already filtered, sorted and truncated.
    pub entries: Vec<ScoreEntry>,
}

fn entry_row(rank: usize, entry: &ScoreEntry, show_dimension: bool) -> Html {
    let time = entry.time.map(format_time).unwrap_or_else(|| "N/A".to_string());
    let name = if entry.name.is_empty() { "Anonymous" } else { entry.name.as_str() };
    html! {<li class="leaderboard-entry" style="display:flex; gap:8px; font-size:13px;">
        <span style="width:2em; text-align:right;">{ format!("{rank}.") }</span>
        <span style="flex:1; overflow:hidden; text-overflow:ellipsis; white-space:nowrap;">{ name.to_string() }</span>
        <span style="font-variant-numeric:tabular-nums;">{ time }</span>
        { if show_dimension { html!{ <span style="opacity:0.7;">{ format!("({0}x{0})", entry.dimension) }</span> } } else { html!{} } }
    </li>}
}

#[function_component]
pub fn LeaderboardPanel(props: &LeaderboardPanelProps) -> Html {
    let filter_cb = {
        let cb = props.on_filter.clone();
        Callback::from(move |e: Event| {
            let value = e.target_unchecked_into::<HtmlSelectElement>().value();
            cb.emit(DimensionFilter::parse(&value));
        })
    };
    let show_dimension = props.filter == DimensionFilter::All;
    let message = |text: &str| html! { <li class="message" style="opacity:0.7;">{ text.to_string() }</li> };
    let body = match &props.status {
        BoardStatus::Loading => message("Loading..."),
        BoardStatus::Failed(_) => message("Error loading scores."),
        BoardStatus::Ready if props.entries.is_empty() => message(if show_dimension {
            "No scores yet for this leaderboard!"
        } else {
            "No scores yet for this size!"
        }),
        BoardStatus::Ready => props
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| entry_row(i + 1, e, show_dimension))
            .collect::<Html>(),
    };
    let selected = props.filter.value();
    html! {<div style="background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:8px; min-width:220px;">
        <div style="display:flex; justify-content:space-between; align-items:center; margin-bottom:6px;">
            <div style="font-weight:600;">{"Leaderboard"}</div>
            <select id="leaderboardFilterSelect" onchange={filter_cb}>
                <option value="all" selected={selected == "all"}>{"All sizes"}</option>
                { for MAZE_DIMENSIONS.iter().map(|&d| html!{
                    <option value={d.to_string()} selected={selected == d.to_string()}>{ dimension_label(d) }</option>
                }) }
            </select>
        </div>
        <ol style="list-style:none; margin:0; padding:0; display:flex; flex-direction:column; gap:2px;">{ body }</ol>
    </div>}
}
