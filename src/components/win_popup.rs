use crate::leaderboard::Rank;
use crate::popup::PopupContent;
use crate::util::format_time;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct WinPopupProps {
    /// `None` hides the overlay entirely.
    pub content: Option<PopupContent>,
    /// False while fading out.
    pub visible: bool,
    pub trophy_src: AttrValue,
    pub on_close: Callback<()>,
    pub on_faded_out: Callback<()>,
}

fn rank_text(rank: Option<Rank>) -> String {
    rank.unwrap_or(Rank::Unknown).to_string()
}

#[function_component]
pub fn WinPopup(props: &WinPopupProps) -> Html {
    let Some(content) = props.content.clone() else {
        return html! {};
    };
    let close_btn = {
        let cb = props.on_close.clone();
        Callback::from(move |_| cb.emit(()))
    };
    // Clicks on the dimmed backdrop close; clicks inside the card do not.
    let backdrop_click = {
        let cb = props.on_close.clone();
        Callback::from(move |e: MouseEvent| {
            if e.target().is_some() && e.target() == e.current_target() {
                cb.emit(());
            }
        })
    };
    let transition_end = {
        let cb = props.on_faded_out.clone();
        Callback::from(move |e: TransitionEvent| {
            if e.property_name() == "opacity" && e.target() == e.current_target() {
                cb.emit(());
            }
        })
    };
    let dim = content.dimension;
    let overall = rank_text(content.rank.map(|r| r.overall));
    let size = rank_text(content.rank.map(|r| r.size));
    let opacity = if props.visible { "1" } else { "0" };
    let class = if props.visible { "popup-overlay visible" } else { "popup-overlay" };
    html! {
        <div class={class} onclick={backdrop_click} ontransitionend={transition_end}
            style={format!("position:fixed; inset:0; background:rgba(0,0,0,0.6); display:flex; align-items:center; justify-content:center; z-index:20; transition:opacity 0.3s ease; opacity:{opacity};")}>
            <div class="popup-content" style="position:relative; background:rgba(22,27,34,0.97); border:2px solid #2ea043; padding:24px 32px; border-radius:12px; text-align:center; min-width:300px;">
                <button onclick={close_btn} aria-label="Close" style="position:absolute; top:6px; right:10px; background:none; border:none; color:#c9d1d9; font-size:20px; cursor:pointer;">{"×"}</button>
                <img src={props.trophy_src.clone()} alt="Trophy" style="width:64px; height:64px;" />
                <h2 style="margin:8px 0 12px 0; color:#2ea043;">{"Maze Complete!"}</h2>
                <p style="margin:4px 0;">{ format!("Your Time: {}", format_time(content.time)) }</p>
                <p style="margin:4px 0;">{ format!("Rank for {dim}x{dim}: {size}") }</p>
                <p style="margin:4px 0;">{ format!("Overall Rank: {overall}") }</p>
                { if content.prompt_after {
                    html!{ <p style="margin-top:12px; font-size:12px; color:#8b949e;">{"Enter name when this closes to save score!"}</p> }
                } else { html!{} } }
            </div>
        </div>
    }
}
