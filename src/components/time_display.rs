use crate::util::{format_time, format_time_short};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct TimeDisplayProps {
    pub elapsed_secs: f64,
    /// Once the run is over the frozen time is shown with milliseconds.
    pub finished: bool,
    pub status: AttrValue,
}

#[function_component(TimeDisplay)]
pub fn time_display(props: &TimeDisplayProps) -> Html {
    let time = if props.finished {
        format_time(props.elapsed_secs)
    } else {
        format_time_short(props.elapsed_secs)
    };
    html! {<div style="display:flex; flex-direction:column; align-items:center; gap:6px; margin:8px 0;">
        <div id="timerDisplay" style="font-size:20px; font-weight:600; font-variant-numeric:tabular-nums;">{ time }</div>
        <div id="statusMessage" style="min-height:1.2em; font-size:14px;">{ props.status.clone() }</div>
    </div>}
}
