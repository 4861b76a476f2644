use yew::prelude::*;

#[derive(Clone, PartialEq)]
pub struct AchievementRow {
    pub name: &'static str,
    pub description: &'static str,
    pub unlocked: bool,
}

#[derive(Properties, PartialEq, Clone)]
pub struct AchievementsPanelProps {
    pub rows: Vec<AchievementRow>,
}

#[function_component]
pub fn AchievementsPanel(props: &AchievementsPanelProps) -> Html {
    html! {<div style="background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:8px; min-width:220px;">
        <div style="font-weight:600; margin-bottom:4px;">{"Achievements"}</div>
        <ul style="list-style:none; margin:0; padding:0;">
            { for props.rows.iter().map(|row| {
                let opacity = if row.unlocked { "1" } else { "0.5" };
                html!{<li class={if row.unlocked { "achievement-item unlocked" } else { "achievement-item locked" }}
                    style={format!("display:flex; flex-direction:column; margin:4px 0; opacity:{opacity};")}>
                    <strong>{ format!("{}{}", if row.unlocked { "✅ " } else { "" }, row.name) }</strong>
                    <span style="font-size:11px; color:#8b949e;">{ row.description }</span>
                </li>}
            }) }
        </ul>
    </div>}
}
