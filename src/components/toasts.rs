use yew::prelude::*;

#[derive(Clone, PartialEq)]
pub struct Toast {
    pub id: u32,
    pub text: String,
}

#[derive(Properties, PartialEq, Clone)]
pub struct ToastStackProps {
    pub toasts: Vec<Toast>,
}

#[function_component]
pub fn ToastStack(props: &ToastStackProps) -> Html {
    html! {<div id="toastContainer" style="position:fixed; bottom:16px; right:16px; display:flex; flex-direction:column; gap:8px; z-index:30;">
        { for props.toasts.iter().map(|t| html!{
            <div key={t.id} class="toast-notification show" style="background:#1c2128; border:1px solid #d29922; color:#e3b341; padding:8px 14px; border-radius:8px; font-size:13px;">
                { t.text.clone() }
            </div>
        }) }
    </div>}
}
