//! Browser transport: the request goes through `window.fetch`.

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::error::ScenarioError;
use crate::response::{decode_reply, ScenarioData, SimulationRequest};

fn js_err(context: &str, value: JsValue) -> ScenarioError {
    ScenarioError::Transport(format!("{context}: {value:?}"))
}

pub(crate) async fn post_request(
    url: &str,
    request: &SimulationRequest,
) -> Result<ScenarioData, ScenarioError> {
    let window =
        web_sys::window().ok_or_else(|| ScenarioError::Transport("no window object".into()))?;

    let body = request.to_json()?;
    let opts = web_sys::RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(web_sys::RequestMode::Cors);
    opts.set_body(&JsValue::from_str(&body));

    let req = web_sys::Request::new_with_str_and_init(url, &opts)
        .map_err(|e| js_err("building request", e))?;
    req.headers()
        .set("Content-Type", "application/json")
        .map_err(|e| js_err("setting headers", e))?;

    let resp_value = JsFuture::from(window.fetch_with_request(&req))
        .await
        .map_err(|e| js_err("fetch failed", e))?;
    let resp: web_sys::Response = resp_value
        .dyn_into()
        .map_err(|e| js_err("not a Response", e))?;

    let status = resp.status();
    let text_promise = resp.text().map_err(|e| js_err("reading body", e))?;
    let text = JsFuture::from(text_promise)
        .await
        .map_err(|e| js_err("reading body", e))?;

    decode_reply(status, &text.as_string().unwrap_or_default())
}

/// The `?endpoint=` query parameter of the hosting page, if any.
pub fn query_endpoint() -> Option<String> {
    let search = web_sys::window()?.location().search().ok()?;
    let params = web_sys::UrlSearchParams::new_with_str(&search).ok()?;
    params.get("endpoint").filter(|v| !v.trim().is_empty())
}
