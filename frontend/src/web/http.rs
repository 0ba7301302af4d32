//! HTTP 请求封装模块
//!
//! 使用 `web_sys::fetch` 替代 `gloo-net`，实现核心库的 `HttpClient`。

use standoff_auth::{HttpClient, HttpRequest, HttpResponse, TransportError};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestCredentials, RequestInit, Response};

/// 提取 JS 错误文本（如 `TypeError: Failed to fetch` 的 `message`）
fn js_message(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_default()
}

#[derive(Clone, Copy, Default)]
pub struct BrowserHttpClient;

impl BrowserHttpClient {
    fn build(req: &HttpRequest) -> Result<Request, TransportError> {
        let headers = Headers::new().map_err(|e| TransportError::Encode(js_message(&e)))?;
        for (key, value) in &req.headers {
            headers
                .set(key, value)
                .map_err(|e| TransportError::Encode(js_message(&e)))?;
        }

        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_headers(&headers.into());
        if req.include_credentials {
            opts.set_credentials(RequestCredentials::Include);
        }
        if let Some(body) = &req.body {
            opts.set_body(&JsValue::from_str(body));
        }

        Request::new_with_str_and_init(&req.url, &opts)
            .map_err(|e| TransportError::Encode(js_message(&e)))
    }
}

#[async_trait::async_trait(?Send)]
impl HttpClient for BrowserHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let request = Self::build(&req)?;

        let window = web_sys::window()
            .ok_or_else(|| TransportError::Network("no window available".to_string()))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| TransportError::Network(js_message(&e)))?;

        let response: Response = resp_value
            .dyn_into()
            .map_err(|e| TransportError::Network(js_message(&e)))?;
        let status = response.status();

        let text = response.text().map_err(|e| TransportError::Decode {
            status,
            message: js_message(&e),
        })?;
        let body = JsFuture::from(text)
            .await
            .map_err(|e| TransportError::Decode {
                status,
                message: js_message(&e),
            })?
            .as_string()
            .unwrap_or_default();

        Ok(HttpResponse { status, body })
    }
}
