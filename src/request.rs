use serde::de::DeserializeOwned;
use std::collections::HashMap;

use crate::error::TransportError;

#[cfg(test)]
use std::cell::RefCell;

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// 通用 HTTP 请求结构（JSON POST，GraphQL 不需要其他方法）
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
    /// 是否携带 Cookie（即 fetch 的 `credentials: "include"`）
    pub include_credentials: bool,
}

impl HttpRequest {
    pub fn post(url: &str) -> Self {
        Self {
            url: url.to_string(),
            headers: HashMap::new(),
            body: None,
            include_credentials: false,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body.to_string());
        self
    }

    pub fn with_credentials(mut self) -> Self {
        self.include_credentials = true;
        self
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TransportError> {
        serde_json::from_str(&self.body).map_err(|e| TransportError::Decode {
            status: self.status,
            message: e.to_string(),
        })
    }
}

/// HTTP 客户端特性 (Trait)
/// 使用 async_trait 以支持异步调用，(?Send) 是因为浏览器实现持有 JS 句柄
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[async_trait::async_trait(?Send)]
impl<C: HttpClient + ?Sized> HttpClient for std::rc::Rc<C> {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(req).await
    }
}

// =========================================================
// 测试替身: MockHttpClient
// =========================================================

/// 按 GraphQL 操作名返回预设响应的 Mock 客户端
///
/// 未注册的操作返回 404，所有请求都会被记录。
#[cfg(test)]
pub struct MockHttpClient {
    // 操作名 -> 结果
    responses: RefCell<HashMap<String, Result<HttpResponse, TransportError>>>,
    gate: RefCell<Option<futures::channel::oneshot::Receiver<()>>>,
    pub requests: RefCell<Vec<HttpRequest>>,
}

#[cfg(test)]
impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            responses: RefCell::new(HashMap::new()),
            gate: RefCell::new(None),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn mock_response(&self, operation: &str, status: u16, body: serde_json::Value) {
        self.responses.borrow_mut().insert(
            operation.to_string(),
            Ok(HttpResponse {
                status,
                body: body.to_string(),
            }),
        );
    }

    pub fn mock_raw(&self, operation: &str, status: u16, body: &str) {
        self.responses.borrow_mut().insert(
            operation.to_string(),
            Ok(HttpResponse {
                status,
                body: body.to_string(),
            }),
        );
    }

    pub fn mock_failure(&self, operation: &str, err: TransportError) {
        self.responses
            .borrow_mut()
            .insert(operation.to_string(), Err(err));
    }

    /// 下一个请求保持挂起，直到返回的 sender 触发
    pub fn hold_next(&self) -> futures::channel::oneshot::Sender<()> {
        let (tx, rx) = futures::channel::oneshot::channel();
        *self.gate.borrow_mut() = Some(rx);
        tx
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    /// 第 n 个请求解析后的 JSON 请求体
    pub fn body(&self, index: usize) -> serde_json::Value {
        let requests = self.requests.borrow();
        let body = requests[index].body.as_deref().unwrap_or("null");
        serde_json::from_str(body).unwrap()
    }

    fn operation_of(req: &HttpRequest) -> String {
        req.body
            .as_deref()
            .and_then(|b| serde_json::from_str::<serde_json::Value>(b).ok())
            .and_then(|v| v["operationName"].as_str().map(str::to_string))
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let operation = Self::operation_of(&req);
        self.requests.borrow_mut().push(req);

        let gate = self.gate.borrow_mut().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        match self.responses.borrow().get(&operation) {
            Some(result) => result.clone(),
            None => Ok(HttpResponse {
                status: 404,
                body: "Not Found".to_string(),
            }),
        }
    }
}
