use crate::error::TransportError;
use crate::request::{HttpClient, HttpRequest};
use standoff_shared::protocol::{GraphQlOperation, GraphQlRequest, GraphQlResponse};

/// GraphQL 网关：向单一端点 POST 操作，携带 Cookie
pub struct GraphQlGateway<C: HttpClient> {
    client: C,
    endpoint: String,
}

impl<C: HttpClient> GraphQlGateway<C> {
    pub fn new(client: C, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// 发送操作 `O` 并解析响应信封
    ///
    /// 只要响应体能解析为信封，且状态码为 2xx 或带有错误列表，就原样返回；
    /// 其余情况都视为传输错误。
    pub async fn execute<O: GraphQlOperation>(
        &self,
        variables: &O::Variables,
    ) -> Result<GraphQlResponse<O::Data>, TransportError> {
        let body = serde_json::to_value(GraphQlRequest::new::<O>(variables))
            .map_err(|e| TransportError::Encode(e.to_string()))?;

        let req = HttpRequest::post(&self.endpoint)
            .with_header("Content-Type", "application/json")
            .with_credentials()
            .with_body(body);

        log::debug!("graphql {} -> {}", O::NAME, self.endpoint);
        let resp = self.client.send(req).await?;

        match resp.json::<GraphQlResponse<O::Data>>() {
            Ok(envelope) if resp.ok() || envelope.first_error().is_some() => Ok(envelope),
            Ok(_) => Err(TransportError::Status(resp.status)),
            Err(_) if !resp.ok() => Err(TransportError::Status(resp.status)),
            Err(e) => Err(e),
        }
    }
}
