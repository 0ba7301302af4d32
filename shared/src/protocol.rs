use crate::{AuthPayload, User};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// GraphQL 操作特性 (Trait)：把文档与其变量、`data` 结构绑定在一起
pub trait GraphQlOperation {
    /// 随文档一起发送的变量
    type Variables: Serialize;
    /// 成功时 `data` 字段的结构
    type Data: DeserializeOwned;
    /// 操作名，同时作为 `operationName` 发送
    const NAME: &'static str;
    /// GraphQL 文档
    const DOCUMENT: &'static str;
}

/// 认证调用方并返回 [`AuthPayload`] 的 Mutation
pub trait AuthMutation: GraphQlOperation {
    fn into_payload(data: Self::Data) -> Option<AuthPayload>;
}

// =========================================================
// 请求/响应信封 (Envelope)
// =========================================================

/// POST 到 GraphQL 端点的请求体
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQlRequest<'a, V: Serialize> {
    pub query: &'a str,
    pub operation_name: &'a str,
    pub variables: &'a V,
}

impl<'a, V: Serialize> GraphQlRequest<'a, V> {
    pub fn new<O: GraphQlOperation<Variables = V>>(variables: &'a V) -> Self {
        Self {
            query: O::DOCUMENT,
            operation_name: O::NAME,
            variables,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphQlError {
    #[serde(default)]
    pub message: String,
}

/// 响应信封，两个字段都可能缺失或为 null
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<D> {
    pub data: Option<D>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQlError>>,
}

impl<D> GraphQlResponse<D> {
    /// 非空错误列表的第一条
    pub fn first_error(&self) -> Option<&GraphQlError> {
        self.errors.as_ref().and_then(|errors| errors.first())
    }
}

/// 无变量的操作使用，序列化为 `{}`
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct NoVariables {}

// =========================================================
// 操作定义 (Operation Definitions)
// =========================================================

/// 当前身份，由会话 Cookie 解析
pub struct MeQuery;

#[derive(Debug, Deserialize)]
pub struct MeData {
    #[serde(default)]
    pub me: Option<User>,
}

impl GraphQlOperation for MeQuery {
    type Variables = NoVariables;
    type Data = MeData;
    const NAME: &'static str = "Me";
    const DOCUMENT: &'static str = "query Me {
  me {
    id
    email
    firstName
    lastName
  }
}";
}

/// 邮箱/密码登录
pub struct LoginMutation;

#[derive(Debug, Clone, Serialize)]
pub struct LoginVariables {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginData {
    #[serde(default)]
    pub login: Option<AuthPayload>,
}

impl GraphQlOperation for LoginMutation {
    type Variables = LoginVariables;
    type Data = LoginData;
    const NAME: &'static str = "Login";
    const DOCUMENT: &'static str = "mutation Login($email: String!, $password: String!) {
  login(email: $email, password: $password) {
    user {
      id
      email
      firstName
      lastName
    }
    token
    expiresAt
  }
}";
}

impl AuthMutation for LoginMutation {
    fn into_payload(data: Self::Data) -> Option<AuthPayload> {
        data.login
    }
}

/// 注册账号，成功后直接登录
pub struct SignupMutation;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupVariables {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Deserialize)]
pub struct SignupData {
    #[serde(default)]
    pub signup: Option<AuthPayload>,
}

impl GraphQlOperation for SignupMutation {
    type Variables = SignupVariables;
    type Data = SignupData;
    const NAME: &'static str = "Signup";
    const DOCUMENT: &'static str = "mutation Signup($email: String!, $password: String!, $firstName: String!, $lastName: String!) {
  signup(email: $email, password: $password, firstName: $firstName, lastName: $lastName) {
    user {
      id
      email
      firstName
      lastName
    }
    token
    expiresAt
  }
}";
}

impl AuthMutation for SignupMutation {
    fn into_payload(data: Self::Data) -> Option<AuthPayload> {
        data.signup
    }
}
