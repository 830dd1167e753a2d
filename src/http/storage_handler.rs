//! Storage proxy handler.
//!
//! Maps one verb-dispatched resource onto the storage service:
//!
//! | Verb   | Operation  | Input                     | Success |
//! |--------|------------|---------------------------|---------|
//! | POST   | Create     | JSON body                 | 201     |
//! | PATCH  | Update     | JSON body                 | 204     |
//! | GET    | Get / List | `StorageType`, `SystemId` | 200     |
//! | DELETE | Delete     | `StorageType`, `SystemId` | 204     |
//!
//! Malformed input is answered with 400 before the service is called. Any
//! service error becomes 500.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, MethodRouter},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use url::form_urlencoded;

use crate::storage::{
    StorageCreateRequest, StorageDeleteRequest, StorageError, StorageGetRequest,
    StorageListRequest, StorageService, StorageUpdateRequest,
};

/// Path of the storage resource.
pub const STORAGE_PATH: &str = "/proxy/storage/";

/// Shared by every request; holds no per-request state.
#[derive(Clone)]
pub struct StorageHandler {
    service: Arc<dyn StorageService>,
    call_timeout: Duration,
}

impl StorageHandler {
    pub fn new(service: Arc<dyn StorageService>, call_timeout: Duration) -> Self {
        Self {
            service,
            call_timeout,
        }
    }

    /// Router serving the storage resource, with and without trailing slash.
    pub fn router(self) -> Router {
        let methods: MethodRouter<StorageHandler> = get(get_storage)
            .post(create_storage)
            .patch(update_storage)
            .delete(delete_storage);

        Router::new()
            .route(STORAGE_PATH, methods.clone())
            .route(STORAGE_PATH.trim_end_matches('/'), methods)
            .with_state(self)
    }

    /// Await a service call, giving up once the call deadline passes.
    async fn call<T>(
        &self,
        call: impl std::future::Future<Output = Result<T, StorageError>>,
    ) -> Result<T, StorageError> {
        tokio::time::timeout(self.call_timeout, call)
            .await
            .unwrap_or(Err(StorageError::DeadlineExceeded))
    }
}

/// Wire names of the body fields. Keys are matched ignoring ASCII case.
const BODY_FIELDS: &[&str] = &[
    "StorageType",
    "Endpoint",
    "SystemId",
    "UserName",
    "Password",
    "Insecure",
];

/// JSON body of create and update requests.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StorageBody {
    #[serde(rename = "StorageType")]
    pub storage_type: String,
    #[serde(rename = "Endpoint")]
    pub endpoint: String,
    #[serde(rename = "SystemId")]
    pub system_id: String,
    #[serde(rename = "UserName")]
    pub user_name: String,
    #[serde(rename = "Password")]
    pub password: String,
    #[serde(rename = "Insecure")]
    pub insecure: bool,
}

impl From<StorageBody> for StorageCreateRequest {
    fn from(body: StorageBody) -> Self {
        Self {
            storage_type: body.storage_type,
            endpoint: body.endpoint,
            system_id: body.system_id,
            user_name: body.user_name,
            password: body.password,
            insecure: body.insecure,
        }
    }
}

impl From<StorageBody> for StorageUpdateRequest {
    fn from(body: StorageBody) -> Self {
        Self {
            storage_type: body.storage_type,
            endpoint: body.endpoint,
            system_id: body.system_id,
            user_name: body.user_name,
            password: body.password,
            insecure: body.insecure,
        }
    }
}

/// Query parameters naming one registration.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct StorageKey {
    pub storage_type: Option<String>,
    pub system_id: Option<String>,
}

impl StorageKey {
    /// Read the key from a raw query string. When a parameter repeats, its
    /// first value is used. Unknown parameters are ignored.
    pub fn from_query(query: Option<&str>) -> Self {
        let mut key = Self::default();
        for (name, value) in form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
            let slot = match &*name {
                "StorageType" => &mut key.storage_type,
                "SystemId" => &mut key.system_id,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        key
    }

    fn is_absent(&self) -> bool {
        self.storage_type.is_none() && self.system_id.is_none()
    }

    /// Both parameters, or the message explaining which one is missing.
    fn required(self) -> Result<(String, String), &'static str> {
        let storage_type = self
            .storage_type
            .filter(|v| !v.is_empty())
            .ok_or("storage type not provided in query parameters")?;
        let system_id = self
            .system_id
            .filter(|v| !v.is_empty())
            .ok_or("storage systemid not provided in query parameters")?;
        Ok((storage_type, system_id))
    }
}

/// Body of successful get and list responses. The payload is carried as
/// base64 text and is never inspected.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StorageEnvelope {
    #[serde(rename = "Storage", with = "base64_bytes")]
    pub storage: Vec<u8>,
}

mod base64_bytes {
    use super::*;

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonError {
    pub error: String,
    pub code: u16,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let body = JsonError {
        error: message.into(),
        code: status.as_u16(),
    };
    (status, Json(body)).into_response()
}

fn bad_request(message: impl Into<String>) -> Response {
    let message = message.into();
    tracing::error!(error = %message, "rejecting storage request");
    error_response(StatusCode::BAD_REQUEST, message)
}

fn backend_failure(action: &str, err: StorageError) -> Response {
    tracing::error!(error = %err, "{action}");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, format!("{action}: {err}"))
}

fn decode_body(body: &[u8]) -> Result<StorageBody, Response> {
    let invalid = |e: serde_json::Error| bad_request(format!("decoding request body: {e}"));

    let fields: Map<String, Value> = serde_json::from_slice(body).map_err(invalid)?;
    let fields = fields
        .into_iter()
        .map(|(name, value)| (canonical_field(name), value))
        .collect();
    serde_json::from_value(Value::Object(fields)).map_err(invalid)
}

fn canonical_field(name: String) -> String {
    BODY_FIELDS
        .iter()
        .find(|field| field.eq_ignore_ascii_case(&name))
        .map_or(name, |field| field.to_string())
}

async fn create_storage(State(handler): State<StorageHandler>, body: Bytes) -> Response {
    let body = match decode_body(&body) {
        Ok(body) => body,
        Err(response) => return response,
    };

    match handler.call(handler.service.create(body.into())).await {
        Ok(_) => StatusCode::CREATED.into_response(),
        Err(err) => backend_failure("creating storage", err),
    }
}

async fn update_storage(State(handler): State<StorageHandler>, body: Bytes) -> Response {
    let body = match decode_body(&body) {
        Ok(body) => body,
        Err(response) => return response,
    };

    match handler.call(handler.service.update(body.into())).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => backend_failure("updating storage", err),
    }
}

async fn get_storage(
    State(handler): State<StorageHandler>,
    RawQuery(query): RawQuery,
) -> Response {
    let key = StorageKey::from_query(query.as_deref());
    if key.is_absent() {
        return list_storage(handler).await;
    }

    let (storage_type, system_id) = match key.required() {
        Ok(key) => key,
        Err(message) => return bad_request(message),
    };

    let request = StorageGetRequest {
        storage_type,
        system_id,
    };
    match handler.call(handler.service.get(request)).await {
        Ok(response) => Json(StorageEnvelope {
            storage: response.storage,
        })
        .into_response(),
        Err(err) => backend_failure("getting storage", err),
    }
}

async fn list_storage(handler: StorageHandler) -> Response {
    match handler.call(handler.service.list(StorageListRequest)).await {
        Ok(response) => Json(StorageEnvelope {
            storage: response.storage,
        })
        .into_response(),
        Err(err) => backend_failure("listing storages", err),
    }
}

async fn delete_storage(
    State(handler): State<StorageHandler>,
    RawQuery(query): RawQuery,
) -> Response {
    let (storage_type, system_id) = match StorageKey::from_query(query.as_deref()).required() {
        Ok(key) => key,
        Err(message) => return bad_request(message),
    };

    let request = StorageDeleteRequest {
        storage_type,
        system_id,
    };
    match handler.call(handler.service.delete(request)).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => backend_failure("deleting storage", err),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Method, Request};
    use tower::ServiceExt;

    use super::*;
    use crate::storage::error::Result;
    use crate::storage::*;

    const GET_PAYLOAD: &[u8] = concat!(
        r#"{"powerflex":{"542a2d5f5122210f":"#,
        r#"{"User":"admin","Password":"test","Endpoint":"https://10.0.0.1","Insecure":false}}}"#,
    )
    .as_bytes();
    const LIST_PAYLOAD: &[u8] = concat!(
        r#"{"powerflex":{"11e4e7d35817bd0f":"#,
        r#"{"User":"admin","Password":"test","Endpoint":"https://10.0.0.1","Insecure":false}},"#,
        r#""powermax":{"542a2d5f5122210f":"#,
        r#"{"User":"admin","Password":"test","Endpoint":"https://10.0.0.1","Insecure":false}}}"#,
    )
    .as_bytes();

    const KEYED_URI: &str = "/proxy/storage/?StorageType=powerflex&SystemId=542a2d5f5122210f";

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Create(StorageCreateRequest),
        Update(StorageUpdateRequest),
        Get(StorageGetRequest),
        Delete(StorageDeleteRequest),
        List,
    }

    /// Records calls and answers with a fixed outcome.
    #[derive(Default)]
    struct FakeStorageService {
        calls: Mutex<Vec<Call>>,
        fail: bool,
        stall: bool,
    }

    impl FakeStorageService {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        async fn answer<T>(&self, call: Call, ok: T) -> Result<T> {
            self.calls.lock().unwrap().push(call);
            if self.stall {
                std::future::pending::<()>().await;
            }
            if self.fail {
                Err(StorageError::Internal("error".into()))
            } else {
                Ok(ok)
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl StorageService for FakeStorageService {
        async fn create(&self, req: StorageCreateRequest) -> Result<StorageCreateResponse> {
            self.answer(Call::Create(req), StorageCreateResponse).await
        }

        async fn update(&self, req: StorageUpdateRequest) -> Result<StorageUpdateResponse> {
            self.answer(Call::Update(req), StorageUpdateResponse).await
        }

        async fn get(&self, req: StorageGetRequest) -> Result<StorageGetResponse> {
            let ok = StorageGetResponse {
                storage: GET_PAYLOAD.to_vec(),
            };
            self.answer(Call::Get(req), ok).await
        }

        async fn delete(&self, req: StorageDeleteRequest) -> Result<StorageDeleteResponse> {
            self.answer(Call::Delete(req), StorageDeleteResponse).await
        }

        async fn list(&self, _req: StorageListRequest) -> Result<StorageListResponse> {
            let ok = StorageListResponse {
                storage: LIST_PAYLOAD.to_vec(),
            };
            self.answer(Call::List, ok).await
        }
    }

    fn router(service: &Arc<FakeStorageService>) -> Router {
        StorageHandler::new(service.clone(), Duration::from_secs(5)).router()
    }

    fn body() -> StorageBody {
        StorageBody {
            storage_type: "powerflex".into(),
            endpoint: "0.0.0.0:443".into(),
            system_id: "542a2d5f5122210f".into(),
            user_name: "test".into(),
            password: "test".into(),
            insecure: true,
        }
    }

    fn request(method: Method, uri: &str, body: Body) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(body)
            .unwrap()
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Bytes) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body)
    }

    async fn send_json(service: &Arc<FakeStorageService>, method: Method) -> (StatusCode, Bytes) {
        let payload = Body::from(serde_json::to_vec(&body()).unwrap());
        send(router(service), request(method, STORAGE_PATH, payload)).await
    }

    async fn send_raw(
        service: &Arc<FakeStorageService>,
        method: Method,
        uri: &str,
        payload: &'static str,
    ) -> (StatusCode, Bytes) {
        send(router(service), request(method, uri, Body::from(payload))).await
    }

    #[tokio::test]
    async fn create_succeeds_with_201_and_empty_body() {
        let service = Arc::new(FakeStorageService::default());

        let (status, body) = send_json(&service, Method::POST).await;

        assert_eq!(status, StatusCode::CREATED);
        assert!(body.is_empty());
        assert_eq!(
            service.calls(),
            vec![Call::Create(StorageCreateRequest {
                storage_type: "powerflex".into(),
                endpoint: "0.0.0.0:443".into(),
                system_id: "542a2d5f5122210f".into(),
                user_name: "test".into(),
                password: "test".into(),
                insecure: true,
            })]
        );
    }

    #[tokio::test]
    async fn create_accepts_alternate_field_spelling() {
        let service = Arc::new(FakeStorageService::default());
        let payload = concat!(
            r#"{"StorageType":"powerflex","Endpoint":"0.0.0.0:443","SystemID":"542a2d5f5122210f","#,
            r#""Username":"test","Password":"test","Insecure":true}"#,
        );

        let (status, _) = send_raw(&service, Method::POST, STORAGE_PATH, payload).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(service.calls().len(), 1);
    }

    #[tokio::test]
    async fn body_keys_match_regardless_of_case() {
        let service = Arc::new(FakeStorageService::default());
        let payload = concat!(
            r#"{"storagetype":"powerflex","ENDPOINT":"0.0.0.0:443","systemId":"542a2d5f5122210f","#,
            r#""username":"test","password":"test","insecure":true,"extra":1}"#,
        );

        let (status, _) = send_raw(&service, Method::PATCH, STORAGE_PATH, payload).await;

        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(
            service.calls(),
            vec![Call::Update(StorageUpdateRequest {
                storage_type: "powerflex".into(),
                endpoint: "0.0.0.0:443".into(),
                system_id: "542a2d5f5122210f".into(),
                user_name: "test".into(),
                password: "test".into(),
                insecure: true,
            })]
        );
    }

    #[tokio::test]
    async fn malformed_bodies_are_rejected_without_calling_the_service() {
        let bodies = [
            "",
            "{",
            "[]",
            r#"{"StorageType":"powerflex"}"#,
            concat!(
                r#"{"StorageType":"powerflex","Endpoint":"0.0.0.0:443","SystemId":"1","#,
                r#""UserName":"u","Password":"p","Insecure":"yes"}"#,
            ),
        ];

        for method in [Method::POST, Method::PATCH] {
            for payload in bodies {
                let service = Arc::new(FakeStorageService::default());
                let (status, body) =
                    send_raw(&service, method.clone(), STORAGE_PATH, payload).await;

                assert_eq!(status, StatusCode::BAD_REQUEST, "{method} {payload:?}");
                let error: JsonError = serde_json::from_slice(&body).unwrap();
                assert!(error.error.starts_with("decoding request body"));
                assert_eq!(error.code, 400);
                assert!(service.calls().is_empty());
            }
        }
    }

    #[tokio::test]
    async fn create_maps_service_error_to_500() {
        let service = Arc::new(FakeStorageService::failing());

        let (status, body) = send_json(&service, Method::POST).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let error: JsonError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.error, "creating storage: internal error: error");
        assert_eq!(service.calls().len(), 1);
    }

    #[tokio::test]
    async fn update_succeeds_with_204() {
        let service = Arc::new(FakeStorageService::default());

        let (status, body) = send_json(&service, Method::PATCH).await;

        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_empty());
        assert!(matches!(service.calls().as_slice(), [Call::Update(_)]));
    }

    #[tokio::test]
    async fn update_maps_service_error_to_500() {
        let service = Arc::new(FakeStorageService::failing());

        let (status, _) = send_json(&service, Method::PATCH).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn get_wraps_payload_in_envelope() {
        let service = Arc::new(FakeStorageService::default());

        let (status, body) = send_raw(&service, Method::GET, KEYED_URI, "").await;

        assert_eq!(status, StatusCode::OK);
        let envelope: StorageEnvelope = serde_json::from_slice(&body).unwrap();
        assert_eq!(envelope.storage, GET_PAYLOAD);
        assert_eq!(
            service.calls(),
            vec![Call::Get(StorageGetRequest {
                storage_type: "powerflex".into(),
                system_id: "542a2d5f5122210f".into(),
            })]
        );
    }

    #[tokio::test]
    async fn get_with_partial_key_is_rejected() {
        for uri in [
            "/proxy/storage/?StorageType=powerflex",
            "/proxy/storage/?SystemId=542a2d5f5122210f",
            "/proxy/storage/?StorageType=&SystemId=542a2d5f5122210f",
        ] {
            let service = Arc::new(FakeStorageService::default());
            let (status, body) = send_raw(&service, Method::GET, uri, "").await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            let error: JsonError = serde_json::from_slice(&body).unwrap();
            assert_eq!(error.code, 400);
            assert!(service.calls().is_empty());
        }
    }

    #[tokio::test]
    async fn get_maps_service_error_to_500() {
        let service = Arc::new(FakeStorageService::failing());

        let (status, _) = send_raw(&service, Method::GET, KEYED_URI, "").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn list_without_parameters() {
        let service = Arc::new(FakeStorageService::default());

        let (status, body) = send_raw(&service, Method::GET, STORAGE_PATH, "").await;

        assert_eq!(status, StatusCode::OK);
        let envelope: StorageEnvelope = serde_json::from_slice(&body).unwrap();
        assert_eq!(envelope.storage, LIST_PAYLOAD);
        assert_eq!(service.calls(), vec![Call::List]);

        let raw: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(raw["Storage"], STANDARD.encode(LIST_PAYLOAD));
    }

    #[tokio::test]
    async fn list_maps_service_error_to_500() {
        let service = Arc::new(FakeStorageService::failing());

        let (status, _) = send_raw(&service, Method::GET, "/proxy/storage", "").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn delete_succeeds_with_204() {
        let service = Arc::new(FakeStorageService::default());

        let (status, body) = send_raw(&service, Method::DELETE, KEYED_URI, "").await;

        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_empty());
        assert_eq!(
            service.calls(),
            vec![Call::Delete(StorageDeleteRequest {
                storage_type: "powerflex".into(),
                system_id: "542a2d5f5122210f".into(),
            })]
        );
    }

    #[tokio::test]
    async fn delete_requires_both_parameters() {
        for uri in [
            STORAGE_PATH,
            "/proxy/storage/?StorageType=powerflex",
            "/proxy/storage/?SystemId=542a2d5f5122210f",
        ] {
            let service = Arc::new(FakeStorageService::default());
            let (status, _) = send_raw(&service, Method::DELETE, uri, "").await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert!(service.calls().is_empty());
        }
    }

    #[tokio::test]
    async fn repeated_query_parameters_use_the_first_value() {
        let uri = concat!(
            "/proxy/storage/?StorageType=powerflex&StorageType=powermax",
            "&SystemId=x&SystemId=y",
        );

        let service = Arc::new(FakeStorageService::default());
        let (status, _) = send_raw(&service, Method::DELETE, uri, "").await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send_raw(&service, Method::GET, uri, "").await;
        assert_eq!(status, StatusCode::OK);

        assert_eq!(
            service.calls(),
            vec![
                Call::Delete(StorageDeleteRequest {
                    storage_type: "powerflex".into(),
                    system_id: "x".into(),
                }),
                Call::Get(StorageGetRequest {
                    storage_type: "powerflex".into(),
                    system_id: "x".into(),
                }),
            ]
        );
    }

    #[test]
    fn query_key_is_percent_decoded_and_ignores_other_parameters() {
        let key = StorageKey::from_query(Some("SystemId=a%2Cb&StorageType=power+max&Other=1"));
        assert_eq!(
            key,
            StorageKey {
                storage_type: Some("power max".into()),
                system_id: Some("a,b".into()),
            }
        );

        assert_eq!(StorageKey::from_query(None), StorageKey::default());
        assert_eq!(StorageKey::from_query(Some("%zz")), StorageKey::default());
    }

    #[tokio::test]
    async fn undecodable_query_yields_json_400() {
        let service = Arc::new(FakeStorageService::default());

        let uri = "/proxy/storage/?StorageType=%ff%fe&SystemId";
        let (status, body) = send_raw(&service, Method::DELETE, uri, "").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: JsonError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.error, "storage systemid not provided in query parameters");
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn delete_maps_service_error_to_500() {
        let service = Arc::new(FakeStorageService::failing());

        let (status, _) = send_raw(&service, Method::DELETE, KEYED_URI, "").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn stalled_service_times_out_with_500() {
        let service = Arc::new(FakeStorageService {
            stall: true,
            ..Default::default()
        });
        let router = StorageHandler::new(service, Duration::from_millis(20)).router();

        let (status, body) = send(router, request(Method::GET, STORAGE_PATH, Body::empty())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let error: JsonError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.error, "listing storages: deadline exceeded");
    }

    #[tokio::test]
    async fn other_verbs_are_not_allowed() {
        let service = Arc::new(FakeStorageService::default());

        let (status, _) = send_raw(&service, Method::PUT, STORAGE_PATH, "").await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn decorated_service_behaves_the_same() {
        let inner = Arc::new(FakeStorageService::failing());
        let decorated: Arc<dyn StorageService> = Arc::new(TelemetryMw::new(inner.clone()));
        let router = StorageHandler::new(decorated, Duration::from_secs(5)).router();

        let payload = Body::from(serde_json::to_vec(&body()).unwrap());
        let (status, _) = send(router, request(Method::POST, STORAGE_PATH, payload)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(inner.calls().len(), 1);
    }
}
