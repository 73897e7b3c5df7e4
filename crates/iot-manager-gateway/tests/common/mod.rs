//! Shared fixtures for gateway integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use parking_lot::Mutex;
use serde_json::Value;
use tower::ServiceExt;

use iot_manager_app::{App, AppError, Result};
use iot_manager_auth::{encode_test_token, Identity, JwtIdentityDecoder};
use iot_manager_core::{Device, DeviceId, DeviceTwin, Module, Settings, TenantId, TwinUpdate};
use iot_manager_gateway::{create_router, ErrorEnvelope, GatewayConfig, GatewayState};

/// A backend call recorded by [`StubApp`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    HealthCheck,
    GetSettings(TenantId),
    SetSettings(TenantId, Settings),
    GetDevice(TenantId, DeviceId),
    GetDeviceTwin(TenantId, DeviceId),
    SetDeviceTwin(TenantId, DeviceId, TwinUpdate),
    UpdateDeviceTwin(TenantId, DeviceId, TwinUpdate),
    GetDeviceModules(TenantId, DeviceId),
}

/// In-memory `App` that records every call.
#[derive(Default)]
pub struct StubApp {
    calls: Mutex<Vec<Call>>,
    settings: Mutex<HashMap<TenantId, Settings>>,
    failure: Mutex<Option<String>>,
    health_delay: Mutex<Option<Duration>>,
}

impl StubApp {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make every subsequent call fail with a backend error.
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock() = Some(message.to_string());
    }

    /// Delay health checks by `delay`.
    pub fn delay_health(&self, delay: Duration) {
        *self.health_delay.lock() = Some(delay);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    fn record(&self, call: Call) -> Result<()> {
        self.calls.lock().push(call);
        match self.failure.lock().clone() {
            Some(message) => Err(AppError::Backend(message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl App for StubApp {
    async fn health_check(&self) -> Result<()> {
        let delay = *self.health_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.record(Call::HealthCheck)
    }

    async fn get_settings(&self, tenant: &TenantId) -> Result<Settings> {
        self.record(Call::GetSettings(tenant.clone()))?;
        Ok(self.settings.lock().get(tenant).cloned().unwrap_or_default())
    }

    async fn set_settings(&self, tenant: &TenantId, settings: Settings) -> Result<()> {
        self.record(Call::SetSettings(tenant.clone(), settings.clone()))?;
        self.settings.lock().insert(tenant.clone(), settings);
        Ok(())
    }

    async fn get_device(&self, tenant: &TenantId, device_id: &DeviceId) -> Result<Device> {
        self.record(Call::GetDevice(tenant.clone(), device_id.clone()))?;
        Ok(Device {
            device_id: device_id.to_string(),
            status: Some("enabled".to_string()),
            ..Device::default()
        })
    }

    async fn get_device_twin(
        &self,
        tenant: &TenantId,
        device_id: &DeviceId,
    ) -> Result<DeviceTwin> {
        self.record(Call::GetDeviceTwin(tenant.clone(), device_id.clone()))?;
        Ok(DeviceTwin {
            device_id: device_id.to_string(),
            etag: Some("AAAAAAAAAAE=".to_string()),
            ..DeviceTwin::default()
        })
    }

    async fn set_device_twin(
        &self,
        tenant: &TenantId,
        device_id: &DeviceId,
        update: TwinUpdate,
    ) -> Result<()> {
        self.record(Call::SetDeviceTwin(tenant.clone(), device_id.clone(), update))
    }

    async fn update_device_twin(
        &self,
        tenant: &TenantId,
        device_id: &DeviceId,
        update: TwinUpdate,
    ) -> Result<()> {
        self.record(Call::UpdateDeviceTwin(
            tenant.clone(),
            device_id.clone(),
            update,
        ))
    }

    async fn get_device_modules(
        &self,
        tenant: &TenantId,
        device_id: &DeviceId,
    ) -> Result<Vec<Module>> {
        self.record(Call::GetDeviceModules(tenant.clone(), device_id.clone()))?;
        Ok(vec![Module {
            module_id: "$edgeAgent".to_string(),
            device_id: device_id.to_string(),
            ..Module::default()
        }])
    }
}

/// Router backed by `app` with the default configuration.
pub fn router(app: &Arc<StubApp>) -> Router {
    router_with_config(app, GatewayConfig::default())
}

pub fn router_with_config(app: &Arc<StubApp>, config: GatewayConfig) -> Router {
    let state = GatewayState::new(
        Arc::clone(app),
        Arc::new(JwtIdentityDecoder::new()),
        config,
    );
    create_router(state)
}

pub fn user_token(tenant: &str) -> String {
    encode_test_token(&Identity::user(tenant, "user-1"))
}

pub fn device_token(tenant: &str) -> String {
    encode_test_token(&Identity::device(tenant, "device-1"))
}

/// Builder for test requests.
pub struct TestRequest {
    builder: axum::http::request::Builder,
    body: Body,
}

impl TestRequest {
    pub fn new(method: Method, uri: &str) -> Self {
        Self {
            builder: Request::builder().method(method).uri(uri),
            body: Body::empty(),
        }
    }

    pub fn get(uri: &str) -> Self {
        Self::new(Method::GET, uri)
    }

    pub fn put(uri: &str) -> Self {
        Self::new(Method::PUT, uri)
    }

    pub fn patch(uri: &str) -> Self {
        Self::new(Method::PATCH, uri)
    }

    pub fn token(self, token: &str) -> Self {
        self.header("authorization", &format!("Bearer {token}"))
    }

    pub fn request_id(self, id: &str) -> Self {
        self.header("x-request-id", id)
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.builder = self.builder.header(name, value);
        self
    }

    pub fn json(mut self, body: &Value) -> Self {
        self.builder = self.builder.header("content-type", "application/json");
        self.body = Body::from(body.to_string());
        self
    }

    pub fn raw(mut self, body: &str) -> Self {
        self.body = Body::from(body.to_string());
        self
    }

    pub async fn send(self, router: &Router) -> TestResponse {
        let request = self.builder.body(self.body).unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        TestResponse::read(response).await
    }
}

/// A fully buffered response.
pub struct TestResponse {
    pub status: StatusCode,
    pub request_id: Option<String>,
    pub body: Vec<u8>,
}

impl TestResponse {
    async fn read(response: Response<Body>) -> Self {
        let status = response.status();
        let request_id = response
            .headers()
            .get("x-request-id")
            .map(|v| v.to_str().unwrap().to_string());
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec();
        Self {
            status,
            request_id,
            body,
        }
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        serde_json::from_slice(&self.body).unwrap()
    }
}
