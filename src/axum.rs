//! Axum integration utilities.

use std::future::poll_fn;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use crate::classifier::TierClassifier;
use crate::engine::Engine;
use crate::module::{PermissionAction, SystemModule};
use crate::principal::Principal;
use crate::types::TabId;

use ::axum::body::Body;
use ::axum::response::{IntoResponse, Response};
use ::http::{Request, StatusCode};
use ::tower::{Layer, Service};

/// Requirement enforced by an [`AccessGateLayer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub module: SystemModule,
    pub action: PermissionAction,
    pub tab: Option<TabId>,
}

/// Middleware layer that gates a route with [`Engine::guard`].
///
/// The authenticated [`Principal`] must already be present in the request
/// extensions.
#[derive(Debug)]
pub struct AccessGateLayer<C> {
    engine: Arc<Engine<C>>,
    requirement: Requirement,
}

impl<C> Clone for AccessGateLayer<C> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
            requirement: self.requirement.clone(),
        }
    }
}

impl<C> AccessGateLayer<C> {
    /// Creates a layer requiring `action` on `module`.
    pub fn new(engine: Arc<Engine<C>>, module: SystemModule, action: PermissionAction) -> Self {
        Self {
            engine,
            requirement: Requirement {
                module,
                action,
                tab: None,
            },
        }
    }

    /// Narrows the requirement to one tab.
    pub fn tab(mut self, tab: TabId) -> Self {
        self.requirement.tab = Some(tab);
        self
    }
}

impl<C, Inner> Layer<Inner> for AccessGateLayer<C> {
    type Service = AccessGateService<Inner, C>;

    fn layer(&self, inner: Inner) -> Self::Service {
        AccessGateService {
            inner,
            engine: self.engine.clone(),
            requirement: self.requirement.clone(),
        }
    }
}

/// Middleware service that enforces the gate.
#[derive(Debug)]
pub struct AccessGateService<Inner, C> {
    inner: Inner,
    engine: Arc<Engine<C>>,
    requirement: Requirement,
}

impl<Inner: Clone, C> Clone for AccessGateService<Inner, C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            engine: self.engine.clone(),
            requirement: self.requirement.clone(),
        }
    }
}

impl<Inner, C> Service<Request<Body>> for AccessGateService<Inner, C>
where
    Inner: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    Inner::Future: Send + 'static,
    C: TierClassifier + 'static,
{
    type Response = Response;
    type Error = Inner::Error;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let mut inner = self.inner.clone();
        let engine = self.engine.clone();
        let requirement = self.requirement.clone();

        Box::pin(async move {
            let Some(principal) = req.extensions().get::<Principal>().cloned() else {
                return Ok((StatusCode::UNAUTHORIZED, "missing principal").into_response());
            };

            let gate = engine.guard(
                &principal,
                requirement.module,
                requirement.action,
                requirement.tab.as_ref(),
            );
            match gate.into_result() {
                Ok(_) => {
                    poll_fn(|cx| inner.poll_ready(cx)).await?;
                    inner.call(req).await
                }
                Err(denied) => Ok((StatusCode::FORBIDDEN, denied.to_string()).into_response()),
            }
        })
    }
}
