//! Tower layer that runs a gate pipeline in front of a route.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::extract::rejection::RawPathParamsRejection;
use axum::extract::{FromRequestParts, RawPathParams, Request};
use axum::response::{IntoResponse, Response};
use http::header;
use http::request::Parts;
use tower::{Layer, Service};

use crate::config::PathParamNames;
use crate::domain::context::{GateRequest, RequestContext};
use crate::domain::error::{GateError, Rejection};
use crate::domain::pipeline::Pipeline;

struct GateState {
    pipeline: Pipeline,
    path_params: PathParamNames,
}

/// Runs a [`Pipeline`] for every request reaching the wrapped route.
///
/// Path parameters are only known after routing, so attach it with
/// `route_layer` or on a method router:
///
/// ```ignore
/// let router = Router::new()
///     .route("/classes/{class_id}/students", get(list_students))
///     .route_layer(gate.chain().authenticate().tenant_match().supervisor_only().layer());
/// ```
#[derive(Clone)]
pub struct GateLayer {
    state: Arc<GateState>,
}

impl GateLayer {
    #[must_use]
    pub fn new(pipeline: Pipeline, path_params: PathParamNames) -> Self {
        Self {
            state: Arc::new(GateState {
                pipeline,
                path_params,
            }),
        }
    }
}

impl<S> Layer<S> for GateLayer {
    type Service = GateService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        GateService {
            inner,
            state: self.state.clone(),
        }
    }
}

#[derive(Clone)]
pub struct GateService<S> {
    inner: S,
    state: Arc<GateState>,
}

impl<S> Service<Request<Body>> for GateService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let state = self.state.clone();
        let not_ready_inner = self.inner.clone();
        let mut ready_inner = std::mem::replace(&mut self.inner, not_ready_inner);

        Box::pin(async move {
            let (mut parts, body) = request.into_parts();
            let gate_request = match gate_request(&mut parts, &state.path_params).await {
                Ok(gate_request) => gate_request,
                Err(rejection) => return Ok(GateError::from(rejection).into_response()),
            };

            // An outer gate layer may already have authenticated this request.
            let mut ctx = parts
                .extensions
                .remove::<RequestContext>()
                .unwrap_or_default();

            if let Err(err) = state.pipeline.run(&gate_request, &mut ctx).await {
                return Ok(err.into_response());
            }

            parts.extensions.insert(ctx);
            ready_inner.call(Request::from_parts(parts, body)).await
        })
    }
}

/// Collect path segments and the `Authorization` header.
///
/// A segment that is not valid UTF-8 cannot name any class, member or project,
/// so the request is refused as not found before any stage runs.
async fn gate_request(
    parts: &mut Parts,
    names: &PathParamNames,
) -> Result<GateRequest, Rejection> {
    let mut request = GateRequest::new();

    match RawPathParams::from_request_parts(parts, &()).await {
        Ok(params) => {
            for (name, value) in &params {
                if name == names.tenant {
                    request = request.tenant(value);
                } else if name == names.member {
                    request = request.member(value);
                } else if name == names.project {
                    request = request.project(value);
                }
            }
        }
        // Route without path parameters; stages that need one report it.
        Err(RawPathParamsRejection::MissingPathParams(_)) => {}
        Err(err) => {
            tracing::debug!(error = %err, "unreadable path parameter");
            return Err(Rejection::NotFound);
        }
    }

    if let Some(value) = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        request = request.authorization(value);
    }

    Ok(request)
}
