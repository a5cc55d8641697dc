//! Request tracing middleware
//!
//! 为每个请求生成 UUID，写入 tracing span 与 `X-Request-ID` 响应头，
//! 请求结束时记录状态码与耗时。

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpRequest,
    dev::{ServiceRequest, ServiceResponse},
    http::header::{HeaderName, HeaderValue},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::time::Instant;
use tracing::{Instrument, debug, info_span};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// 请求 ID，可从 request extensions 中提取
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    /// 取出中间件为当前请求生成的 ID；未挂载中间件时为 `None`
    pub fn current(req: &HttpRequest) -> Option<Self> {
        req.extensions().get::<RequestId>().cloned()
    }
}

#[derive(Clone, Default)]
pub struct RequestTrace;

impl<S, B> Transform<S, ServiceRequest> for RequestTrace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestTraceService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestTraceService {
            service: Rc::new(service),
        }))
    }
}

pub struct RequestTraceService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequestTraceService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let start = Instant::now();

        let request_id = Uuid::new_v4().to_string();
        req.extensions_mut().insert(RequestId(request_id.clone()));

        let span = info_span!(
            "request",
            request_id = %request_id,
            method = %req.method(),
            path = %req.path(),
        );

        Box::pin(
            async move {
                let mut response = srv.call(req).await?;

                if let Ok(value) = HeaderValue::from_str(&request_id) {
                    response
                        .headers_mut()
                        .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
                }

                debug!(
                    status = response.status().as_u16(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "request completed"
                );

                Ok(response)
            }
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test, web};

    async fn echo_request_id(req: HttpRequest) -> HttpResponse {
        match RequestId::current(&req) {
            Some(RequestId(id)) => HttpResponse::Ok().body(id),
            None => HttpResponse::NotFound().finish(),
        }
    }

    #[actix_rt::test]
    async fn test_handler_sees_same_id_as_header() {
        let app = test::init_service(
            App::new()
                .wrap(RequestTrace)
                .route("/id", web::get().to(echo_request_id)),
        )
        .await;

        let req = test::TestRequest::get().uri("/id").to_request();
        let resp = test::call_service(&app, req).await;
        let header = resp
            .headers()
            .get(REQUEST_ID_HEADER)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();

        let body = test::read_body(resp).await;
        assert_eq!(body, header.as_bytes());
        assert!(Uuid::parse_str(&header).is_ok());
    }

    #[actix_rt::test]
    async fn test_ids_differ_between_requests() {
        let app = test::init_service(
            App::new()
                .wrap(RequestTrace)
                .route("/id", web::get().to(echo_request_id)),
        )
        .await;

        let first = test::call_and_read_body(&app, test::TestRequest::get().uri("/id").to_request()).await;
        let second = test::call_and_read_body(&app, test::TestRequest::get().uri("/id").to_request()).await;
        assert_ne!(first, second);
    }

    #[actix_rt::test]
    async fn test_no_id_without_middleware() {
        let req = test::TestRequest::default().to_http_request();
        assert_eq!(RequestId::current(&req), None);
    }
}
