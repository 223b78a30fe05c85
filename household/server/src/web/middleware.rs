use axum::http::{HeaderValue, Request, Response, header};
use pin_project_lite::pin_project;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Layer that marks every response as JSON unless the handler already set a
/// content type. Bodiless responses such as `204 No Content` get the header
/// too.
#[derive(Clone, Default)]
pub struct JsonContentTypeLayer;

impl JsonContentTypeLayer {
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for JsonContentTypeLayer {
    type Service = JsonContentTypeService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        JsonContentTypeService { inner }
    }
}

#[derive(Clone)]
pub struct JsonContentTypeService<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for JsonContentTypeService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = JsonContentTypeFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<ReqBody>) -> Self::Future {
        JsonContentTypeFuture {
            future: self.inner.call(request),
        }
    }
}

pin_project! {
    pub struct JsonContentTypeFuture<F> {
        #[pin]
        future: F,
    }
}

impl<F, ResBody, E> Future for JsonContentTypeFuture<F>
where
    F: Future<Output = Result<Response<ResBody>, E>>,
{
    type Output = Result<Response<ResBody>, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        match this.future.poll(cx) {
            Poll::Ready(Ok(mut response)) => {
                response
                    .headers_mut()
                    .entry(header::CONTENT_TYPE)
                    .or_insert(HeaderValue::from_static("application/json"));
                Poll::Ready(Ok(response))
            }
            Poll::Ready(Err(e)) => Poll::Ready(Err(e)),
            Poll::Pending => Poll::Pending,
        }
    }
}
