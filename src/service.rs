use std::task::{Context, Poll};

use crate::http::Request;

/// A trait representing an asynchronous request handler.
pub trait Service {
    /// The type of response returned by the service.
    type Response;
    /// The type of error that can occur within the service.
    type Error;
    /// The future type returned by the service.
    type Future: Future<Output = Result<Self::Response, Self::Error>>;

    /// Polls to check if the service is ready to accept a request.
    ///
    /// # Arguments
    ///
    /// * `cx` - The context of the current task.
    ///
    /// # Returns
    ///
    /// A `Poll` indicating if the service is ready or not.
    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>>;

    /// Calls the service with a request.
    ///
    /// # Arguments
    ///
    /// * `request` - The parsed request to be processed by the service.
    ///
    /// # Returns
    ///
    /// A future resolving to the response, or to an error when no response
    /// could be built.
    fn call(&mut self, request: Request) -> Self::Future;
}

/// A trait representing a layer that wraps a service.
pub trait Layer<S> {
    /// The type of service produced by the layer.
    type Service;

    /// Wraps the given service with the layer.
    fn layer(&self, service: S) -> Self::Service;
}

/// A builder for stacking layers on top of a service.
pub struct ServiceBuilder<S> {
    service: S,
}

impl<S> ServiceBuilder<S> {
    pub fn new(service: S) -> Self {
        ServiceBuilder { service }
    }

    /// Adds a layer to the service.
    ///
    /// # Arguments
    ///
    /// * `layer` - The layer to be added. Layers added later wrap the ones
    ///   added earlier.
    ///
    /// # Returns
    ///
    /// A new `ServiceBuilder` with the layer added.
    pub fn layer<L>(self, layer: L) -> ServiceBuilder<L::Service>
    where
        L: Layer<S>,
    {
        ServiceBuilder {
            service: layer.layer(self.service),
        }
    }

    pub fn build(self) -> S {
        self.service
    }
}

/// A service that handles requests using a function. Used to stand in for
/// the router in tests.
#[cfg(test)]
#[derive(Clone)]
pub struct HandlerService<F> {
    f: F,
}

#[cfg(test)]
impl<F, Fut, R, E> Service for HandlerService<F>
where
    F: FnMut(Request) -> Fut,
    Fut: Future<Output = Result<R, E>>,
{
    type Response = R;
    type Error = E;
    type Future = Fut;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        (self.f)(request)
    }
}

/// Creates a new `HandlerService` with the given function.
///
/// # Arguments
///
/// * `f` - The function to handle requests.
///
/// # Returns
///
/// A new `HandlerService` instance.
#[cfg(test)]
pub fn service_fn<F, Fut, R, E>(f: F) -> HandlerService<F>
where
    F: FnMut(Request) -> Fut,
    Fut: Future<Output = Result<R, E>>,
{
    HandlerService { f }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{Response, StatusCode, parser::parse};

    struct Tag(&'static str);

    impl<S> Layer<S> for Tag {
        type Service = Tagged<S>;

        fn layer(&self, service: S) -> Self::Service {
            Tagged {
                inner: service,
                tag: self.0,
            }
        }
    }

    struct Tagged<S> {
        inner: S,
        tag: &'static str,
    }

    impl<S> Service for Tagged<S>
    where
        S: Service<Response = Response>,
        S::Future: Send + 'static,
    {
        type Response = Response;
        type Error = S::Error;
        type Future = futures::future::BoxFuture<'static, Result<Response, S::Error>>;

        fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            self.inner.poll_ready(cx)
        }

        fn call(&mut self, request: Request) -> Self::Future {
            let future = self.inner.call(request);
            let tag = self.tag;
            Box::pin(async move {
                let mut response = future.await?;
                let mut body = response.body.clone();
                body.extend_from_slice(tag.as_bytes());
                response.set_body(body);
                Ok(response)
            })
        }
    }

    #[tokio::test]
    async fn layers_wrap_in_order() {
        let handler = service_fn(|_request: Request| async {
            Ok::<_, String>(Response::new(StatusCode::OK))
        });
        let mut service = ServiceBuilder::new(handler)
            .layer(Tag("a"))
            .layer(Tag("b"))
            .build();

        let request = parse(b"GET / HTTP/1.1\r\n\r\n").unwrap();
        let response = service.call(request).await.unwrap();

        assert_eq!(response.body, b"ab");
    }
}
