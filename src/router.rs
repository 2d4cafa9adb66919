use std::io;
use std::task::{Context, Poll};

use futures::future::{BoxFuture, FutureExt};
use thiserror::Error;

use crate::http::encoding::{self, GZIP};
use crate::http::{
    CONTENT_ENCODING, Method, OCTET_STREAM, Request, Response, StatusCode, TEXT_PLAIN, USER_AGENT,
};
use crate::service::Service;
use crate::storage::{FileStore, StoreError};

/// Failures that leave the router without a response to send.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("compressing response body: {0}")]
    Compression(#[from] io::Error),
}

/// Maps a parsed request onto the fixed route table.
///
/// | method | path            | behaviour                         |
/// |--------|-----------------|-----------------------------------|
/// | any    | `/`             | 200, empty body                   |
/// | any    | `/user-agent`   | 200, echoes `User-Agent`          |
/// | any    | `/echo/{text}`  | 200, echoes `text`, maybe gzipped |
/// | GET    | `/files/{name}` | 200 with the file, or 404 / 502   |
/// | POST   | `/files/{name}` | 201 after storing the body        |
///
/// Everything else is a 404.
#[derive(Debug, Clone)]
pub struct Router {
    files: FileStore,
}

impl Router {
    pub fn new(files: FileStore) -> Self {
        Router { files }
    }

    pub async fn route(&self, request: &Request) -> Result<Response, RouteError> {
        let path = request.path.as_str();

        let response = if path == "/" {
            let mut response = Response::new(StatusCode::OK);
            response.set_content_type(TEXT_PLAIN);
            response
        } else if path == "/user-agent" {
            let mut response = Response::new(StatusCode::OK);
            response.set_content_type(TEXT_PLAIN);
            response.set_body(request.header(USER_AGENT).as_bytes().to_vec());
            response
        } else if path.starts_with("/echo/") {
            self.echo(request)?
        } else if path.starts_with("/files/") {
            match request.method {
                Method::Get => self.get_file(request).await,
                Method::Post => self.post_file(request).await,
                Method::Other(_) => Response::new(StatusCode::NOT_FOUND),
            }
        } else {
            Response::new(StatusCode::NOT_FOUND)
        };

        Ok(response)
    }

    fn echo(&self, request: &Request) -> Result<Response, RouteError> {
        let text = request.segments().get(2).copied().unwrap_or_default();

        let mut response = Response::new(StatusCode::OK);
        response.set_content_type(TEXT_PLAIN);
        if encoding::accepts_gzip(&request.headers) {
            response.headers.set(CONTENT_ENCODING, GZIP);
            response.set_body(encoding::gzip(text.as_bytes())?);
        } else {
            response.set_body(text.as_bytes().to_vec());
        }
        Ok(response)
    }

    async fn get_file(&self, request: &Request) -> Response {
        let segments = request.segments();
        let [_, _, name] = segments[..] else {
            return Response::new(StatusCode::NOT_FOUND);
        };

        match self.files.read(name).await {
            Ok(contents) => {
                let mut response = Response::new(StatusCode::OK);
                response.set_content_type(OCTET_STREAM);
                response.set_body(contents);
                response
            }
            Err(StoreError::NotFound(path)) => {
                tracing::debug!(path = %path.display(), "requested file does not exist");
                Response::new(StatusCode::NOT_FOUND)
            }
            Err(e) => {
                tracing::error!(error = %e, "reading file failed");
                Response::new(StatusCode::BAD_GATEWAY)
            }
        }
    }

    async fn post_file(&self, request: &Request) -> Response {
        let segments = request.segments();
        let [_, _, name] = segments[..] else {
            return Response::new(StatusCode::BAD_REQUEST);
        };

        match self.files.write(name, &request.body).await {
            Ok(()) => Response::new(StatusCode::CREATED),
            Err(e) => {
                tracing::error!(error = %e, "writing file failed");
                Response::new(StatusCode::BAD_GATEWAY)
            }
        }
    }
}

impl Service for Router {
    type Response = Response;
    type Error = RouteError;
    type Future = BoxFuture<'static, Result<Response, RouteError>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let router = self.clone();
        async move { router.route(&request).await }.boxed()
    }
}
