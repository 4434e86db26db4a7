use crate::logger::Logger;
use hyper::{
    body,
    service::{make_service_fn, service_fn},
    Body, Method, Request, Response, StatusCode, Uri,
};
use percent_encoding::percent_decode_str;
use regex::Regex;
use std::{collections::HashMap, convert::Infallible, future::Future, net::SocketAddr, pin::Pin, sync::Arc};

pub type Parameters = HashMap<String, String>;

fn decode_segment(segment: &str) -> String {
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}

/// A path template where every `{name}` matches one path segment.
pub struct DynamicUri {
    regex: Regex,
    names: Vec<String>,
}

impl DynamicUri {
    pub fn new(uri: &str) -> Result<Self, regex::Error> {
        let placeholder = Regex::new(r"\{([^\{\}/]*)\}")?;
        let mut pattern = String::from("^");
        let mut names = Vec::new();
        let mut offset = 0;
        for captures in placeholder.captures_iter(uri) {
            let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            pattern.push_str(&regex::escape(&uri[offset..whole.start()]));
            pattern.push_str("([^/]*)");
            names.push(name.as_str().to_string());
            offset = whole.end();
        }
        pattern.push_str(&regex::escape(&uri[offset..]));
        pattern.push('$');
        Ok(Self {
            regex: Regex::new(&pattern)?,
            names,
        })
    }

    pub fn check(&self, path: &str) -> Option<Parameters> {
        let captures = self.regex.captures(path)?;
        Some(
            self.names
                .iter()
                .zip(captures.iter().skip(1))
                .map(|(name, capture)| (name.clone(), capture.map_or_else(String::new, |capture| decode_segment(capture.as_str()))))
                .collect(),
        )
    }
}

fn parse_query(query: &str, parameters: &mut Parameters) {
    for (name, value) in form_urlencoded::parse(query.as_bytes()) {
        parameters.insert(name.into_owned(), value.into_owned());
    }
}

type BoxedResponseFuture = Pin<Box<dyn Send + Future<Output = Response<Body>>>>;
type BoxedHandler<S> = Box<dyn Fn(Parameters, Vec<u8>, Arc<S>) -> BoxedResponseFuture + Send + Sync>;

struct Route<S> {
    method: Method,
    dynamic_uri: DynamicUri,
    handler: BoxedHandler<S>,
}

pub struct Router<S> {
    routes: Vec<Route<S>>,
    fallback: fn() -> Response<Body>,
    state: Arc<S>,
    logger: Logger,
}

impl<S> Router<S> {
    pub fn new(state: Arc<S>, logger: Logger, fallback: fn() -> Response<Body>) -> Self {
        Self {
            routes: Vec::new(),
            fallback,
            state,
            logger,
        }
    }

    pub fn add<H, F>(&mut self, method: Method, uri: &str, handler: H) -> Result<(), regex::Error>
    where
        H: 'static + Fn(Parameters, Vec<u8>, Arc<S>) -> F + Send + Sync,
        F: 'static + Future<Output = Response<Body>> + Send,
    {
        self.routes.push(Route {
            method,
            dynamic_uri: DynamicUri::new(uri)?,
            handler: Box::new(move |parameters, body, state| Box::pin(handler(parameters, body, state))),
        });
        Ok(())
    }

    pub async fn route(&self, method: &Method, uri: &Uri, body: Vec<u8>) -> Response<Body> {
        self.logger.log(format!("{} {}", method, uri));
        for route in &self.routes {
            if method != route.method {
                continue;
            }
            if let Some(mut parameters) = route.dynamic_uri.check(uri.path()) {
                if let Some(query) = uri.query() {
                    parse_query(query, &mut parameters);
                }
                return (route.handler)(parameters, body, self.state.clone()).await;
            }
        }
        (self.fallback)()
    }
}

pub struct Server<S> {
    router: Router<S>,
}

impl<S: 'static + Send + Sync> Server<S> {
    pub fn new(state: Arc<S>, logger: Logger, fallback: fn() -> Response<Body>) -> Self {
        Self {
            router: Router::new(state, logger, fallback),
        }
    }

    pub fn get<H, F>(&mut self, uri: &str, handler: H) -> Result<(), regex::Error>
    where
        H: 'static + Fn(Parameters, Vec<u8>, Arc<S>) -> F + Send + Sync,
        F: 'static + Future<Output = Response<Body>> + Send,
    {
        self.router.add(Method::GET, uri, handler)
    }

    pub fn post<H, F>(&mut self, uri: &str, handler: H) -> Result<(), regex::Error>
    where
        H: 'static + Fn(Parameters, Vec<u8>, Arc<S>) -> F + Send + Sync,
        F: 'static + Future<Output = Response<Body>> + Send,
    {
        self.router.add(Method::POST, uri, handler)
    }

    #[cfg(test)]
    pub async fn handle(&self, request: Request<Body>) -> Response<Body> {
        handle(&self.router, request).await
    }

    pub async fn run(self, address: SocketAddr) -> Result<(), hyper::Error> {
        let router = Arc::new(self.router);
        let make_service = make_service_fn(|_| {
            let router = router.clone();
            async {
                Ok::<_, Infallible>(service_fn(move |request: Request<Body>| {
                    let router = router.clone();
                    async move { Ok::<_, Infallible>(handle(&router, request).await) }
                }))
            }
        });
        hyper::Server::try_bind(&address)?.serve(make_service).await
    }
}

async fn handle<S>(router: &Router<S>, request: Request<Body>) -> Response<Body> {
    let (parts, body) = request.into_parts();
    match body::to_bytes(body).await {
        Ok(body) => router.route(&parts.method, &parts.uri, body.to_vec()).await,
        Err(error) => {
            router.logger.log(format!("{} {} failed reading body: {}", parts.method, parts.uri, error));
            Response::builder()
                .status(StatusCode::BAD_REQUEST)
                .body(Body::from("Unreadable body"))
                .unwrap_or_default()
        }
    }
}
