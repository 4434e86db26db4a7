use crate::{
    error::Error,
    logger::Logger,
    server::{Parameters, Server},
};
use bech32_codec::{
    bech32::{Decoded, Decoder, Encoder},
    hex,
};
use hyper::{Body, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

macro_rules! unwrap {
    ( $x:expr ) => {{
        match $x {
            Ok(result) => result,
            Err(error) => return respond_error(error),
        }
    }};
}

pub struct State {
    decoder: &'static Decoder<'static>,
    encoder: &'static Encoder<'static>,
}

impl State {
    pub fn new(decoder: &'static Decoder<'static>, encoder: &'static Encoder<'static>) -> Self {
        Self { decoder, encoder }
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new(Decoder::default(), Encoder::default())
    }
}

#[derive(Debug, Deserialize)]
struct EncodeRequest {
    label: String,
    payload: String,
    bits: Option<usize>,
}

fn parameter<'a>(parameters: &'a Parameters, name: &str) -> Result<&'a str, Error> {
    parameters
        .get(name)
        .map(String::as_str)
        .ok_or_else(|| Error::new(format!("Missing {} parameter", name)))
}

fn parse_bits(parameters: &Parameters) -> Result<Option<usize>, Error> {
    match parameters.get("bits") {
        Some(bits) => bits
            .parse::<usize>()
            .map(Some)
            .map_err(|_| Error::new(format!(r#"Invalid bits parameter "{}""#, bits))),
        None => Ok(None),
    }
}

fn parse_strings_from_body(body: &[u8]) -> Result<Vec<String>, Error> {
    let body = std::str::from_utf8(body).map_err(|_| Error::new("Invalid utf8 body"))?;
    let json: serde_json::Value = serde_json::from_str(body).map_err(|_| Error::new("Invalid JSON body"))?;
    let array = json.as_array().ok_or_else(|| Error::new("Expecting array in JSON body"))?;
    array
        .iter()
        .map(|string| match string.as_str() {
            Some(string) => Ok(string.to_string()),
            None => Err(Error::new("Expecting array of strings in JSON body")),
        })
        .collect()
}

fn parse_encode_request_from_body(body: &[u8]) -> Result<EncodeRequest, Error> {
    serde_json::from_slice(body).map_err(|error| Error::new(format!("Invalid JSON body: {}", error)))
}

fn format_decoded(decoded: &Decoded) -> serde_json::Value {
    json!({
        "label": decoded.label(),
        "payload": hex::encode(decoded.payload()),
        "padding": decoded.padding(),
        "bits": decoded.bits(),
    })
}

fn encode(state: &State, label: &str, payload: &str, bits: Option<usize>) -> Result<serde_json::Value, Error> {
    let payload = hex::decode(payload)?;
    let bits = bits.unwrap_or(payload.len() * 8);
    let string = state.encoder.encode(label, &payload, bits)?;
    Ok(json!({ "string": string }))
}

fn respond(status: StatusCode, value: serde_json::Value) -> Response<Body> {
    let mut response = Response::new(Body::from(value.to_string()));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(hyper::header::CONTENT_TYPE, hyper::header::HeaderValue::from_static("application/json"));
    response
}

fn respond_ok(value: serde_json::Value) -> Response<Body> {
    respond(StatusCode::OK, value)
}

fn respond_error(error: Error) -> Response<Body> {
    respond(StatusCode::BAD_REQUEST, json!({ "message": error.message() }))
}

fn respond_not_found() -> Response<Body> {
    respond(StatusCode::NOT_FOUND, json!({ "message": "Not Found" }))
}

pub fn create_server(state: Arc<State>, logger: Logger) -> Result<Server<State>, regex::Error> {
    let mut server = Server::new(state, logger, respond_not_found);

    server.get("/decode/{string}", |parameters, _body, state| async move {
        let string = unwrap!(parameter(&parameters, "string"));
        let decoded = unwrap!(state.decoder.decode(string).map_err(Error::from));
        respond_ok(format_decoded(&decoded))
    })?;

    server.post("/decode", |_parameters, body, state| async move {
        let strings = unwrap!(parse_strings_from_body(&body));
        respond_ok(json!(strings
            .iter()
            .map(|string| match state.decoder.decode(string) {
                Ok(decoded) => format_decoded(&decoded),
                Err(error) => json!({ "string": string, "message": error.to_string() }),
            })
            .collect::<Vec<_>>()))
    })?;

    server.get("/encode/{label}/{payload}", |parameters, _body, state| async move {
        let label = unwrap!(parameter(&parameters, "label"));
        let payload = unwrap!(parameter(&parameters, "payload"));
        let bits = unwrap!(parse_bits(&parameters));
        respond_ok(unwrap!(encode(&state, label, payload, bits)))
    })?;

    server.post("/encode", |_parameters, body, state| async move {
        let request = unwrap!(parse_encode_request_from_body(&body));
        respond_ok(unwrap!(encode(&state, &request.label, &request.payload, request.bits)))
    })?;

    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::{create_server, State};
    use crate::logger::Logger;
    use hyper::{body, Body, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tokio::runtime::Runtime;

    fn request(method: Method, uri: &str, body: &str) -> (StatusCode, Value) {
        let server = create_server(Arc::new(State::default()), Logger::new()).unwrap();
        let request = Request::builder().method(method).uri(uri).body(Body::from(body.to_string())).unwrap();
        Runtime::new().unwrap().block_on(async move {
            let response = server.handle(request).await;
            let status = response.status();
            let body = body::to_bytes(response.into_body()).await.unwrap();
            (status, serde_json::from_slice(&body).unwrap())
        })
    }

    #[test]
    fn decode() {
        assert_eq!(
            request(Method::GET, "/decode/test1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqql6aptf", ""),
            (
                StatusCode::OK,
                json!({"label": "test", "payload": "00".repeat(20), "padding": 0, "bits": 160})
            )
        );
        assert_eq!(
            request(Method::GET, "/decode/bc1upa068g", ""),
            (StatusCode::OK, json!({"label": "bc", "payload": "e0", "padding": 3, "bits": 5}))
        );
        assert_eq!(
            request(Method::GET, "/decode/%3F1ezyfcl", ""),
            (StatusCode::OK, json!({"label": "?", "payload": "", "padding": 0, "bits": 0}))
        );
    }

    #[test]
    fn decode_error() {
        assert_eq!(
            request(Method::GET, "/decode/x1b4n0q5v", ""),
            (StatusCode::BAD_REQUEST, json!({"message": "Invalid character 'b' at index 2"}))
        );
        assert_eq!(
            request(Method::GET, "/decode/A12uEL5L", ""),
            (StatusCode::BAD_REQUEST, json!({"message": "Mix of upper and lower case"}))
        );
    }

    #[test]
    fn decode_array() {
        let (status, value) = request(Method::POST, "/decode", r#"["a12uel5l", "1qzzfhee"]"#);
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            value,
            json!([
                {"label": "a", "payload": "", "padding": 0, "bits": 0},
                {"string": "1qzzfhee", "message": "Missing human-readable part"}
            ])
        );
        assert_eq!(
            request(Method::POST, "/decode", r#"{"string": "a12uel5l"}"#),
            (StatusCode::BAD_REQUEST, json!({"message": "Expecting array in JSON body"}))
        );
    }

    #[test]
    fn encode() {
        assert_eq!(
            request(Method::GET, &format!("/encode/test/{}", "00".repeat(20)), ""),
            (StatusCode::OK, json!({"string": "test1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqql6aptf"}))
        );
        assert_eq!(
            request(Method::GET, "/encode/bc/ff?bits=3", ""),
            (StatusCode::OK, json!({"string": "bc1upa068g"}))
        );
        assert_eq!(
            request(Method::POST, "/encode", r#"{"label": "bc", "payload": "0102030405"}"#),
            (StatusCode::OK, json!({"string": "bc1qypqxpq9f3wf05"}))
        );
    }

    #[test]
    fn encode_error() {
        assert_eq!(
            request(Method::GET, "/encode/bc/ff?bits=9", ""),
            (StatusCode::BAD_REQUEST, json!({"message": "Input of 8 bits too short for 9 bits"}))
        );
        assert_eq!(
            request(Method::GET, "/encode/bc/fg", ""),
            (
                StatusCode::BAD_REQUEST,
                json!({"message": "Invalid hex payload: Invalid character 'g' at position 1"})
            )
        );
        assert_eq!(
            request(Method::GET, "/encode/bc/ff?bits=three", ""),
            (StatusCode::BAD_REQUEST, json!({"message": r#"Invalid bits parameter "three""#}))
        );
    }

    #[test]
    fn not_found() {
        assert_eq!(
            request(Method::GET, "/decode", ""),
            (StatusCode::NOT_FOUND, json!({"message": "Not Found"}))
        );
        assert_eq!(
            request(Method::DELETE, "/decode/a12uel5l", ""),
            (StatusCode::NOT_FOUND, json!({"message": "Not Found"}))
        );
    }
}
