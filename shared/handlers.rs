//! Serverless handlers for the documentation routes.
//!
//! | Route               | Document | Format                  |
//! |---------------------|----------|-------------------------|
//! | `/swagger/spec`     | primary  | inline JSON             |
//! | `/v2/openapi`       | primary  | `nile-auth.yaml` download |
//! | `/v2/swagger/spec`  | v2       | inline JSON             |

use crate::builder::CachedSpec;
use crate::error::ApiError;
use crate::formats::{serve, Delivery, FormatEnvelope};
use crate::registry::SpecRegistry;
use tracing::{debug, error};
use vercel_runtime::{Body, Error, Request, Response};

const ALLOWED: [&str; 3] = ["GET", "HEAD", "OPTIONS"];
const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";
const CACHE_CONTROL: &str = "public, max-age=300";

/// `GET /swagger/spec`
pub async fn swagger_spec(req: Request) -> Result<Response<Body>, Error> {
    respond(
        &req,
        &SpecRegistry::global().primary,
        &Delivery::swagger_json(),
    )
}

/// `GET /v2/openapi`
pub async fn v2_openapi(req: Request) -> Result<Response<Body>, Error> {
    respond(
        &req,
        &SpecRegistry::global().primary,
        &Delivery::yaml_download(),
    )
}

/// `GET /v2/swagger/spec`
pub async fn v2_swagger_spec(req: Request) -> Result<Response<Body>, Error> {
    respond(&req, &SpecRegistry::global().v2, &Delivery::swagger_json())
}

/// Serve `spec` to `req` the way `delivery` describes
pub fn respond(
    req: &Request,
    spec: &CachedSpec,
    delivery: &Delivery,
) -> Result<Response<Body>, Error> {
    let method = req.method().as_str();

    // Handle CORS preflight
    if method == "OPTIONS" {
        return Ok(Response::builder()
            .status(200)
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", ALLOWED_METHODS)
            .header("Access-Control-Allow-Headers", "Content-Type, If-None-Match")
            .body(Body::Empty)?);
    }

    if method != "GET" && method != "HEAD" {
        let body = serde_json::to_string(&ApiError::method_not_allowed(method, &ALLOWED))?;
        return Ok(Response::builder()
            .status(405)
            .header("content-type", "application/json")
            .header("Allow", ALLOWED_METHODS)
            .body(body.into())?);
    }

    let envelope = match serve(spec, delivery) {
        Ok(envelope) => envelope,
        Err(err) => {
            error!(path = %req.uri().path(), error = %err, "Failed to serve OpenAPI document");
            let body = serde_json::to_string(&ApiError::from(&err))?;
            return Ok(Response::builder()
                .status(500)
                .header("content-type", "application/json")
                .body(body.into())?);
        }
    };

    let etag = envelope.etag();
    if if_none_match(req, &etag) {
        debug!(path = %req.uri().path(), "OpenAPI document not modified");
        return Ok(Response::builder()
            .status(304)
            .header("ETag", etag)
            .header("Cache-Control", CACHE_CONTROL)
            .body(Body::Empty)?);
    }

    document_response(envelope, etag, method == "HEAD")
}

fn document_response(
    envelope: FormatEnvelope,
    etag: String,
    head_only: bool,
) -> Result<Response<Body>, Error> {
    let mut builder = Response::builder()
        .status(200)
        .header("content-type", envelope.content_type)
        .header("ETag", etag)
        .header("Cache-Control", CACHE_CONTROL)
        .header("Access-Control-Allow-Origin", "*");

    if let Some(disposition) = &envelope.content_disposition {
        builder = builder.header("Content-Disposition", disposition.as_str());
    }

    let body = if head_only {
        Body::Empty
    } else {
        Body::Binary(envelope.payload)
    };
    Ok(builder.body(body)?)
}

fn if_none_match(req: &Request, etag: &str) -> bool {
    let Some(value) = req
        .headers()
        .get("if-none-match")
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };

    value.split(',').map(str::trim).any(|candidate| {
        candidate == "*" || candidate.strip_prefix("W/").unwrap_or(candidate) == etag
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(method: &str, if_none_match: Option<&str>) -> Request {
        let mut req = Request::new(Body::Empty);
        *req.method_mut() = method.parse().unwrap();
        if let Some(value) = if_none_match {
            req.headers_mut()
                .insert("if-none-match", value.parse().unwrap());
        }
        req
    }

    #[test]
    fn if_none_match_accepts_lists_and_weak_tags() {
        let etag = "\"abc\"";
        assert!(if_none_match(&request("GET", Some("\"abc\"")), etag));
        assert!(if_none_match(&request("GET", Some("\"x\", W/\"abc\"")), etag));
        assert!(if_none_match(&request("GET", Some("*")), etag));
        assert!(!if_none_match(&request("GET", Some("\"x\"")), etag));
        assert!(!if_none_match(&request("GET", None), etag));
    }
}
