use shared::health::health_report;
use shared::SpecRegistry;
use vercel_runtime::{run, Body, Error, Request, Response};

#[tokio::main]
async fn main() -> Result<(), Error> {
    shared::logging::init();
    run(handler).await
}

pub async fn handler(_req: Request) -> Result<Response<Body>, Error> {
    let (status, body) = health_report(SpecRegistry::global());

    let response = Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .header("Cache-Control", "no-store")
        .body(body.to_string().into())?;

    Ok(response)
}
