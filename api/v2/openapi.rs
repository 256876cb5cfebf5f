use vercel_runtime::{run, Body, Error, Request, Response};

#[tokio::main]
async fn main() -> Result<(), Error> {
    shared::logging::init();
    run(handler).await
}

/// Serves `nile-auth.yaml` as a download
pub async fn handler(req: Request) -> Result<Response<Body>, Error> {
    shared::handlers::v2_openapi(req).await
}
