use utoipa::OpenApi;

use crate::{api, store};

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health,
        api::generate,
        api::list,
        api::view,
        api::image,
        api::download,
        api::download_all,
    ),
    components(
        schemas(
            api::GenerateRequest,
            api::GenerateResponse,
            api::ViewResponse,
            api::HealthResponse,
            store::CertRecord,
        )
    ),
    tags(
        (name = "certgen", description = "Participation certificate API")
    )
)]
pub struct ApiDoc;
