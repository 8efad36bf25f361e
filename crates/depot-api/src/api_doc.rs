//! OpenAPI documentation aggregation.

use utoipa::OpenApi;

use crate::error::ErrorResponse;
use crate::handlers;
use depot_core::models::{BlobRef, FileKind, FileRecordResponse, KindUsage, SpaceUsage};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Depot API",
        description = "File storage API: upload, rename, share, delete, and space usage."
    ),
    paths(
        handlers::file_upload::upload_file,
        handlers::file_rename::rename_file,
        handlers::file_share::share_file,
        handlers::file_delete::delete_file,
        handlers::space::space_usage,
    ),
    components(schemas(
        BlobRef,
        ErrorResponse,
        FileKind,
        FileRecordResponse,
        KindUsage,
        SpaceUsage,
        handlers::file_rename::RenameRequest,
        handlers::file_share::ShareRequest,
    )),
    tags(
        (name = "files", description = "File upload and lifecycle"),
        (name = "space", description = "Space usage")
    )
)]
pub struct ApiDoc;
