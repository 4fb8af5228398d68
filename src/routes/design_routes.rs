use crate::constants::MediaType;
use crate::handlers::{design_handler, not_found};
use crate::middleware::{
    is_design_exists_create, upload_media, validation_create, validation_delete, MediaUpload,
};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    handler::Handler,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, MethodRouter},
    Router,
};
use tower::ServiceBuilder;

/// Design resource routes.
///
/// | Method | Path                     | Chain                                                              |
/// |--------|--------------------------|--------------------------------------------------------------------|
/// | GET    | `/design`                | get_all                                                            |
/// | GET    | `/design/{id}`           | get_one                                                            |
/// | GET    | `/designgetById/{id}`    | get_by_id                                                          |
/// | POST   | `/design`                | upload_media(design), validation_create, is_design_exists_create, create |
/// | DELETE | `/design`                | validation_delete, delete                                          |
/// | POST   | `/design/update_picture` | update_picture                                                     |
/// | POST   | `/design/send_email`     | send_email                                                         |
///
/// Routes resolve first-declared-wins: `GET /design/update_picture` and
/// `GET /design/send_email` reach `get_one` with the literal segment as id.
/// `/design/` is the same resource as `/design`. An undeclared method on a
/// declared path falls through to `not_found`.
pub fn create_design_routes(state: AppState) -> Router<AppState> {
    // Outermost layer runs first
    let create_chain = ServiceBuilder::new()
        .layer(from_fn_with_state(
            MediaUpload::new(state.file_service.clone(), MediaType::Design),
            upload_media,
        ))
        .layer(from_fn(validation_create))
        .layer(from_fn_with_state(state.clone(), is_design_exists_create));

    let delete_chain = from_fn_with_state(state, validation_delete);

    let design_root = get(design_handler::get_all)
        .post(design_handler::create.layer(create_chain))
        .delete(design_handler::delete.layer(delete_chain))
        .fallback(not_found);

    Router::new()
        .route("/design", design_root.clone())
        .route("/design/", design_root)
        .route(
            "/design/{id}",
            get(design_handler::get_one).fallback(not_found),
        )
        .route(
            "/designgetById/{id}",
            get(design_handler::get_by_id).fallback(not_found),
        )
        .route(
            "/design/update_picture",
            get_one_with_id("update_picture")
                .post(design_handler::update_picture)
                .fallback(not_found),
        )
        .route(
            "/design/send_email",
            get_one_with_id("send_email")
                .post(design_handler::send_email)
                .fallback(not_found),
        )
}

/// `GET /design/{id}` with a fixed segment standing in for the id
fn get_one_with_id(segment: &'static str) -> MethodRouter<AppState> {
    get(move |state: State<AppState>| {
        design_handler::get_one(state, Path(segment.to_string()))
    })
}
