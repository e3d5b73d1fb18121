use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Backlog Board.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::session::create_session,
        crate::routes::session::link_session,
        crate::routes::session::close_session,
        crate::routes::session::save_status,
        crate::routes::board::get_board,
        crate::routes::board::add_game,
        crate::routes::board::move_game,
        crate::routes::board::edit_game,
        crate::routes::board::delete_game,
        crate::routes::board::toggle_favorite,
        crate::routes::board::create_column,
        crate::routes::board::edit_column,
        crate::routes::board::delete_column,
        crate::routes::sse::board_events,
        crate::routes::social::follow,
        crate::routes::social::unfollow,
        crate::routes::social::block,
        crate::routes::social::unblock,
        crate::routes::social::relationships,
        crate::routes::profile::get_settings,
        crate::routes::profile::update_settings,
        crate::routes::profile::search_profiles,
        crate::routes::search::search_games,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::session::SessionCreated,
            crate::dto::session::LinkRequest,
            crate::dto::session::SaveStatusResponse,
            crate::dto::board::AddGameRequest,
            crate::dto::board::PlatformInput,
            crate::dto::board::GenreInput,
            crate::dto::board::NamedInput,
            crate::dto::board::MoveGameRequest,
            crate::dto::board::EditGameRequest,
            crate::dto::board::CreateColumnRequest,
            crate::dto::board::EditColumnRequest,
            crate::dto::board::DeleteColumnRequest,
            crate::dto::board::BoardSnapshot,
            crate::dto::board::GameDto,
            crate::dto::board::ColumnDto,
            crate::dto::social::FollowRequest,
            crate::dto::social::BlockRequest,
            crate::dto::social::TargetRequest,
            crate::dto::social::AckResponse,
            crate::dto::social::RelationshipsResponse,
            crate::dto::profile::UpdateSettingsRequest,
            crate::dto::profile::SettingsResponse,
            crate::dto::profile::ProfileSearchResponse,
            crate::dto::search::SearchHitDto,
            crate::dto::search::SearchResultsResponse,
            crate::dao::models::Privacy,
            crate::dao::models::RelationKind,
            crate::dao::models::RelationStatus,
            crate::dao::models::RelationRecordEntity,
            crate::dao::models::PublicProfileEntity,
            crate::state::session::SaveStatus,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "session", description = "Guest session lifecycle and account linking"),
        (name = "board", description = "Board mutations and snapshots"),
        (name = "sse", description = "Server-sent events streams"),
        (name = "social", description = "Relationship operations"),
        (name = "profile", description = "User settings and public profiles"),
        (name = "search", description = "Game metadata search"),
    )
)]
pub struct ApiDoc;
