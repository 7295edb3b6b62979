#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    /// An ownership-guarded write matched no row. Missing and not-owned are
    /// reported identically so the existence of a row never leaks.
    #[error("Not found or no permission: {entity} with id {id}")]
    NotFoundOrForbidden { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}
