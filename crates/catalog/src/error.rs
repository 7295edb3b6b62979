use devicehub_core::error::CoreError;

/// Errors returned by the catalog services.
///
/// Cache failures never show up here: the services log them and fall back to
/// the store.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The relational store failed or was unreachable. Not retried.
    #[error("Store error: {0}")]
    Store(#[from] sqlx::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Reject a blank caller identity before it reaches the store. An empty
/// owner would match rows whose owner column defaulted to `''`.
pub(crate) fn require_identity(user_id: &str) -> Result<(), CoreError> {
    if user_id.trim().is_empty() {
        return Err(CoreError::Unauthorized("Caller identity is required".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn blank_identity_is_unauthorized() {
        assert_matches!(require_identity(""), Err(CoreError::Unauthorized(_)));
        assert_matches!(require_identity(" \t"), Err(CoreError::Unauthorized(_)));
        assert!(require_identity("u1").is_ok());
    }
}
