//! Shared HTTP adapter state.
//!
//! Handlers receive this bundle through `actix_web::web::Data` and only see
//! the driving ports, so they stay testable without a database.

use std::sync::Arc;

use crate::domain::ports::{
    AccountProfileQuery, CredentialCommand, PasswordResetCommand, PropertyCatalogQuery,
    SuggestionCommand, SuggestionQuery,
};

/// Dependency bundle for HTTP handlers.
///
/// # Examples
/// ```no_run
/// use std::sync::Arc;
///
/// use propertyhub::domain::ports::{
///     AccountProfileQuery, CredentialCommand, PasswordResetCommand, PropertyCatalogQuery,
///     SuggestionCommand, SuggestionQuery,
/// };
/// use propertyhub::inbound::http::state::HttpState;
///
/// fn wire(
///     credentials: Arc<dyn CredentialCommand>,
///     profile: Arc<dyn AccountProfileQuery>,
///     catalog: Arc<dyn PropertyCatalogQuery>,
///     suggestions: Arc<dyn SuggestionCommand>,
///     suggestions_query: Arc<dyn SuggestionQuery>,
///     password_reset: Arc<dyn PasswordResetCommand>,
/// ) -> HttpState {
///     HttpState {
///         credentials,
///         profile,
///         catalog,
///         suggestions,
///         suggestions_query,
///         password_reset,
///     }
/// }
/// ```
#[derive(Clone)]
pub struct HttpState {
    pub credentials: Arc<dyn CredentialCommand>,
    pub profile: Arc<dyn AccountProfileQuery>,
    pub catalog: Arc<dyn PropertyCatalogQuery>,
    pub suggestions: Arc<dyn SuggestionCommand>,
    pub suggestions_query: Arc<dyn SuggestionQuery>,
    pub password_reset: Arc<dyn PasswordResetCommand>,
}
