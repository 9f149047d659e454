//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The cookie stores the authenticated account as two entries, its kind and
//! its numeric id, since ids are only unique within one account table.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{AccountId, AccountKind, AccountRef, Error};

pub(crate) const ACCOUNT_KIND_KEY: &str = "account_kind";
pub(crate) const ACCOUNT_ID_KEY: &str = "account_id";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated account, rotating the session first.
    pub fn persist_account(&self, account: AccountRef) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(ACCOUNT_KIND_KEY, account.kind.as_str())
            .and_then(|()| self.0.insert(ACCOUNT_ID_KEY, account.id.get()))
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current account from the session, if present and well formed.
    pub fn account(&self) -> Result<Option<AccountRef>, Error> {
        let read_error = |error: actix_session::SessionGetError| {
            Error::internal(format!("failed to read session: {error}"))
        };
        let kind = self.0.get::<String>(ACCOUNT_KIND_KEY).map_err(read_error)?;
        let id = self.0.get::<i32>(ACCOUNT_ID_KEY).map_err(read_error)?;
        let (Some(kind), Some(id)) = (kind, id) else {
            return Ok(None);
        };

        let kind = match kind.parse::<AccountKind>() {
            Ok(kind) => kind,
            Err(error) => {
                warn!(%error, "invalid account kind in session cookie");
                return Ok(None);
            }
        };
        match AccountId::new(id) {
            Ok(id) => Ok(Some(AccountRef::new(kind, id))),
            Err(error) => {
                warn!(%error, "invalid account id in session cookie");
                Ok(None)
            }
        }
    }

    /// Require an authenticated account or return `401 Unauthorized`.
    pub fn require_account(&self) -> Result<AccountRef, Error> {
        self.account()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Require a consumer user session; developers receive `403 Forbidden`.
    pub fn require_consumer(&self) -> Result<AccountId, Error> {
        self.require_kind(AccountKind::Consumer)
    }

    /// Require a developer session; consumers receive `403 Forbidden`.
    pub fn require_developer(&self) -> Result<AccountId, Error> {
        self.require_kind(AccountKind::Developer)
    }

    fn require_kind(&self, expected: AccountKind) -> Result<AccountId, Error> {
        let account = self.require_account()?;
        if account.kind != expected {
            return Err(Error::forbidden(format!("{expected} account required")));
        }
        Ok(account.id)
    }

    /// Drop every session entry and expire the cookie.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
