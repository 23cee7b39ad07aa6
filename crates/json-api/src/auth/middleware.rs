//! Auth middleware.

use std::sync::Arc;

use salvo::{http::header::AUTHORIZATION, prelude::*};
use tracing::error;

use duka_app::domain::users::{
    UsersServiceError,
    models::{Role, User},
};

use crate::{extensions::*, state::State};

fn extract_bearer_token(req: &Request) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
}

async fn authenticate(
    token: &str,
    depot: &Depot,
) -> Result<User, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    match state.app.users.authenticate_bearer(token).await {
        Ok(user) => Ok(user),
        Err(UsersServiceError::NotFound) => {
            Err(StatusError::unauthorized().brief("Invalid API token"))
        }
        Err(source) => {
            error!("failed to validate api token: {source}");

            Err(StatusError::internal_server_error())
        }
    }
}

/// Attach the current user when a valid bearer token is present.
///
/// Anonymous requests pass through untouched; cart and checkout endpoints
/// serve guests and registered users alike.
#[salvo::handler]
pub(crate) async fn optional(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    if let Some(token) = extract_bearer_token(req) {
        match authenticate(&token, depot).await {
            Ok(user) => depot.insert_current_user(user),
            Err(status_error) => {
                res.render(status_error);

                return;
            }
        }
    }

    ctrl.call_next(req, depot, res).await;
}

/// Reject requests whose bearer token does not resolve to the given role.
pub(crate) struct RequireRole(pub(crate) Role);

#[salvo::async_trait]
impl Handler for RequireRole {
    async fn handle(
        &self,
        req: &mut Request,
        depot: &mut Depot,
        res: &mut Response,
        ctrl: &mut FlowCtrl,
    ) {
        let Some(token) = extract_bearer_token(req) else {
            res.render(
                StatusError::unauthorized().brief("Missing or invalid Authorization header"),
            );

            return;
        };

        let user = match authenticate(&token, depot).await {
            Ok(user) => user,
            Err(status_error) => {
                res.render(status_error);

                return;
            }
        };

        if user.role != self.0 {
            res.render(StatusError::forbidden().brief("Insufficient role"));

            return;
        }

        depot.insert_current_user(user);

        ctrl.call_next(req, depot, res).await;
    }
}
