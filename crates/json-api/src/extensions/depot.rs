//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};

use duka_app::domain::users::models::User;

const CURRENT_USER_KEY: &str = "current_user";

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    fn insert_current_user(&mut self, user: User);

    fn current_user(&self) -> Option<&User>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_current_user(&mut self, user: User) {
        self.insert(CURRENT_USER_KEY, user);
    }

    fn current_user(&self) -> Option<&User> {
        self.get::<User>(CURRENT_USER_KEY).ok()
    }
}
