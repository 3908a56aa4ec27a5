//! User registration and lookup.

use std::sync::Arc;

use log::info;

use crate::{
    error::{Result, SocialError},
    models::{NewUser, User, UserId},
    store::SocialStore,
};

/// Thin directory over the identity rows of a [`SocialStore`].
pub struct Directory<S: ?Sized> {
    store: Arc<S>,
}

impl<S: SocialStore + ?Sized> Directory<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Registers a user; fails with `AlreadyExists` when the email or
    /// username is taken.
    pub fn register_user(&self, email: &str, username: Option<&str>) -> Result<User> {
        let new_user = NewUser::new(email, username)?;
        let user = self.store.insert_user(&new_user)?;
        info!("Registered user {} ({})", user.id, user.handle());
        Ok(user)
    }

    pub fn get_user(&self, id: UserId) -> Result<User> {
        self.store
            .get_user(id)?
            .ok_or_else(|| SocialError::not_found("user", id))
    }

    pub fn find_by_username(&self, username: &str) -> Result<User> {
        self.store
            .find_user_by_username(username.trim())?
            .ok_or_else(|| SocialError::not_found("user", username.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorKind, store::MemoryStore};

    #[test]
    fn test_register_and_lookup() {
        let directory = Directory::new(Arc::new(MemoryStore::new()));
        let user = directory
            .register_user("  Ada@Example.com ", Some("ada"))
            .expect("register");
        assert_eq!(user.email, "ada@example.com");

        assert_eq!(directory.get_user(user.id).unwrap(), user);
        assert_eq!(directory.find_by_username(" ada ").unwrap(), user);

        let err = directory.find_by_username("grace").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_duplicate_identity_is_rejected() {
        let directory = Directory::new(Arc::new(MemoryStore::new()));
        directory.register_user("ada@example.com", Some("ada")).unwrap();

        let err = directory
            .register_user("ADA@example.com", Some("other"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);

        let err = directory
            .register_user("second@example.com", Some("ada"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);

        directory
            .register_user("third@example.com", None)
            .expect("usernames are optional");
    }
}
