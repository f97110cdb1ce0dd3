//! Registered users.

use tracing::info;

use crate::{
    error::RegistrationError,
    models::{User, UserId},
    validation,
};

/// Insertion-ordered store of registered users.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: Vec<User>,
}

impl UserDirectory {
    /// Empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a user without uniqueness checks; see [`UserDirectory::register`].
    pub fn add(&mut self, user: User) -> UserId {
        let id = user.id();
        self.users.push(user);
        id
    }

    /// Validate and add a new user, rejecting taken usernames and emails.
    pub fn register(
        &mut self,
        username: &str,
        email: &str,
        phone: &str,
    ) -> Result<UserId, RegistrationError> {
        let username = validation::username(username)?;
        if self.find_by_username(&username).is_some() {
            return Err(RegistrationError::UsernameTaken(username));
        }
        let email = validation::email(email)?;
        if self.find_by_email(&email).is_some() {
            return Err(RegistrationError::EmailTaken(email));
        }
        let phone = validation::phone(phone)?;

        let id = self.add(User::new(username.clone(), email, phone));
        info!(%id, %username, "User registered");
        Ok(id)
    }

    /// Exact username lookup.
    pub fn find_by_username(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|user| user.username == username)
    }

    /// Exact email lookup.
    pub fn find_by_email(&self, email: &str) -> Option<&User> {
        self.users.iter().find(|user| user.email == email)
    }

    /// Lookup by key.
    pub fn get(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|user| user.id() == id)
    }

    /// Mutable lookup by key.
    pub fn get_mut(&mut self, id: UserId) -> Option<&mut User> {
        self.users.iter_mut().find(|user| user.id() == id)
    }

    /// Remove the user with the given key.
    pub fn remove(&mut self, id: UserId) -> Option<User> {
        let pos = self.users.iter().position(|user| user.id() == id)?;
        Some(self.users.remove(pos))
    }

    /// All users in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &User> {
        self.users.iter()
    }

    /// Number of registered users.
    pub fn count(&self) -> usize {
        self.users.len()
    }

    /// Whether nobody is registered.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    #[test]
    fn registers_valid_user() {
        let mut directory = UserDirectory::new();
        let id = directory
            .register("jdoe123", "jdoe@mail.com", "12345678901")
            .unwrap();
        let user = directory.get(id).unwrap();
        assert_eq!(user.username, "jdoe123");
        assert_eq!(user.phone_number, "12345678901");
        assert!(user.bookings().is_empty());
        assert_eq!(directory.count(), 1);
    }

    #[test]
    fn stores_digit_only_phone() {
        let mut directory = UserDirectory::new();
        let id = directory
            .register("alice_smith", "alice@example.com", "(987) 654-3210-9")
            .unwrap();
        assert_eq!(directory.get(id).unwrap().phone_number, "98765432109");
    }

    #[test]
    fn rejects_invalid_fields() {
        let mut directory = UserDirectory::new();
        assert_eq!(
            directory.register("jd", "jdoe@mail.com", "12345678901"),
            Err(RegistrationError::Invalid(ValidationError::UsernameTooShort))
        );
        assert_eq!(
            directory.register("jdoe123", "jdoe.mail.com", "12345678901"),
            Err(RegistrationError::Invalid(ValidationError::Email))
        );
        assert_eq!(
            directory.register("jdoe123", "jdoe@mail.com", "1234567890"),
            Err(RegistrationError::Invalid(ValidationError::Phone(10)))
        );
        assert!(directory.is_empty());
    }

    #[test]
    fn rejects_duplicates() {
        let mut directory = UserDirectory::new();
        directory
            .register("jdoe123", "jdoe@mail.com", "12345678901")
            .unwrap();
        assert_eq!(
            directory.register("jdoe123", "other@mail.com", "12345678901"),
            Err(RegistrationError::UsernameTaken("jdoe123".to_string()))
        );
        assert_eq!(
            directory.register("janedoe", "jdoe@mail.com", "12345678901"),
            Err(RegistrationError::EmailTaken("jdoe@mail.com".to_string()))
        );
        assert_eq!(directory.count(), 1);
    }

    #[test]
    fn lookups_are_exact() {
        let mut directory = UserDirectory::new();
        let id = directory.add(User::new("john_doe", "john@example.com", "12345678901"));
        assert!(directory.find_by_username("John_Doe").is_none());
        assert_eq!(directory.find_by_email("john@example.com").map(User::id), Some(id));
        assert!(directory.remove(id).is_some());
        assert!(directory.find_by_username("john_doe").is_none());
    }
}
