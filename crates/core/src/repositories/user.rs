use super::UserRepository;
use crate::models::User;

impl UserRepository {
    /// Exact username lookup.
    pub fn find_by_username(&self, username: &str) -> Option<&User> {
        let username = username.trim();
        self.iter().find(|u| u.username.as_str() == username)
    }
}
