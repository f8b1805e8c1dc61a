/// Identity record supplied by the authentication collaborator. The core
/// only uses it to know that somebody is signed in, and who.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub uid: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
}

impl User {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Producer")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_falls_back() {
        let mut user = User {
            uid: "u1".to_string(),
            name: None,
            email: None,
            avatar_url: None,
        };
        assert_eq!(user.display_name(), "Producer");

        user.name = Some("Dee".to_string());
        assert_eq!(user.display_name(), "Dee");
    }
}
