/// Where the user interface should go after a controller finishes an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Back to the recipe list.
    Home,
    /// Re-open a page, e.g. a profile under its new username.
    Reload { path: String },
}

impl Navigation {
    pub fn profile(username: &str) -> Self {
        Navigation::Reload {
            path: format!("/users/{}", username),
        }
    }
}
