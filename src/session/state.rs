//! The session record and the named mutations that change it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Account/session data for one running client.
///
/// Fields are never assigned by callers; every change goes through
/// [`SessionState::apply`] with a [`Mutation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionState {
    /// Bearer token; empty when logged out.
    pub token: String,
    /// Server-defined profile, `null` until fetched.
    pub user: Value,
    pub user_menu: Value,
    pub user_content_types: Vec<Value>,
    pub user_saved_searches: Vec<Value>,
    pub localization: Option<Value>,
    pub api_url: String,
    pub search_operators: Vec<Value>,
    pub search_standard_fields: Vec<Value>,
    pub login_params: Option<Value>,
    pub default_language: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            token: String::new(),
            user: Value::Null,
            user_menu: Value::Null,
            user_content_types: Vec::new(),
            user_saved_searches: Vec::new(),
            localization: None,
            api_url: String::new(),
            search_operators: Vec::new(),
            search_standard_fields: Vec::new(),
            login_params: None,
            default_language: None,
        }
    }
}

/// Role derived from the profile's `IsAdmin` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Admin = 0,
    User = 1,
}

/// Named state transitions.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    SetToken(String),
    SetUser(Value),
    /// Forget the identity and everything fetched for it.
    ClearUser,
    SetLocalization(Value),
    SetUserMenu(Value),
    SetUserContentTypes(Vec<Value>),
    SetUserSavedSearches(Vec<Value>),
    SetSearchOperators(Vec<Value>),
    SetSearchStandardFields(Vec<Value>),
    SetApiUrl(String),
    SetLoginParams(Value),
    SetDefaultLanguage(String),
}

impl Mutation {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetToken(_) => "SET_TOKEN",
            Self::SetUser(_) => "SET_USER",
            Self::ClearUser => "CLEAR_USER",
            Self::SetLocalization(_) => "SET_LOCALIZATION",
            Self::SetUserMenu(_) => "SET_USER_MENU",
            Self::SetUserContentTypes(_) => "SET_USER_CONTENT_TYPE",
            Self::SetUserSavedSearches(_) => "SET_USER_SAVED_SEARCHES",
            Self::SetSearchOperators(_) => "SET_SEARCH_OPERATORS",
            Self::SetSearchStandardFields(_) => "SET_SEARCH_STANDARD_FIELDS",
            Self::SetApiUrl(_) => "SET_API_URL",
            Self::SetLoginParams(_) => "SET_LOGIN_PARAMS",
            Self::SetDefaultLanguage(_) => "SET_DEFAULT_LANGUAGE",
        }
    }
}

impl SessionState {
    pub fn apply(&mut self, mutation: Mutation) {
        match mutation {
            Mutation::SetToken(token) => self.token = token,
            Mutation::SetUser(user) => self.user = user,
            Mutation::ClearUser => {
                self.token.clear();
                self.user = Value::Object(Map::new());
                self.user_menu = Value::Object(Map::new());
                self.user_content_types.clear();
                self.user_saved_searches.clear();
            }
            Mutation::SetLocalization(localization) => self.localization = Some(localization),
            Mutation::SetUserMenu(menu) => self.user_menu = menu,
            Mutation::SetUserContentTypes(types) => self.user_content_types = types,
            Mutation::SetUserSavedSearches(searches) => self.user_saved_searches = searches,
            Mutation::SetSearchOperators(operators) => self.search_operators = operators,
            Mutation::SetSearchStandardFields(fields) => self.search_standard_fields = fields,
            Mutation::SetApiUrl(url) => self.api_url = url,
            Mutation::SetLoginParams(params) => self.login_params = Some(params),
            Mutation::SetDefaultLanguage(lang) => self.default_language = Some(lang),
        }
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        !self.token.is_empty()
    }

    #[must_use]
    pub fn current_role(&self) -> Role {
        if self.user.get("IsAdmin").and_then(Value::as_bool) == Some(true) {
            Role::Admin
        } else {
            Role::User
        }
    }

    /// The profile's `CultureCode`, if any.
    #[must_use]
    pub fn culture_code(&self) -> Option<&str> {
        self.user.get("CultureCode").and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_token_toggles_logged_in() {
        let mut state = SessionState::default();
        state.apply(Mutation::SetToken(String::new()));
        assert!(!state.is_logged_in());

        state.apply(Mutation::SetToken("abc".into()));
        assert!(state.is_logged_in());
    }

    #[test]
    fn test_clear_user_resets_identity_fields() {
        let mut state = SessionState::default();
        state.apply(Mutation::SetToken("abc".into()));
        state.apply(Mutation::SetUser(json!({"Name": "eva"})));
        state.apply(Mutation::SetUserMenu(json!({"items": [1]})));
        state.apply(Mutation::SetUserContentTypes(vec![json!("Invoice")]));
        state.apply(Mutation::SetUserSavedSearches(vec![json!({"id": 3})]));
        state.apply(Mutation::SetSearchOperators(vec![json!("=")]));

        state.apply(Mutation::ClearUser);

        assert_eq!(state.token, "");
        assert_eq!(state.user, json!({}));
        assert_eq!(state.user_menu, json!({}));
        assert!(state.user_content_types.is_empty());
        assert!(state.user_saved_searches.is_empty());
        // search metadata is not identity-bound
        assert_eq!(state.search_operators, vec![json!("=")]);
    }

    #[test]
    fn test_role_from_profile() {
        let mut state = SessionState::default();
        assert_eq!(state.current_role(), Role::User);

        state.apply(Mutation::SetUser(json!({"IsAdmin": true, "CultureCode": "ro"})));
        assert_eq!(state.current_role(), Role::Admin);
        assert_eq!(state.culture_code(), Some("ro"));
    }

    #[test]
    fn test_persisted_shape_is_camel_case() {
        let mut state = SessionState::default();
        state.apply(Mutation::SetApiUrl("http://ecm".into()));
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["apiUrl"], "http://ecm");
        assert!(value.get("userContentTypes").is_some());

        let back: SessionState = serde_json::from_value(json!({"token": "t"})).unwrap();
        assert_eq!(back.token, "t");
        assert_eq!(back.user, Value::Null);
    }
}
