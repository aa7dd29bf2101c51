//! User - ユーザーレコード

use serde::{Deserialize, Serialize};

use super::document::SearchFields;
use super::entity::{Entity, overwrite_if_present};
use super::ids::{UserId, UserKind};

/// User は primary store に保存されたユーザー
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub full_name: String,
    pub user_name: String,
    pub email: String,
}

/// User の可変フィールド
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserFields {
    pub full_name: String,
    pub user_name: String,
    pub email: String,
}

impl UserFields {
    pub fn new(
        full_name: impl Into<String>,
        user_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            user_name: user_name.into(),
            email: email.into(),
        }
    }
}

impl Entity for User {
    type Marker = UserKind;
    type Fields = UserFields;

    fn id(&self) -> UserId {
        self.id
    }

    fn from_fields(id: UserId, fields: UserFields) -> Self {
        Self {
            id,
            full_name: fields.full_name,
            user_name: fields.user_name,
            email: fields.email,
        }
    }

    fn replace(&mut self, fields: UserFields) {
        self.full_name = fields.full_name;
        self.user_name = fields.user_name;
        self.email = fields.email;
    }

    fn patch(&mut self, fields: UserFields) {
        overwrite_if_present(&mut self.full_name, fields.full_name);
        overwrite_if_present(&mut self.user_name, fields.user_name);
        overwrite_if_present(&mut self.email, fields.email);
    }

    fn search_fields(&self) -> SearchFields {
        SearchFields::from([
            ("id".to_string(), self.id.to_string()),
            ("fullName".to_string(), self.full_name.clone()),
            ("userName".to_string(), self.user_name.clone()),
            ("email".to_string(), self.email.clone()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ulid::Ulid;

    #[test]
    fn patch_applies_every_non_empty_field() {
        let mut user = User::from_fields(
            UserId::from_ulid(Ulid::new()),
            UserFields::new("Ada Lovelace", "ada", "ada@example.com"),
        );

        user.patch(UserFields::new("Ada King", "", "ada@analytical.engine"));

        assert_eq!(user.full_name, "Ada King");
        assert_eq!(user.user_name, "ada");
        assert_eq!(user.email, "ada@analytical.engine");
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let user = User::from_fields(
            UserId::from_ulid(Ulid::new()),
            UserFields::new("Ada Lovelace", "ada", "ada@example.com"),
        );
        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["fullName"], "Ada Lovelace");
        assert_eq!(json["userName"], "ada");
        assert_eq!(json["id"], user.id.to_string());
    }

    #[test]
    fn search_fields_use_wire_names() {
        let user = User::from_fields(
            UserId::from_ulid(Ulid::new()),
            UserFields::new("Ada Lovelace", "ada", "ada@example.com"),
        );
        let fields = user.search_fields();

        assert_eq!(fields["fullName"], "Ada Lovelace");
        assert_eq!(fields["email"], "ada@example.com");
    }
}
