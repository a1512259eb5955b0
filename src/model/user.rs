pub type Id = String;

/// The signed in user, as the API returns it.
///
/// The serialized form is what gets persisted under the user storage key,
/// so field order and the omitted `avatar_url` matter.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct User {
    pub id: Id,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}
