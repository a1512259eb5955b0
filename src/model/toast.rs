use super::Snowflake;

pub type Id = Snowflake;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastType {
    #[default]
    Info,
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Toast {
    pub id: Id,
    #[serde(rename = "type")]
    pub kind: ToastType,
    pub title: String,
    pub description: Option<String>,
}

/// A [`Toast`] without an id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewToast {
    pub kind: ToastType,
    pub title: String,
    pub description: Option<String>,
}

impl NewToast {
    pub fn new(kind: ToastType, title: impl Into<String>) -> NewToast {
        NewToast {
            kind,
            title: title.into(),
            description: None,
        }
    }

    pub fn info(title: impl Into<String>) -> NewToast {
        NewToast::new(ToastType::Info, title)
    }

    pub fn success(title: impl Into<String>) -> NewToast {
        NewToast::new(ToastType::Success, title)
    }

    pub fn error(title: impl Into<String>) -> NewToast {
        NewToast::new(ToastType::Error, title)
    }

    pub fn description(mut self, description: impl Into<String>) -> NewToast {
        let description = description.into();
        // An empty description renders the same as none
        self.description = (!description.is_empty()).then_some(description);
        self
    }
}
