//! Page-level types.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{Icon, Media, RichText};
use crate::render::render_rich_text;

/// A page (or database) object as returned by the remote API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Page id
    pub id: String,

    /// Object type ("page" or "database")
    #[serde(default = "default_object")]
    pub object: String,

    /// Typed properties in declaration order
    #[serde(default)]
    pub properties: IndexMap<String, PropertyValue>,

    /// Where the page lives
    #[serde(default)]
    pub parent: Option<Parent>,

    /// Last edit timestamp (RFC 3339)
    #[serde(default)]
    pub last_edited_time: Option<String>,

    /// Page icon
    #[serde(default)]
    pub icon: Option<Icon>,

    /// Cover image
    #[serde(default)]
    pub cover: Option<Media>,

    /// Database title (database objects only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub title: Vec<RichText>,

    /// Public URL of the page
    #[serde(default)]
    pub url: Option<String>,
}

fn default_object() -> String {
    "page".to_string()
}

impl Page {
    /// Create an empty page with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            object: default_object(),
            properties: IndexMap::new(),
            parent: None,
            last_edited_time: None,
            icon: None,
            cover: None,
            title: Vec::new(),
            url: None,
        }
    }

    /// Title rendered in title mode (no links or annotations).
    ///
    /// Pages carry the title in their `title` property, databases in a
    /// top-level `title` field. Returns `None` for an empty title.
    pub fn title(&self) -> Option<String> {
        let spans = self
            .properties
            .values()
            .find_map(|p| match p {
                PropertyValue::Title { title } => Some(title.as_slice()),
                _ => None,
            })
            .unwrap_or(&self.title);

        let title = render_rich_text(spans, true);
        if title.trim().is_empty() {
            None
        } else {
            Some(title)
        }
    }
}

/// Parent reference of a page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Parent {
    /// Parent kind ("workspace", "page_id" or "database_id")
    #[serde(rename = "type", default)]
    pub kind: String,

    /// Parent page id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_id: Option<String>,

    /// Parent database id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_id: Option<String>,
}

/// A typed page property.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    /// Page title
    Title {
        /// Title spans
        #[serde(default)]
        title: Vec<RichText>,
    },
    /// Rich text
    RichText {
        /// Text spans
        #[serde(default)]
        rich_text: Vec<RichText>,
    },
    /// Number, kept as written
    Number {
        /// Value
        #[serde(default)]
        number: Option<serde_json::Number>,
    },
    /// Single choice
    Select {
        /// Chosen option
        #[serde(default)]
        select: Option<SelectOption>,
    },
    /// Multiple choice
    MultiSelect {
        /// Chosen options
        #[serde(default)]
        multi_select: Vec<SelectOption>,
    },
    /// Date or date range
    Date {
        /// Value
        #[serde(default)]
        date: Option<DateRange>,
    },
    /// Users
    People {
        /// Referenced users
        #[serde(default)]
        people: Vec<Person>,
    },
    /// Attached files
    Files {
        /// File references
        #[serde(default)]
        files: Vec<Media>,
    },
    /// Checkbox
    Checkbox {
        /// Checked state
        #[serde(default)]
        checkbox: bool,
    },
    /// URL
    Url {
        /// Value
        #[serde(default)]
        url: Option<String>,
    },
    /// Email address
    Email {
        /// Value
        #[serde(default)]
        email: Option<String>,
    },
    /// Phone number
    PhoneNumber {
        /// Value
        #[serde(default)]
        phone_number: Option<String>,
    },
    /// Creation timestamp
    CreatedTime {
        /// RFC 3339 timestamp
        #[serde(default)]
        created_time: Option<String>,
    },
    /// Last edit timestamp
    LastEditedTime {
        /// RFC 3339 timestamp
        #[serde(default)]
        last_edited_time: Option<String>,
    },
    /// Formula, relation, rollup and other types without a formatter
    #[serde(other)]
    Unsupported,
}

/// Option of a select or multi-select property.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectOption {
    /// Option name
    pub name: String,
}

/// Date property value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRange {
    /// Start date or timestamp
    pub start: String,

    /// End date or timestamp for ranges
    #[serde(default)]
    pub end: Option<String>,
}

/// User reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    /// Display name; absent for bots and unshared users
    #[serde(default)]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_page() -> Page {
        serde_json::from_value(json!({
            "object": "page",
            "id": "p1",
            "parent": { "type": "database_id", "database_id": "db1" },
            "last_edited_time": "2024-03-01T10:00:00.000Z",
            "icon": { "type": "emoji", "emoji": "📝" },
            "properties": {
                "Tags": { "id": "a", "type": "multi_select",
                          "multi_select": [{ "name": "rust" }, { "name": "notes" }] },
                "Name": { "id": "title", "type": "title", "title": [
                    { "type": "text", "plain_text": "Weekly ",
                      "text": { "content": "Weekly " },
                      "annotations": { "bold": true, "italic": false, "strikethrough": false,
                                       "underline": false, "code": false, "color": "default" } },
                    { "type": "equation", "plain_text": "x^2" }
                ]},
                "Score": { "id": "b", "type": "formula", "formula": { "number": 3 } }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_page_title_is_undecorated() {
        let page = sample_page();
        assert_eq!(page.title(), Some("Weekly $ x^2 $".to_string()));
    }

    #[test]
    fn test_property_order_and_unsupported() {
        let page = sample_page();
        let keys: Vec<_> = page.properties.keys().cloned().collect();
        assert_eq!(keys, vec!["Tags", "Name", "Score"]);
        assert!(matches!(
            page.properties["Score"],
            PropertyValue::Unsupported
        ));
    }

    #[test]
    fn test_parent_and_icon() {
        let page = sample_page();
        let parent = page.parent.as_ref().unwrap();
        assert_eq!(parent.kind, "database_id");
        assert_eq!(parent.database_id.as_deref(), Some("db1"));
        assert_eq!(page.icon.and_then(|i| i.emoji).as_deref(), Some("📝"));
        assert!(Page::new("x").parent.is_none());
    }

    #[test]
    fn test_empty_title() {
        assert_eq!(Page::new("x").title(), None);
    }
}
