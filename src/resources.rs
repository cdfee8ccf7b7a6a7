//! Resource catalog
//!
//! Each REST collection the CLI talks to is described once, as a static
//! `Resource`: its path template, list flags, where the records live in a
//! response, which columns to print, and which actions it accepts.

use std::fmt;
use std::str::FromStr;

use comfy_table::Color;
use serde_json::Value;

/// Action keyword accepted by a resource router
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    List,
    Create,
    Update,
    Delete,
    Apply,
    Fetch,
    EntryPoints,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::List => "list",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Apply => "apply",
            Action::Fetch => "fetch",
            Action::EntryPoints => "entry_points",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "list" => Ok(Action::List),
            "create" => Ok(Action::Create),
            "update" => Ok(Action::Update),
            "delete" => Ok(Action::Delete),
            "apply" => Ok(Action::Apply),
            "fetch" => Ok(Action::Fetch),
            "entry_points" | "entry-points" => Ok(Action::EntryPoints),
            _ => Err(()),
        }
    }
}

/// Where the records sit in a list response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    /// The response body itself is an array
    TopLevel,
    /// The records are under this key of the response object
    Key(&'static str),
}

impl Collection {
    /// Pull the records out of a response body. A body without the expected
    /// collection is a single record.
    pub fn records(&self, body: Value) -> Vec<Value> {
        match self {
            Collection::TopLevel => match body {
                Value::Array(items) => items,
                other => vec![other],
            },
            Collection::Key(key) => match body.get(*key) {
                Some(Value::Array(items)) => items.clone(),
                _ => vec![body],
            },
        }
    }
}

/// A printed table column
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub field: &'static str,
    pub color: Color,
}

const fn col(field: &'static str, color: Color) -> Column {
    Column { field, color }
}

/// Static description of a REST collection
#[derive(Debug)]
pub struct Resource {
    /// CLI name, also used in log lines
    pub name: &'static str,
    pub singular: &'static str,
    pub plural: &'static str,
    /// Path template. `{id}` marks a required scoping ID; without it an
    /// optional record ID is appended as `/<id>`.
    pub path: &'static str,
    /// What the ID argument names, for error messages
    pub id_name: &'static str,
    /// Extra query flags sent with `list`
    pub list_flags: &'static [(&'static str, &'static str)],
    pub collection: Collection,
    pub columns: &'static [Column],
    pub actions: &'static [Action],
}

impl Resource {
    pub fn supports(&self, action: Action) -> bool {
        self.actions.contains(&action)
    }

    pub fn valid_actions(&self) -> String {
        self.actions
            .iter()
            .map(Action::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Whether the ID is part of the collection path itself
    pub fn requires_scope_id(&self) -> bool {
        self.path.contains("{id}")
    }

    /// Build `/api/<resource>[/<id>][/<sub>]?format=json[&flags]`
    pub fn path_for(
        &self,
        id: Option<u64>,
        sub: Option<&str>,
        flags: &[(&str, &str)],
    ) -> String {
        let mut path = if self.requires_scope_id() {
            let scope = id.map(|i| i.to_string()).unwrap_or_default();
            self.path.replace("{id}", &scope)
        } else {
            match id {
                Some(id) => format!("{}/{}", self.path, id),
                None => self.path.to_string(),
            }
        };

        if let Some(sub) = sub {
            path.push('/');
            path.push_str(sub);
        }

        path.push_str("?format=json");
        for (name, value) in flags {
            path.push('&');
            path.push_str(name);
            path.push('=');
            path.push_str(value);
        }
        path
    }

    /// "Listing users..." / "Listing user..."
    pub fn listing_heading(&self, count: usize) -> String {
        if count == 1 {
            format!("Listing {}...", self.singular)
        } else {
            format!("Listing {}...", self.plural)
        }
    }
}

pub static USER: Resource = Resource {
    name: "user",
    singular: "user",
    plural: "users",
    path: "/api/user",
    id_name: "user ID",
    list_flags: &[],
    collection: Collection::TopLevel,
    columns: &[
        col("id", Color::Red),
        col("first_name", Color::Yellow),
        col("last_name", Color::Yellow),
        col("username", Color::Yellow),
        col("company", Color::Yellow),
        col("role", Color::Yellow),
        col("client_id", Color::Blue),
    ],
    actions: &[Action::List, Action::Create, Action::Update, Action::Delete],
};

pub static SITE: Resource = Resource {
    name: "site",
    singular: "site",
    plural: "sites",
    path: "/api/site",
    id_name: "site ID",
    list_flags: &[("display_scan_status", "1")],
    collection: Collection::Key("sites"),
    columns: &[
        col("id", Color::Red),
        col("label", Color::Yellow),
        col("scan_status", Color::Yellow),
    ],
    actions: &[
        Action::List,
        Action::Create,
        Action::Update,
        Action::Delete,
        Action::EntryPoints,
    ],
};

pub static APP: Resource = Resource {
    name: "app",
    singular: "application",
    plural: "applications",
    path: "/api/application",
    id_name: "application ID",
    list_flags: &[],
    collection: Collection::Key("collection"),
    columns: &[
        col("id", Color::Red),
        col("label", Color::Yellow),
        col("language", Color::Yellow),
        col("status", Color::Yellow),
    ],
    actions: &[Action::List, Action::EntryPoints],
};

pub static VULN_CLASS: Resource = Resource {
    name: "vuln_class",
    singular: "vulnerability class",
    plural: "vulnerability classes",
    path: "/api/{id}/vuln_policy/all_vuln_classes",
    id_name: "client ID",
    list_flags: &[],
    collection: Collection::Key("all_vuln_classes"),
    columns: &[
        col("id", Color::Red),
        col("shortname", Color::Yellow),
        col("name", Color::Yellow),
    ],
    actions: &[Action::List],
};

pub static VULN_POLICY: Resource = Resource {
    name: "vuln_policy",
    singular: "policy",
    plural: "policies",
    path: "/api/vuln_custom_policy",
    id_name: "policy ID",
    list_flags: &[("display_risk_scores", "1")],
    collection: Collection::Key("vuln_custom_policies"),
    columns: &[
        col("vuln_class_id", Color::Red),
        col("risk_score", Color::Yellow),
        col("accepted", Color::Yellow),
    ],
    actions: &[
        Action::List,
        Action::Create,
        Action::Update,
        Action::Delete,
        Action::Apply,
        Action::Fetch,
    ],
};

/// Sub-resource listing the crawl entry points of a site or application
pub const ENTRY_POINTS: &str = "entry_points";

/// Sub-resource holding the sites/applications a policy is applied to
pub const POLICY_ASSETS: &str = "assets";

pub const ENTRY_POINT_COLLECTION: Collection = Collection::Key("entry_points");

pub const ENTRY_POINT_COLUMNS: &[Column] = &[
    col("id", Color::Red),
    col("uri", Color::Yellow),
    col("status", Color::Yellow),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parsing() {
        assert_eq!("list".parse::<Action>(), Ok(Action::List));
        assert_eq!("LIST".parse::<Action>(), Ok(Action::List));
        assert_eq!("entry_points".parse::<Action>(), Ok(Action::EntryPoints));
        assert!("frobnicate".parse::<Action>().is_err());
    }

    #[test]
    fn test_collection_paths() {
        assert_eq!(USER.path_for(None, None, &[]), "/api/user?format=json");
        assert_eq!(
            SITE.path_for(Some(42), None, SITE.list_flags),
            "/api/site/42?format=json&display_scan_status=1"
        );
        assert_eq!(
            VULN_POLICY.path_for(Some(9), Some(POLICY_ASSETS), &[]),
            "/api/vuln_custom_policy/9/assets?format=json"
        );
        assert_eq!(
            APP.path_for(Some(3), Some(ENTRY_POINTS), &[]),
            "/api/application/3/entry_points?format=json"
        );
    }

    #[test]
    fn test_scoped_path() {
        assert!(VULN_CLASS.requires_scope_id());
        assert!(!USER.requires_scope_id());
        assert_eq!(
            VULN_CLASS.path_for(Some(1234), None, &[]),
            "/api/1234/vuln_policy/all_vuln_classes?format=json"
        );
    }

    #[test]
    fn test_supported_actions() {
        assert!(VULN_POLICY.supports(Action::Apply));
        assert!(!USER.supports(Action::Apply));
        assert!(!VULN_CLASS.supports(Action::Create));
        assert_eq!(APP.valid_actions(), "list, entry_points");
    }

    #[test]
    fn test_collection_records() {
        let users = serde_json::json!([{"id": 1}, {"id": 2}]);
        assert_eq!(Collection::TopLevel.records(users).len(), 2);

        let sites = serde_json::json!({"sites": [{"id": 1}, {"id": 2}, {"id": 3}]});
        assert_eq!(SITE.collection.records(sites).len(), 3);

        let single = serde_json::json!({"id": "12", "label": "example"});
        let records = SITE.collection.records(single.clone());
        assert_eq!(records, vec![single]);
    }

    #[test]
    fn test_listing_heading() {
        assert_eq!(USER.listing_heading(3), "Listing users...");
        assert_eq!(USER.listing_heading(1), "Listing user...");
        assert_eq!(VULN_POLICY.listing_heading(1), "Listing policy...");
    }
}
