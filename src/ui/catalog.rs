//! Role dashboards and the list/detail views behind them

use serde::Serialize;
use serde_json::Value;

/// A list/detail view backed by a remote API collection
#[derive(Debug)]
pub struct ResourceView {
    pub section: &'static str,
    pub slug: &'static str,
    pub title: &'static str,
    pub api_path: &'static str,
    /// (field, column label)
    pub columns: &'static [(&'static str, &'static str)],
    pub deletable: bool,
}

impl ResourceView {
    pub fn href(&self) -> String {
        format!("/{}/{}", self.section, self.slug)
    }

    /// Project a remote record onto this view's columns
    pub fn row(&self, record: &Value) -> Row {
        Row {
            id: display_value(record.get("id")),
            cells: self
                .columns
                .iter()
                .map(|(field, _)| display_value(record.get(*field)))
                .collect(),
        }
    }

    pub fn headers(&self) -> Vec<&'static str> {
        self.columns.iter().map(|(_, label)| *label).collect()
    }
}

/// One rendered table row
#[derive(Debug, Serialize, PartialEq)]
pub struct Row {
    pub id: String,
    pub cells: Vec<String>,
}

/// One label/value line on a detail page
#[derive(Debug, Serialize, PartialEq)]
pub struct Field {
    pub label: String,
    pub value: String,
}

pub const SECTIONS: &[(&str, &str)] = &[
    ("admin", "Administration"),
    ("manager", "Management"),
    ("staff", "Staff workspace"),
    ("customer", "My account"),
];

pub const VIEWS: &[ResourceView] = &[
    ResourceView {
        section: "admin",
        slug: "users",
        title: "Users",
        api_path: "users",
        columns: &[("fullName", "Name"), ("email", "Email"), ("role", "Role")],
        deletable: true,
    },
    ResourceView {
        section: "admin",
        slug: "kits",
        title: "Test kits",
        api_path: "kits",
        columns: &[("code", "Code"), ("name", "Name"), ("status", "Status")],
        deletable: true,
    },
    ResourceView {
        section: "admin",
        slug: "services",
        title: "Services",
        api_path: "services",
        columns: &[("name", "Name"), ("type", "Type"), ("price", "Price")],
        deletable: true,
    },
    ResourceView {
        section: "manager",
        slug: "blogs",
        title: "Blog posts",
        api_path: "blogs",
        columns: &[("title", "Title"), ("author", "Author"), ("status", "Status")],
        deletable: true,
    },
    ResourceView {
        section: "manager",
        slug: "staff",
        title: "Staff",
        api_path: "staff",
        columns: &[("fullName", "Name"), ("email", "Email"), ("phone", "Phone")],
        deletable: false,
    },
    ResourceView {
        section: "manager",
        slug: "feedback",
        title: "Customer feedback",
        api_path: "feedbacks",
        columns: &[("customerName", "Customer"), ("rating", "Rating"), ("comment", "Comment")],
        deletable: false,
    },
    ResourceView {
        section: "staff",
        slug: "orders",
        title: "Orders",
        api_path: "orders",
        columns: &[("customerName", "Customer"), ("service", "Service"), ("status", "Status")],
        deletable: false,
    },
    ResourceView {
        section: "staff",
        slug: "samples",
        title: "Samples",
        api_path: "samples",
        columns: &[("orderId", "Order"), ("kitCode", "Kit"), ("status", "Status")],
        deletable: false,
    },
    ResourceView {
        section: "customer",
        slug: "orders",
        title: "My orders",
        api_path: "orders",
        columns: &[("service", "Service"), ("appointmentDate", "Appointment"), ("status", "Status")],
        deletable: false,
    },
    ResourceView {
        section: "customer",
        slug: "results",
        title: "My results",
        api_path: "results",
        columns: &[("orderId", "Order"), ("conclusion", "Conclusion"), ("issuedAt", "Issued")],
        deletable: false,
    },
];

pub fn section_title(section: &str) -> Option<&'static str> {
    SECTIONS
        .iter()
        .find(|(name, _)| *name == section)
        .map(|(_, title)| *title)
}

pub fn views_in(section: &str) -> impl Iterator<Item = &'static ResourceView> + '_ {
    VIEWS.iter().filter(move |view| view.section == section)
}

pub fn find_view(section: &str, slug: &str) -> Option<&'static ResourceView> {
    VIEWS
        .iter()
        .find(|view| view.section == section && view.slug == slug)
}

/// All fields of a record, sorted by field name
pub fn detail_fields(record: &Value) -> Vec<Field> {
    match record {
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| Field {
                label: key.clone(),
                value: display_value(Some(value)),
            })
            .collect(),
        other => vec![Field {
            label: "value".to_string(),
            value: display_value(Some(other)),
        }],
    }
}

pub fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_every_view_has_a_section() {
        for view in VIEWS {
            assert!(section_title(view.section).is_some(), "{}", view.href());
            assert!(!view.columns.is_empty());
        }
    }

    #[test]
    fn test_find_view() {
        assert_eq!(find_view("admin", "kits").unwrap().api_path, "kits");
        assert!(find_view("customer", "kits").is_none());
        assert_eq!(views_in("manager").count(), 3);
    }

    #[test]
    fn test_row_projection() {
        let view = find_view("admin", "users").unwrap();
        let row = view.row(&json!({ "id": 5, "fullName": "Mai", "email": null, "role": "staff" }));
        assert_eq!(
            row,
            Row {
                id: "5".to_string(),
                cells: vec!["Mai".to_string(), "-".to_string(), "staff".to_string()],
            }
        );
    }

    #[test]
    fn test_detail_fields() {
        let fields = detail_fields(&json!({ "id": "k1", "active": true }));
        assert_eq!(fields.len(), 2);
        assert!(fields.iter().any(|f| f.label == "active" && f.value == "true"));
    }
}
