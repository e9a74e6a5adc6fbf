//! Restaurant menu models and mealtime grouping.

use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mealtime {
    Lunch,
    Dinner,
}

impl Mealtime {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lunch" => Some(Mealtime::Lunch),
            "dinner" => Some(Mealtime::Dinner),
            _ => None,
        }
    }
}

/// Display metadata for a known upstream menu category.
#[derive(Debug, Clone, Copy)]
pub struct CategoryInfo {
    pub key: &'static str,
    pub title: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub mealtime: Mealtime,
}

/// Known categories, in display order.
pub const CATEGORIES: [CategoryInfo; 6] = [
    CategoryInfo {
        key: "grilladesMidi",
        title: "Grillades",
        icon: "🍖",
        color: "#b91c1c",
        mealtime: Mealtime::Lunch,
    },
    CategoryInfo {
        key: "migrateurs",
        title: "Migrateurs",
        icon: "🌍",
        color: "#6366f1",
        mealtime: Mealtime::Lunch,
    },
    CategoryInfo {
        key: "cibo",
        title: "Végétarien",
        icon: "🥦",
        color: "#16a34a",
        mealtime: Mealtime::Lunch,
    },
    CategoryInfo {
        key: "accompMidi",
        title: "Accompagnements",
        icon: "🥔",
        color: "#a16207",
        mealtime: Mealtime::Lunch,
    },
    CategoryInfo {
        key: "grilladesSoir",
        title: "Grillades",
        icon: "🥩",
        color: "#9f1239",
        mealtime: Mealtime::Dinner,
    },
    CategoryInfo {
        key: "accompSoir",
        title: "Accompagnements",
        icon: "🍚",
        color: "#854d0e",
        mealtime: Mealtime::Dinner,
    },
];

/// Raw upstream menu: one array of dish names per category key.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuResponse {
    #[serde(rename = "updatedDate", default)]
    pub updated_date: Option<String>,
    #[serde(flatten)]
    pub categories: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuCategory {
    pub key: &'static str,
    pub title: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub items: Vec<String>,
}

/// Menu grouped by mealtime, served at `GET /api/restaurant`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedMenu {
    pub lunch: Vec<MenuCategory>,
    pub dinner: Vec<MenuCategory>,
    pub date: String,
}

impl GroupedMenu {
    /// Group the upstream categories by mealtime.
    ///
    /// Unknown keys, non-array values and empty categories are dropped.
    pub fn from_response(response: &MenuResponse) -> Self {
        let mut lunch = Vec::new();
        let mut dinner = Vec::new();

        for info in CATEGORIES.iter() {
            let Some(dishes) = response.categories.get(info.key).and_then(|v| v.as_array())
            else {
                continue;
            };

            let items: Vec<String> = dishes
                .iter()
                .filter_map(|d| d.as_str().map(str::to_string))
                .collect();
            if items.is_empty() {
                continue;
            }

            let category = MenuCategory {
                key: info.key,
                title: info.title,
                icon: info.icon,
                color: info.color,
                items,
            };
            match info.mealtime {
                Mealtime::Lunch => lunch.push(category),
                Mealtime::Dinner => dinner.push(category),
            }
        }

        let date = response
            .updated_date
            .clone()
            .unwrap_or_else(|| Utc::now().to_rfc3339());

        Self {
            lunch,
            dinner,
            date,
        }
    }

    pub fn categories(&self, mealtime: Mealtime) -> &[MenuCategory] {
        match mealtime {
            Mealtime::Lunch => &self.lunch,
            Mealtime::Dinner => &self.dinner,
        }
    }

    /// Total number of dishes served at the given mealtime.
    pub fn item_count(&self, mealtime: Mealtime) -> usize {
        self.categories(mealtime).iter().map(|c| c.items.len()).sum()
    }
}

/// Restaurant payload, optionally narrowed to one mealtime.
#[derive(Debug, Clone, Serialize)]
pub struct RestaurantView {
    #[serde(flatten)]
    pub menu: GroupedMenu,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mealtime: Option<Mealtime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_count: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(raw: &str) -> MenuResponse {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn test_groups_by_mealtime() {
        let menu = GroupedMenu::from_response(&response(
            r#"{
                "grilladesMidi": ["Steak", "Saucisses"],
                "cibo": ["Curry de légumes"],
                "grilladesSoir": ["Brochettes"],
                "accompSoir": [],
                "updatedDate": "2025-03-10"
            }"#,
        ));

        assert_eq!(menu.date, "2025-03-10");
        assert_eq!(menu.lunch.len(), 2);
        assert_eq!(menu.lunch[0].key, "grilladesMidi");
        assert_eq!(menu.lunch[1].title, "Végétarien");
        assert_eq!(menu.dinner.len(), 1);
        assert_eq!(menu.item_count(Mealtime::Lunch), 3);
        assert_eq!(menu.item_count(Mealtime::Dinner), 1);
    }

    #[test]
    fn test_unknown_and_malformed_categories_are_dropped() {
        let menu = GroupedMenu::from_response(&response(
            r#"{"dessert": ["Tarte"], "migrateurs": "not a list"}"#,
        ));

        assert!(menu.lunch.is_empty());
        assert!(menu.dinner.is_empty());
        assert!(!menu.date.is_empty());
    }

    #[test]
    fn test_mealtime_parse() {
        assert_eq!(Mealtime::parse("lunch"), Some(Mealtime::Lunch));
        assert_eq!(Mealtime::parse(" Dinner "), Some(Mealtime::Dinner));
        assert_eq!(Mealtime::parse("brunch"), None);
    }
}
