//! Menu Item Model

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult, ErrorCode};

/// Menu category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MenuCategory {
    #[default]
    Food,
    Drink,
}

impl MenuCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Drink => "drink",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Food => "Món ăn",
            Self::Drink => "Đồ uống",
        }
    }
}

impl fmt::Display for MenuCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MenuCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "food" => Ok(Self::Food),
            "drink" => Ok(Self::Drink),
            other => Err(format!("unknown menu category: {}", other)),
        }
    }
}

/// Menu item entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub category: MenuCategory,
    #[serde(default)]
    pub description: Option<String>,
    /// Image URL
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

/// Create/update menu item payload (JSON form)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuItemInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    pub category: MenuCategory,
    pub is_available: bool,
}

impl MenuItemInput {
    pub fn new(name: impl Into<String>, price: Decimal, category: MenuCategory) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            price,
            category,
            is_available: true,
        }
    }

    /// Name must be present and the price positive
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::with_message(
                ErrorCode::RequiredField,
                "Vui lòng nhập tên món",
            )
            .with_detail("field", "name"));
        }
        if self.price <= Decimal::ZERO {
            return Err(AppError::validation("Vui lòng nhập giá hợp lệ!").with_detail("field", "price"));
        }
        Ok(())
    }

    /// Form fields for a multipart request, in submission order
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.trim().to_string()),
            ("description", self.description.clone()),
            ("price", self.price.normalize().to_string()),
            ("category", self.category.as_str().to_string()),
            ("is_available", self.is_available.to_string()),
        ]
    }
}

impl From<&MenuItem> for MenuItemInput {
    fn from(item: &MenuItem) -> Self {
        Self {
            name: item.name.clone(),
            description: item.description.clone().unwrap_or_default(),
            price: item.price,
            category: item.category,
            is_available: item.is_available,
        }
    }
}

/// Image attached to a create/update request
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Guess the MIME type from the file extension
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let ext = file_name
            .rsplit('.')
            .next()
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        let mime = match ext.as_str() {
            "jpg" | "jpeg" => "image/jpeg",
            "png" => "image/png",
            "gif" => "image/gif",
            "webp" => "image/webp",
            _ => "application/octet-stream",
        }
        .to_string();
        Self {
            file_name,
            mime,
            bytes,
        }
    }
}

/// `PATCH /menu-items/{id}/` availability body
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AvailabilityUpdate {
    pub is_available: bool,
}

/// Distinct categories in first-seen order
pub fn categories(items: &[MenuItem]) -> Vec<MenuCategory> {
    let mut seen = Vec::new();
    for item in items {
        if !seen.contains(&item.category) {
            seen.push(item.category);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_item_defaults() {
        let item: MenuItem =
            serde_json::from_str(r#"{"id": 1, "name": "Phở", "price": "45000.00"}"#).unwrap();
        assert!(item.is_available);
        assert_eq!(item.category, MenuCategory::Food);
        assert_eq!(item.price, Decimal::from(45000));
    }

    #[test]
    fn test_input_validate() {
        let ok = MenuItemInput::new("Cà phê sữa", Decimal::from(25000), MenuCategory::Drink);
        assert!(ok.validate().is_ok());
        let no_name = MenuItemInput::new("  ", Decimal::from(25000), MenuCategory::Drink);
        assert_eq!(no_name.validate().unwrap_err().code, ErrorCode::RequiredField);
        let free = MenuItemInput::new("Nước lọc", Decimal::ZERO, MenuCategory::Drink);
        assert_eq!(free.validate().unwrap_err().code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn test_form_fields() {
        let input = MenuItemInput::new(" Bún chả ", Decimal::new(4500000, 2), MenuCategory::Food);
        let fields = input.form_fields();
        assert_eq!(fields[0], ("name", "Bún chả".to_string()));
        assert_eq!(fields[2], ("price", "45000".to_string()));
        assert_eq!(fields[4], ("is_available", "true".to_string()));
    }

    #[test]
    fn test_image_mime() {
        assert_eq!(ImageUpload::new("pho.JPG", vec![]).mime, "image/jpeg");
        assert_eq!(ImageUpload::new("tra.webp", vec![]).mime, "image/webp");
        assert_eq!(ImageUpload::new("notes", vec![]).mime, "application/octet-stream");
    }

    #[test]
    fn test_categories_first_seen() {
        let mk = |id, category| MenuItem {
            id,
            name: format!("m{}", id),
            price: Decimal::ONE,
            category,
            description: None,
            image: None,
            is_available: true,
        };
        let items = vec![
            mk(1, MenuCategory::Drink),
            mk(2, MenuCategory::Food),
            mk(3, MenuCategory::Drink),
        ];
        assert_eq!(categories(&items), vec![MenuCategory::Drink, MenuCategory::Food]);
    }
}
