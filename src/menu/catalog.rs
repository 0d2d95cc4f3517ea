use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;
use log::info;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Duplicate menu item id: {0}")]
    DuplicateId(u32),
    #[error("Menu item {0} has an empty name")]
    EmptyName(u32),
    #[error("Menu item {id} has an invalid price: {price}")]
    InvalidPrice { id: u32, price: f64 },
}

/// Dietary and flavor tags a dish can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "vegetarian")]
    Vegetarian,
    #[serde(rename = "vegan")]
    Vegan,
    #[serde(rename = "spicy")]
    Spicy,
    #[serde(rename = "high protein")]
    HighProtein,
    #[serde(rename = "gluten free")]
    GlutenFree,
    #[serde(rename = "low calorie")]
    LowCalorie,
    #[serde(rename = "light")]
    Light,
    #[serde(rename = "healthy")]
    Healthy,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Vegetarian => "vegetarian",
            Category::Vegan => "vegan",
            Category::Spicy => "spicy",
            Category::HighProtein => "high protein",
            Category::GlutenFree => "gluten free",
            Category::LowCalorie => "low calorie",
            Category::Light => "light",
            Category::Healthy => "healthy",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub calories: u32,
    pub categories: Vec<Category>,
    pub price: f64,
}

impl MenuItem {
    pub fn has_category(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }
}

/// Read-only menu the assistant recommends from. Item order is the catalog
/// order used to break ties.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<MenuItem>,
    // Lower-cased names, index-aligned with `items`.
    lowered_names: Vec<String>,
}

impl Catalog {
    pub fn new(items: Vec<MenuItem>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for item in &items {
            if !seen.insert(item.id) {
                return Err(CatalogError::DuplicateId(item.id));
            }
            if item.name.trim().is_empty() {
                return Err(CatalogError::EmptyName(item.id));
            }
            if !item.price.is_finite() || item.price < 0.0 {
                return Err(CatalogError::InvalidPrice { id: item.id, price: item.price });
            }
        }

        let lowered_names = items.iter().map(|item| item.name.to_lowercase()).collect();
        Ok(Self { items, lowered_names })
    }

    pub fn from_json(json_str: &str) -> Result<Self, CatalogError> {
        let items: Vec<MenuItem> = serde_json::from_str(json_str)?;
        Self::new(items)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path.as_ref())?;
        let catalog = Self::from_json(&content)?;
        info!("Loaded {} menu items from {}", catalog.len(), path.as_ref().display());
        Ok(catalog)
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// First item, in catalog order, whose name appears in `lowered_text`.
    pub fn find_mentioned(&self, lowered_text: &str) -> Option<&MenuItem> {
        self.lowered_names
            .iter()
            .position(|name| lowered_text.contains(name.as_str()))
            .map(|idx| &self.items[idx])
    }

    pub fn with_category(&self, category: Category) -> Vec<&MenuItem> {
        self.items.iter().filter(|item| item.has_category(category)).collect()
    }

    /// Lowest-calorie item; the earliest one wins a tie.
    pub fn lowest_calorie(&self) -> Option<&MenuItem> {
        self.items.iter().min_by_key(|item| item.calories)
    }

    /// Items sorted by ascending price, ties kept in catalog order.
    pub fn by_price(&self) -> Vec<&MenuItem> {
        let mut items: Vec<&MenuItem> = self.items.iter().collect();
        items.sort_by(|a, b| a.price.total_cmp(&b.price));
        items
    }
}

impl Default for Catalog {
    fn default() -> Self {
        let items = vec![
            dish(1, "Mediterranean Salad",
                "Fresh mixed greens with feta, olives, cherry tomatoes, cucumber, and house dressing.",
                320, &[Category::LowCalorie, Category::Vegetarian, Category::Light, Category::Healthy], 14.99),
            dish(2, "Grilled Chicken Breast",
                "Herb-marinated chicken breast, grilled to perfection with seasonal vegetables.",
                450, &[Category::HighProtein, Category::Healthy, Category::GlutenFree], 19.99),
            dish(3, "Spicy Beef Kebab",
                "Tender pieces of spiced beef with grilled peppers and onions, served with rice pilaf.",
                680, &[Category::Spicy, Category::HighProtein], 24.99),
            dish(4, "Falafel Bowl",
                "Crispy falafel, hummus, tabbouleh, and tahini sauce with warm pita bread.",
                520, &[Category::Vegetarian, Category::Vegan], 16.99),
            dish(5, "Pan-Seared Salmon",
                "Atlantic salmon with lemon butter sauce, served with seasonal vegetables.",
                480, &[Category::HighProtein, Category::Healthy, Category::GlutenFree], 26.99),
            dish(6, "Mushroom Risotto",
                "Creamy arborio rice with wild mushrooms, finished with parmesan.",
                620, &[Category::Vegetarian], 18.99),
            dish(7, "Spicy Thai Curry",
                "Red curry with vegetables and your choice of protein, served with jasmine rice.",
                580, &[Category::Spicy, Category::GlutenFree], 22.99),
            dish(8, "Caesar Salad",
                "Crisp romaine, garlic croutons, parmesan, and house-made Caesar dressing.",
                380, &[Category::LowCalorie, Category::Light], 12.99),
        ];

        let lowered_names = items.iter().map(|item| item.name.to_lowercase()).collect();
        Self { items, lowered_names }
    }
}

fn dish(id: u32, name: &str, description: &str, calories: u32, categories: &[Category], price: f64) -> MenuItem {
    MenuItem {
        id,
        name: name.to_string(),
        description: description.to_string(),
        calories,
        categories: categories.to_vec(),
        price,
    }
}
