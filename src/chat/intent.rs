use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::menu::{Catalog, Category};

const GREETING_WORDS: &[&str] = &["hello", "hi", "hey", "greetings"];
const HELP_WORDS: &[&str] = &["help", "assist", "recommendation", "suggest", "recommend"];
const CALORIE_WORDS: &[&str] = &["low calorie", "low-calorie", "diet", "light", "calories", "calorie"];
const PRICE_WORDS: &[&str] = &["price", "cost", "expensive", "cheap", "affordable", "$"];
const LOW_PRICE_WORDS: &[&str] = &["cheap", "affordable", "inexpensive", "budget"];
const HIGH_PRICE_WORDS: &[&str] = &["expensive", "high-end", "fancy", "premium"];

/// Checked in this order; the first category found wins.
const DIETARY_CATEGORIES: &[Category] = &[
    Category::Vegetarian,
    Category::Vegan,
    Category::Spicy,
    Category::HighProtein,
    Category::GlutenFree,
];

lazy_static! {
    static ref CALORIE_LIMIT: Regex = Regex::new(r"under (\d+) calories").expect("valid calorie pattern");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceTier {
    Low,
    High,
}

/// What the user is asking for, with whatever the matching rule extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    Help,
    UnderCalories(u32),
    Category(Category),
    PriceTier(PriceTier),
    PriceOverview,
    /// Carries the id of the dish that was named.
    Dish(u32),
    Fallback,
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::Help => "help",
            Intent::UnderCalories(_) => "under_calories",
            Intent::Category(_) => "category",
            Intent::PriceTier(_) => "price_tier",
            Intent::PriceOverview => "price_overview",
            Intent::Dish(_) => "dish",
            Intent::Fallback => "fallback",
        }
    }
}

/// One step of the classification cascade.
pub struct IntentRule {
    pub name: &'static str,
    matcher: fn(&str, &Catalog) -> Option<Intent>,
}

impl IntentRule {
    pub fn evaluate(&self, lowered: &str, catalog: &Catalog) -> Option<Intent> {
        (self.matcher)(lowered, catalog)
    }
}

/// Precedence is the array order.
pub const RULES: [IntentRule; 6] = [
    IntentRule { name: "greeting", matcher: match_greeting },
    IntentRule { name: "help", matcher: match_help },
    IntentRule { name: "calorie", matcher: match_calorie },
    IntentRule { name: "dietary", matcher: match_dietary },
    IntentRule { name: "price", matcher: match_price },
    IntentRule { name: "dish", matcher: match_dish },
];

/// Runs the cascade over already lower-cased text.
pub fn classify(lowered: &str, catalog: &Catalog) -> Intent {
    RULES
        .iter()
        .find_map(|rule| rule.evaluate(lowered, catalog))
        .unwrap_or(Intent::Fallback)
}

pub fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}

fn match_greeting(lowered: &str, _catalog: &Catalog) -> Option<Intent> {
    contains_any(lowered, GREETING_WORDS).then_some(Intent::Greeting)
}

fn match_help(lowered: &str, _catalog: &Catalog) -> Option<Intent> {
    contains_any(lowered, HELP_WORDS).then_some(Intent::Help)
}

fn match_calorie(lowered: &str, _catalog: &Catalog) -> Option<Intent> {
    if !contains_any(lowered, CALORIE_WORDS) {
        return None;
    }

    // A number too large for u32 is treated like no number at all.
    let limit = CALORIE_LIMIT
        .captures(lowered)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok());

    Some(match limit {
        Some(limit) => Intent::UnderCalories(limit),
        None => Intent::Category(Category::LowCalorie),
    })
}

fn match_dietary(lowered: &str, _catalog: &Catalog) -> Option<Intent> {
    DIETARY_CATEGORIES
        .iter()
        .find(|category| lowered.contains(category.as_str()))
        .map(|category| Intent::Category(*category))
}

fn match_price(lowered: &str, _catalog: &Catalog) -> Option<Intent> {
    if !contains_any(lowered, PRICE_WORDS) {
        return None;
    }

    Some(if contains_any(lowered, LOW_PRICE_WORDS) {
        Intent::PriceTier(PriceTier::Low)
    } else if contains_any(lowered, HIGH_PRICE_WORDS) {
        Intent::PriceTier(PriceTier::High)
    } else {
        Intent::PriceOverview
    })
}

fn match_dish(lowered: &str, catalog: &Catalog) -> Option<Intent> {
    catalog.find_mentioned(lowered).map(|item| Intent::Dish(item.id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_text(text: &str) -> Intent {
        classify(&text.to_lowercase(), &Catalog::default())
    }

    #[test]
    fn test_greeting_beats_everything() {
        assert_eq!(classify_text("Hello, anything vegetarian under 500 calories?"), Intent::Greeting);
        assert_eq!(classify_text("GREETINGS"), Intent::Greeting);
    }

    #[test]
    fn test_keywords_match_as_substrings() {
        // "something" contains "hi", so the greeting rule claims it.
        assert_eq!(classify_text("show me something spicy"), Intent::Greeting);
        assert_eq!(classify_text("show me spicy food"), Intent::Category(Category::Spicy));
    }

    #[test]
    fn test_help_request() {
        assert_eq!(classify_text("can you recommend a dish?"), Intent::Help);
    }

    #[test]
    fn test_calorie_limit_extraction() {
        assert_eq!(classify_text("under 500 calories"), Intent::UnderCalories(500));
        assert_eq!(classify_text("Dishes UNDER 350 CALORIES please"), Intent::UnderCalories(350));
    }

    #[test]
    fn test_calorie_without_number_uses_low_calorie_category() {
        assert_eq!(classify_text("I'm on a diet"), Intent::Category(Category::LowCalorie));
        assert_eq!(classify_text("under 99999999999 calories"), Intent::Category(Category::LowCalorie));
    }

    #[test]
    fn test_calorie_rule_precedes_dietary() {
        assert_eq!(classify_text("vegan and light"), Intent::Category(Category::LowCalorie));
    }

    #[test]
    fn test_dietary_order() {
        assert_eq!(classify_text("vegan or vegetarian"), Intent::Category(Category::Vegetarian));
        assert_eq!(classify_text("gluten free options"), Intent::Category(Category::GlutenFree));
    }

    #[test]
    fn test_price_tiers() {
        assert_eq!(classify_text("what's cheap"), Intent::PriceTier(PriceTier::Low));
        assert_eq!(classify_text("your most expensive dishes"), Intent::PriceTier(PriceTier::High));
        assert_eq!(classify_text("what does it cost"), Intent::PriceOverview);
        assert_eq!(classify_text("$$$"), Intent::PriceOverview);
    }

    #[test]
    fn test_dish_lookup() {
        assert_eq!(classify_text("tell me about mushroom risotto"), Intent::Dish(6));
        assert_eq!(classify_text("Falafel Bowl"), Intent::Dish(4));
    }

    #[test]
    fn test_unmatched_falls_back() {
        assert_eq!(classify_text("asdkjasd"), Intent::Fallback);
        assert_eq!(classify_text(""), Intent::Fallback);
    }

    #[test]
    fn test_rule_names_follow_precedence() {
        let names: Vec<&str> = RULES.iter().map(|rule| rule.name).collect();
        assert_eq!(names, ["greeting", "help", "calorie", "dietary", "price", "dish"]);
    }
}
