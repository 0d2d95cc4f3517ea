use rand::seq::SliceRandom;
use rand::Rng;

use crate::chat::intent::PriceTier;
use crate::config::{RenderMode, ResolverSettings};
use crate::menu::{Catalog, Category, MenuItem};

pub const GREETING_REPLY: &str = "Hello! How can I help you find the perfect meal today? Are you looking for something specific like vegetarian or low-calorie options?";

pub const HELP_REPLY: &str = "I'd be happy to help you find something to eat! I can suggest dishes based on dietary preferences like vegetarian, high protein, or spicy. Or I can recommend dishes under a certain calorie count. What are you in the mood for today?";

pub const TERMINAL_FALLBACK_REPLY: &str = "I'd be happy to recommend something from our menu! Would you like suggestions for vegetarian dishes, high protein options, spicy meals, or perhaps something under 500 calories?";

/// Returned on no match in delegate mode; the session forwards the message
/// to the completion provider when it sees this.
pub const DELEGATION_SENTINEL: &str = "I'm sorry, I didn't understand that.";

/// Most dishes any list reply names.
pub const MAX_SUGGESTIONS: usize = 3;

/// Renders replies from the catalog. Borrowed per call; holds no state.
pub struct Responder<'a> {
    catalog: &'a Catalog,
    settings: &'a ResolverSettings,
}

impl<'a> Responder<'a> {
    pub fn new(catalog: &'a Catalog, settings: &'a ResolverSettings) -> Self {
        Self { catalog, settings }
    }

    pub fn under_calories(&self, limit: u32) -> String {
        let mut matches: Vec<&MenuItem> = self
            .catalog
            .items()
            .iter()
            .filter(|item| item.calories < limit)
            .collect();

        if matches.is_empty() {
            return match self.catalog.lowest_calorie() {
                Some(lowest) => format!(
                    "I'm sorry, we don't currently have menu items under {} calories. Our lowest calorie option is the {} at {} calories. Would you like to know more about our lighter options?",
                    limit, lowest.name, lowest.calories
                ),
                None => format!(
                    "I'm sorry, we don't currently have menu items under {} calories.",
                    limit
                ),
            };
        }

        matches.sort_by_key(|item| item.calories);
        matches.truncate(MAX_SUGGESTIONS);

        self.render_list(
            &format!("Here are some dishes under {} calories:", limit),
            &matches,
            |item| format!("{} calories", item.calories),
            "Would you like more details about any of these dishes?",
        )
    }

    /// Picks up to three matches after a uniform shuffle, so every subset is equally likely.
    pub fn category<R: Rng + ?Sized>(&self, category: Category, rng: &mut R) -> String {
        let mut matches = self.catalog.with_category(category);

        if matches.is_empty() {
            return format!(
                "I'm sorry, we don't currently have {} options on our menu. Would you like suggestions for something else?",
                category
            );
        }

        matches.shuffle(rng);
        matches.truncate(MAX_SUGGESTIONS);

        self.render_list(
            &format!("Here are some {} options you might enjoy:", category),
            &matches,
            |item| format!("{} calories", item.calories),
            "Would you like to know more about any of these dishes?",
        )
    }

    pub fn price_tier(&self, tier: PriceTier) -> String {
        let tiers = &self.settings.price_tiers;
        let mut matches: Vec<&MenuItem> = self
            .catalog
            .items()
            .iter()
            .filter(|item| match tier {
                PriceTier::Low => tiers.is_low(item.price),
                PriceTier::High => tiers.is_high(item.price),
            })
            .collect();

        let (label, heading) = match tier {
            PriceTier::Low => ("affordable", "Here are some of our more affordable options:"),
            PriceTier::High => ("premium", "Here are some of our premium selections:"),
        };

        if matches.is_empty() {
            return format!(
                "I'm sorry, we don't currently have {} options on our menu. Would you like suggestions for something else?",
                label
            );
        }

        match tier {
            PriceTier::Low => matches.sort_by(|a, b| a.price.total_cmp(&b.price)),
            PriceTier::High => matches.sort_by(|a, b| b.price.total_cmp(&a.price)),
        }
        matches.truncate(MAX_SUGGESTIONS);

        self.render_list(
            heading,
            &matches,
            |item| format!("${:.2}", item.price),
            "Would you like more information on any of these dishes?",
        )
    }

    /// Names the two cheapest dishes, in menu order, and the most expensive one.
    pub fn price_overview(&self) -> String {
        let by_price = self.catalog.by_price();
        let closing = "Would you like me to suggest something in a particular price range?";

        let split = by_price.len().min(2);
        let mut affordable: Vec<&MenuItem> = by_price[..split].to_vec();
        affordable.sort_by_key(|item| self.position(item));
        let cheapest: Vec<String> = affordable
            .iter()
            .map(|item| format!("{} at ${:.2}", item.name, item.price))
            .collect();

        // The premium dish must cost more than both affordable ones.
        let premium = match by_price.last() {
            Some(top) if by_price.len() > 2 && top.price > by_price[1].price => {
                by_price[split..].iter().find(|item| item.price == top.price).copied()
            }
            _ => None,
        };

        let mut reply = String::from("Our menu offers a range of prices to suit different budgets.");
        match cheapest.len() {
            0 => {}
            1 => reply.push_str(&format!(" The {} is our most affordable option", cheapest[0])),
            _ => reply.push_str(&format!(
                " The {} and {} are our most affordable options",
                cheapest[0], cheapest[1]
            )),
        }

        if let Some(item) = premium {
            reply.push_str(&format!(
                ", while our specialty dishes like {} at ${:.2} are premium selections.",
                item.name, item.price
            ));
        } else if !cheapest.is_empty() {
            reply.push('.');
        }

        reply.push(' ');
        reply.push_str(closing);
        reply
    }

    fn position(&self, item: &MenuItem) -> usize {
        self.catalog
            .items()
            .iter()
            .position(|candidate| candidate.id == item.id)
            .unwrap_or(usize::MAX)
    }

    pub fn dish(&self, id: u32) -> Option<String> {
        self.catalog.get(id).map(|item| {
            format!(
                "{} is an excellent choice! {} It has {} calories and costs ${:.2}. Would you like to know about other similar dishes?",
                item.name, item.description, item.calories, item.price
            )
        })
    }

    fn render_list<F>(&self, heading: &str, items: &[&MenuItem], detail: F, closing: &str) -> String
    where
        F: Fn(&MenuItem) -> String,
    {
        let (open, close, gap) = match self.settings.render_mode {
            RenderMode::Html => ("<strong>", "</strong>", "<br><br>"),
            RenderMode::Plain => ("", "", "\n\n"),
        };

        let mut response = format!("{}{}", heading, gap);
        for item in items {
            response.push_str(&format!(
                "{}{}{} ({}): {}{}",
                open,
                item.name,
                close,
                detail(*item),
                item.description,
                gap
            ));
        }
        response.push_str(closing);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PriceTiers;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn plain() -> ResolverSettings {
        ResolverSettings { render_mode: RenderMode::Plain, ..ResolverSettings::default() }
    }

    #[test]
    fn test_under_calories_html_layout() {
        let catalog = Catalog::default();
        let settings = ResolverSettings::default();
        let reply = Responder::new(&catalog, &settings).under_calories(400);
        assert_eq!(
            reply,
            "Here are some dishes under 400 calories:<br><br>\
             <strong>Mediterranean Salad</strong> (320 calories): Fresh mixed greens with feta, olives, cherry tomatoes, cucumber, and house dressing.<br><br>\
             <strong>Caesar Salad</strong> (380 calories): Crisp romaine, garlic croutons, parmesan, and house-made Caesar dressing.<br><br>\
             Would you like more details about any of these dishes?"
        );
    }

    #[test]
    fn test_plain_mode_has_no_markup() {
        let catalog = Catalog::default();
        let settings = plain();
        let reply = Responder::new(&catalog, &settings).price_tier(PriceTier::Low);
        assert!(reply.starts_with("Here are some of our more affordable options:\n\nCaesar Salad ($12.99): "));
        assert!(!reply.contains("<strong>"));
        assert!(!reply.contains("<br>"));
    }

    #[test]
    fn test_price_tiers_respect_configured_split() {
        let catalog = Catalog::default();
        let settings = ResolverSettings {
            render_mode: RenderMode::Plain,
            price_tiers: PriceTiers::split_at(20.0),
            ..ResolverSettings::default()
        };
        let responder = Responder::new(&catalog, &settings);

        let low = responder.price_tier(PriceTier::Low);
        assert!(low.contains("Caesar Salad ($12.99)"));
        assert!(low.contains("Falafel Bowl ($16.99)"));
        assert!(!low.contains("Grilled Chicken Breast"));

        let high = responder.price_tier(PriceTier::High);
        let salmon = high.find("Pan-Seared Salmon").unwrap();
        let kebab = high.find("Spicy Beef Kebab").unwrap();
        let curry = high.find("Spicy Thai Curry").unwrap();
        assert!(salmon < kebab && kebab < curry);
    }

    #[test]
    fn test_empty_category_message() {
        let catalog = Catalog::from_json(
            r#"[{"id": 1, "name": "Steak", "description": "Big.", "calories": 900, "categories": ["high protein"], "price": 30.0}]"#,
        )
        .unwrap();
        let settings = ResolverSettings::default();
        let mut rng = StdRng::seed_from_u64(1);
        let reply = Responder::new(&catalog, &settings).category(Category::Vegan, &mut rng);
        assert_eq!(
            reply,
            "I'm sorry, we don't currently have vegan options on our menu. Would you like suggestions for something else?"
        );
    }

    #[test]
    fn test_empty_price_tier_message() {
        let catalog = Catalog::from_json(
            r#"[{"id": 1, "name": "Soup", "description": "Hot.", "calories": 150, "categories": ["light"], "price": 6.0}]"#,
        )
        .unwrap();
        let settings = ResolverSettings::default();
        let reply = Responder::new(&catalog, &settings).price_tier(PriceTier::High);
        assert!(reply.starts_with("I'm sorry, we don't currently have premium options"));
    }

    #[test]
    fn test_price_overview_reads_catalog() {
        let catalog = Catalog::default();
        let settings = ResolverSettings::default();
        let reply = Responder::new(&catalog, &settings).price_overview();
        assert_eq!(
            reply,
            "Our menu offers a range of prices to suit different budgets. \
             The Mediterranean Salad at $14.99 and Caesar Salad at $12.99 are our most affordable options, \
             while our specialty dishes like Pan-Seared Salmon at $26.99 are premium selections. \
             Would you like me to suggest something in a particular price range?"
        );
    }

    #[test]
    fn test_price_overview_small_catalog() {
        let catalog = Catalog::from_json(
            r#"[{"id": 1, "name": "Soup", "description": "Hot.", "calories": 150, "categories": ["light"], "price": 6.0}]"#,
        )
        .unwrap();
        let settings = ResolverSettings::default();
        let reply = Responder::new(&catalog, &settings).price_overview();
        assert!(reply.contains("The Soup at $6.00 is our most affordable option."));
        assert!(!reply.contains("premium"));
    }

    #[test]
    fn test_price_overview_skips_premium_tied_with_cheapest() {
        let catalog = Catalog::from_json(
            r#"[
                {"id": 1, "name": "Alpha", "description": "A.", "calories": 100, "categories": ["light"], "price": 10.0},
                {"id": 2, "name": "Beta", "description": "B.", "calories": 200, "categories": ["light"], "price": 10.0},
                {"id": 3, "name": "Gamma", "description": "C.", "calories": 300, "categories": ["light"], "price": 10.0}
            ]"#,
        )
        .unwrap();
        let settings = ResolverSettings::default();
        let reply = Responder::new(&catalog, &settings).price_overview();
        assert_eq!(
            reply,
            "Our menu offers a range of prices to suit different budgets. \
             The Alpha at $10.00 and Beta at $10.00 are our most affordable options. \
             Would you like me to suggest something in a particular price range?"
        );
    }

    #[test]
    fn test_price_overview_premium_is_never_an_affordable_pick() {
        let catalog = Catalog::from_json(
            r#"[
                {"id": 1, "name": "Alpha", "description": "A.", "calories": 100, "categories": ["light"], "price": 10.0},
                {"id": 2, "name": "Beta", "description": "B.", "calories": 200, "categories": ["light"], "price": 25.0},
                {"id": 3, "name": "Gamma", "description": "C.", "calories": 300, "categories": ["light"], "price": 8.0},
                {"id": 4, "name": "Delta", "description": "D.", "calories": 400, "categories": ["light"], "price": 25.0}
            ]"#,
        )
        .unwrap();
        let settings = ResolverSettings::default();
        let reply = Responder::new(&catalog, &settings).price_overview();
        assert!(reply.contains("The Alpha at $10.00 and Gamma at $8.00 are our most affordable options"));
        assert!(reply.contains("like Beta at $25.00 are premium selections."));
    }

    #[test]
    fn test_unknown_dish_id() {
        let catalog = Catalog::default();
        let settings = ResolverSettings::default();
        assert!(Responder::new(&catalog, &settings).dish(99).is_none());
    }
}
