use colored::Colorize;
use chrono::{Local, TimeZone};

use crate::chat::{ChatSession, Sender};
use crate::menu::Catalog;
use std::sync::Arc;

mod system;

pub struct CommandHandler {
    session: ChatSession,
    catalog: Arc<Catalog>,
}

impl CommandHandler {
    pub fn new(session: ChatSession, catalog: Arc<Catalog>) -> Self {
        Self { session, catalog }
    }

    pub async fn handle_command(&mut self, input: &str) -> Result<(), String> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(());
        }

        // Single-word commands first; everything else is a chat message.
        match input.to_lowercase().as_str() {
            "help" | "exit" | "quit" => system::handle_command(input),
            "menu" => {
                self.print_menu();
                Ok(())
            }
            "history" => {
                self.print_history();
                Ok(())
            }
            "clear" => {
                self.session.clear().map_err(|e| format!("Failed to clear history: {}", e))?;
                println!("🧹 Conversation cleared");
                Ok(())
            }
            _ => self.handle_chat(input).await,
        }
    }

    async fn handle_chat(&mut self, input: &str) -> Result<(), String> {
        if let Some(response) = self.session.submit(input).await {
            println!("🤖 {}", response.truecolor(255, 236, 179));
            println!();
        }
        Ok(())
    }

    fn print_menu(&self) {
        println!("\n📋 Menu:");
        for item in self.catalog.items() {
            let tags: Vec<&str> = item.categories.iter().map(|c| c.as_str()).collect();
            println!(
                "  • {} - {} | {} cal | {}",
                item.name.bold(),
                format!("${:.2}", item.price).green(),
                item.calories.to_string().cyan(),
                tags.join(", ").dimmed()
            );
        }
        println!();
    }

    fn print_history(&self) {
        let log = self.session.log();
        if log.is_empty() {
            println!("No conversation yet.");
            return;
        }

        for turn in log.turns() {
            let time = Local
                .timestamp_millis_opt(turn.timestamp)
                .single()
                .map(|t| t.format("%H:%M").to_string())
                .unwrap_or_default();
            match turn.sender {
                Sender::User => println!("{} 👤 {}", time.dimmed(), turn.text),
                Sender::Bot => println!("{} 🤖 {}", time.dimmed(), turn.text.truecolor(255, 236, 179)),
            }
        }
        println!();
    }
}
