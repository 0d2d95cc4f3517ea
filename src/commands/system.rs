pub fn handle_command(input: &str) -> Result<(), String> {
    match input.to_lowercase().as_str() {
        "help" => {
            println!("\n🍽️  DineLink Assistant");
            println!("  Just type what you are in the mood for");
            println!("  Examples:");
            println!("    - something vegetarian");
            println!("    - dishes under 500 calories");
            println!("    - what's cheap?");
            println!("    - tell me about the mushroom risotto");
            println!();

            println!("📋 Menu Commands:");
            println!("  menu     - List every dish with calories and price");
            println!();

            println!("💬 Conversation Commands:");
            println!("  history  - Show the saved conversation");
            println!("  clear    - Forget the saved conversation");
            println!();

            println!("⚙️ System Commands:");
            println!("  help  - Show this help menu");
            println!("  exit  - Exit the program");
            println!();
            Ok(())
        },
        "exit" | "quit" => {
            println!("👋 Goodbye!");
            std::process::exit(0);
        },
        _ => Err("Unknown system command. Type 'help' for available commands.".to_string())
    }
}
