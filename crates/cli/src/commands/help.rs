pub fn run() {
    println!("Available commands:");
    println!();
    println!("  -version          Show version information");
    println!("  -help             Show this help message");
    println!("  -list-keybinds    List all keybindings");
    println!("  -list-actions     List available keybind actions");
    println!("  -edit-config      Open config file in editor");
    println!("  -show-config      Display current configuration");
    println!("  -validate-config  Validate configuration file");
    println!("  -schema           Fetch a project and print its properties");
}
