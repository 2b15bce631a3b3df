pub const ACTIONS: &[&str] = &[
    "add_property",
    "ask_go",
    "toggle_command_palette",
    "quit",
    "select_all",
    "delete_selected",
    "toggle_row_selection",
    "row_up",
    "row_down",
    "reload",
];

pub fn run() {
    for action in ACTIONS {
        println!("{}", action);
    }
}
