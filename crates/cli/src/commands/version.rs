pub fn run() {
    println!("tably {}", env!("CARGO_PKG_VERSION"));
}
