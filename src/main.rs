fn main() {
    if let Err(err) = orange_coach::cli::main() {
        eprintln!("❌ {err}");
        std::process::exit(1);
    }
}
