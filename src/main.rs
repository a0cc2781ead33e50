fn main() {
    if let Err(err) = hierviz::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
