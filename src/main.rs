fn main() {
    if let Err(err) = quake_feed::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
