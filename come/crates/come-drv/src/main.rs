fn main() {
    if let Err(e) = come_drv::main() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}
