#[tokio::main]
async fn main() {
    if let Err(e) = clinic_dispatch_lib::run().await {
        eprintln!("clinic-dispatch: {e}");
        std::process::exit(1);
    }
}
