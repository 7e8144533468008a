#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    lib_warden::init().await?;

    // A pending blocking read on stdin would otherwise keep the runtime alive
    std::process::exit(0)
}
