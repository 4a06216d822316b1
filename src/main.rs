use cutline;

#[tokio::main]
async fn main() -> Result<(), eframe::Error> {
    // Set up logging for development
    env_logger::init();

    // Run the stencil editor application
    cutline::run_app()
}
