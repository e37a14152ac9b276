use cc_status_line::presentation::cli::CliApp;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Logging is set up inside the app, from the environment and config
    let app = CliApp::new();
    app.run().await
}
