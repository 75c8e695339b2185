use logsink::app;
use logsink::error::ReceiverError;

#[tokio::main]
async fn main() -> Result<(), ReceiverError> {
    app::run().await
}
