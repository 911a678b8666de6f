//! Starts an authentication order against the customer test
//! environment and drives it to a terminal state.
//!
//! Configuration comes from `config/settings` or `BANKID_*` environment
//! variables, including the paths to the RP certificate material. Run
//! with:
//!
//! ```sh
//! cargo run --example authenticate
//! ```

use bankid_client::{
    client::BankIdClient,
    config::Config,
    order::{OrderState, OrderTracker, RECOMMENDED_COLLECT_INTERVAL},
    payload::AuthenticationPayload,
    telemetry,
};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    // Load configuration
    let config = Config::load()?;
    tracing::info!("Loaded configuration: {:?}", config);

    let client = BankIdClient::from_config(&config)?;

    let order = client
        .authenticate(&AuthenticationPayload {
            end_user_ip: "192.168.1.1".to_owned(),
            ..Default::default()
        })
        .await?;
    tracing::info!(order_ref = %order.order_ref, "order created");

    let mut tracker = OrderTracker::new(order);
    println!("Open the BankID app and scan the QR code:");

    loop {
        println!("{}", tracker.qr_code_content());

        let snapshot = client.collect(tracker.order_ref()).await?;
        match tracker.observe(snapshot)? {
            OrderState::Pending { hint } => {
                tracing::info!(?hint, "order pending");
            }
            OrderState::Complete(data) => {
                println!(
                    "Authenticated {} ({})",
                    data.user.name, data.user.personal_number
                );
                break;
            }
            OrderState::Failed { hint } => {
                println!("Order failed: {:?}", hint);
                break;
            }
            _ => {}
        }

        tokio::time::sleep(RECOMMENDED_COLLECT_INTERVAL).await;
    }

    Ok(())
}
